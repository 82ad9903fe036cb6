use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{
        HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CONTENT_TYPE,
    },
    Response, StatusCode,
};
use serde::Serialize;

pub type Reply = Response<Full<Bytes>>;

/// A request that cannot be served. Rendered as `{"message": ...}` with the given status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: &'static str,
}

impl Rejection {
    pub const NOT_FOUND: Self = Self::new(StatusCode::NOT_FOUND, "Rota não encontrada");

    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub const fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub const fn internal(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn into_response(self) -> Reply {
        message(self.status, self.message)
    }
}

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

fn with_cors(mut res: Reply) -> Reply {
    assert!(res.headers_mut().insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")).is_none());
    res
}

fn with_json(bytes: Vec<u8>, status: StatusCode) -> Reply {
    let mut res = Response::new(Full::from(bytes));
    *res.status_mut() = status;
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json")).is_none());
    with_cors(res)
}

pub fn message(status: StatusCode, message: &str) -> Reply {
    let bytes = serde_json::to_vec(&Message { message }).unwrap_or_default();
    with_json(bytes, status)
}

/// Serializes a successful body. Serialization failures become the given rejection.
pub fn json<T: Serialize>(value: &T, failure: Rejection) -> Result<Reply, Rejection> {
    let bytes = serde_json::to_vec(value).map_err(|err| {
        log::error!("cannot serialize response: {err}");
        failure
    })?;
    Ok(with_json(bytes, StatusCode::OK))
}

/// Answers CORS preflight requests for every route.
pub fn preflight() -> Reply {
    let mut res = Response::new(Full::default());
    *res.status_mut() = StatusCode::NO_CONTENT;
    let headers = res.headers_mut();
    assert!(headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS")).is_none());
    assert!(headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")).is_none());
    with_cors(res)
}
