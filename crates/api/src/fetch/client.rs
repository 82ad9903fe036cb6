use super::{Fetch, FetchError, Reply};
use core::future::Future;
use http::uri::{Parts, PathAndQuery};
use http_body_util::{BodyExt, Empty};
use hyper::{
    body::Bytes,
    header::{HeaderValue, ACCEPT, LOCATION, USER_AGENT},
    Request, StatusCode, Uri,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

const MAX_REDIRECTS: usize = 5;
const AGENT: &str = concat!("ecoquiz/", env!("CARGO_PKG_VERSION"));

/// HTTPS-only client for the Wikipedia APIs.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HttpFetcher {
    pub fn new() -> std::io::Result<Self> {
        let https = HttpsConnectorBuilder::new().with_native_roots()?.https_only().enable_http1().build();
        let client = Client::builder(TokioExecutor::new()).build(https);
        Ok(Self { client })
    }

    async fn get_once(&self, uri: Uri) -> Result<hyper::Response<hyper::body::Incoming>, FetchError> {
        let req = Request::get(uri)
            .header(USER_AGENT, HeaderValue::from_static(AGENT))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(Empty::new())?;
        Ok(self.client.request(req).await?)
    }

    async fn get_following(&self, mut uri: Uri) -> Result<Reply, FetchError> {
        for _ in 0..=MAX_REDIRECTS {
            let res = self.get_once(uri.clone()).await?;
            let status = res.status();
            if is_redirect(status) {
                if let Some(next) = res.headers().get(LOCATION).and_then(|loc| loc.to_str().ok()) {
                    log::debug!("following redirect from {uri} to {next}");
                    uri = resolve_location(&uri, next)?;
                    continue;
                }
            }

            let body = res.into_body().collect().await?.to_bytes();
            return Ok(Reply { status, body });
        }

        Err(FetchError::Redirects)
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, uri: Uri) -> impl Future<Output = Result<Reply, FetchError>> + Send {
        self.get_following(uri)
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolves a `Location` header against the URI that produced it. Absolute locations replace the
/// URI outright, root-relative ones keep the authority, and anything else replaces the last path
/// segment (which is how the REST API points at the canonical title).
pub fn resolve_location(base: &Uri, location: &str) -> Result<Uri, FetchError> {
    if location.starts_with("https://") || location.starts_with("http://") {
        return Ok(location.parse()?);
    }

    let path = if location.starts_with('/') {
        String::from(location)
    } else {
        let dir = base.path().rsplit_once('/').map_or("", |(dir, _)| dir);
        format!("{dir}/{location}")
    };

    let mut parts = Parts::default();
    parts.scheme = base.scheme().cloned();
    parts.authority = base.authority().cloned();
    parts.path_and_query = Some(path.parse::<PathAndQuery>()?);
    Uri::from_parts(parts).map_err(|err| FetchError::Http(err.into()))
}
