use core::fmt::{self, Display};
use http::uri::InvalidUri;

#[derive(Debug)]
pub enum FetchError {
    /// Connection-level failure (DNS, TLS, refused connections).
    Client(hyper_util::client::legacy::Error),
    /// The request could not be constructed.
    Http(http::Error),
    /// The response body was cut off.
    Body(hyper::Error),
    Uri(InvalidUri),
    /// The upstream kept redirecting.
    Redirects,
}

impl From<hyper_util::client::legacy::Error> for FetchError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Client(err)
    }
}

impl From<http::Error> for FetchError {
    fn from(err: http::Error) -> Self {
        Self::Http(err)
    }
}

impl From<hyper::Error> for FetchError {
    fn from(err: hyper::Error) -> Self {
        Self::Body(err)
    }
}

impl From<InvalidUri> for FetchError {
    fn from(err: InvalidUri) -> Self {
        Self::Uri(err)
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(err) => write!(f, "upstream connection failed: {err}"),
            Self::Http(err) => write!(f, "malformed upstream request: {err}"),
            Self::Body(err) => write!(f, "upstream body interrupted: {err}"),
            Self::Uri(err) => write!(f, "invalid upstream URI: {err}"),
            Self::Redirects => f.write_str("too many upstream redirects"),
        }
    }
}

impl std::error::Error for FetchError {}
