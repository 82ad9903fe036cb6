mod client;
mod error;

pub use client::HttpFetcher;
pub use error::FetchError;

use core::future::Future;
use hyper::body::Bytes;
use hyper::{StatusCode, Uri};

/// Raw upstream response. Non-success statuses are not errors at this level.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Plain `GET` capability. Implementations must surface transport failures as [`FetchError`]
/// and report everything else (including `404`) as a [`Reply`].
pub trait Fetch {
    fn get(&self, uri: Uri) -> impl Future<Output = Result<Reply, FetchError>> + Send;
}
