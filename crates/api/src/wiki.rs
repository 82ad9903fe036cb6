use crate::{
    error,
    fetch::{Fetch, FetchError, Reply},
};
use serde::de::DeserializeOwned;

/// Gateway to the summary, related-pages and search endpoints of one Wikipedia edition.
pub struct Wiki<F> {
    fetcher: F,
    /// Base of the REST API, e.g. `https://pt.wikipedia.org/api/rest_v1`.
    rest: Box<str>,
    /// The legacy action API, e.g. `https://pt.wikipedia.org/w/api.php`.
    action: Box<str>,
}

impl<F> Wiki<F> {
    pub fn new(fetcher: F, lang: &str) -> Self {
        let rest = format!("https://{lang}.wikipedia.org/api/rest_v1").into_boxed_str();
        let action = format!("https://{lang}.wikipedia.org/w/api.php").into_boxed_str();
        Self { fetcher, rest, action }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn summary_url(&self, title: &str) -> String {
        format!("{}/page/summary/{}", self.rest, urlencoding::encode(title))
    }

    pub fn related_url(&self, title: &str) -> String {
        format!("{}/page/related/{}", self.rest, urlencoding::encode(title))
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?action=query&list=search&format=json&utf8=1&srlimit=10&srsearch={}",
            self.action,
            urlencoding::encode(query)
        )
    }
}

impl<F: Fetch> Wiki<F> {
    async fn fetch(&self, url: String) -> Result<Reply, FetchError> {
        let uri = url.parse()?;
        self.fetcher.get(uri).await
    }

    pub async fn fetch_summary(&self, title: &str) -> Result<Reply, FetchError> {
        self.fetch(self.summary_url(title)).await
    }

    pub async fn fetch_related(&self, title: &str) -> Result<Reply, FetchError> {
        self.fetch(self.related_url(title)).await
    }

    pub async fn fetch_search(&self, query: &str) -> Result<Reply, FetchError> {
        self.fetch(self.search_url(query)).await
    }
}

/// Parses an upstream JSON body regardless of its status.
pub fn decode<T: DeserializeOwned>(reply: &Reply) -> error::Result<T> {
    Ok(serde_json::from_slice(&reply.body)?)
}
