//! Subsets of the Wikipedia payloads that the quiz pipeline consumes. Unknown
//! fields are ignored and every optional field defaults to empty.

use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Response of the REST `page/summary/{title}` endpoint. The URL block is typed by default;
/// callers that forward it untouched pick an opaque `U` instead.
#[derive(Debug, Default, Deserialize)]
pub struct Summary<U = ContentUrls> {
    /// Canonical title of the page after redirects.
    #[serde(default)]
    pub title: String,
    /// Wikidata short description.
    pub description: Option<String>,
    /// Plain-text lead section.
    pub extract: Option<String>,
    pub content_urls: Option<U>,
}

impl Summary {
    /// Desktop URL of the article, if the upstream provided one.
    pub fn page_url(&self) -> Option<&str> {
        self.content_urls.as_ref()?.desktop.as_ref()?.page.as_deref()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContentUrls {
    pub desktop: Option<PageUrls>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageUrls {
    pub page: Option<String>,
}

/// Response of the REST `page/related/{title}` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct Related {
    #[serde(default)]
    pub pages: Vec<RelatedPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RelatedPage {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Related {
    /// Non-empty titles in upstream order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().filter_map(|page| page.title.as_deref()).filter(|title| !title.is_empty())
    }

    /// Non-empty short descriptions in upstream order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().filter_map(|page| page.description.as_deref()).filter(|desc| !desc.is_empty())
    }
}

/// Response of the legacy `action=query&list=search` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub query: SearchQuery,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

/// A search hit. The snippet still carries the upstream highlighting markup.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub pageid: u64,
}

impl SearchResults {
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.query.search
    }
}
