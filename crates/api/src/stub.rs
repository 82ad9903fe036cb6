//! Canned upstream used by the unit tests.

use crate::{
    fetch::{Fetch, FetchError, Reply},
    wiki::Wiki,
};
use core::{
    future::{self, Future},
    sync::atomic::{AtomicUsize, Ordering},
};
use hyper::{StatusCode, Uri};
use serde_json::Value;
use std::collections::HashMap;

pub const LANG: &str = "pt";

/// Serves fixed replies by exact URL. Unknown URLs answer `404` with an empty object and
/// `None` entries simulate a transport failure.
#[derive(Default)]
pub struct Canned {
    replies: HashMap<String, Option<(StatusCode, String)>>,
    calls: AtomicUsize,
}

impl Canned {
    fn urls() -> Wiki<()> {
        Wiki::new((), LANG)
    }

    fn with(mut self, url: String, reply: Option<(StatusCode, Value)>) -> Self {
        self.replies.insert(url, reply.map(|(status, body)| (status, body.to_string())));
        self
    }

    pub fn summary(self, title: &str, status: StatusCode, body: Value) -> Self {
        self.with(Self::urls().summary_url(title), Some((status, body)))
    }

    pub fn related(self, title: &str, status: StatusCode, body: Value) -> Self {
        self.with(Self::urls().related_url(title), Some((status, body)))
    }

    pub fn search(self, query: &str, status: StatusCode, body: Value) -> Self {
        self.with(Self::urls().search_url(query), Some((status, body)))
    }

    pub fn broken_related(self, title: &str) -> Self {
        self.with(Self::urls().related_url(title), None)
    }

    pub fn broken_search(self, query: &str) -> Self {
        self.with(Self::urls().search_url(query), None)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn into_wiki(self) -> Wiki<Self> {
        Wiki::new(self, LANG)
    }
}

impl Fetch for Canned {
    fn get(&self, uri: Uri) -> impl Future<Output = Result<Reply, FetchError>> + Send {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let reply = match self.replies.get(&uri.to_string()) {
            Some(Some((status, body))) => Ok(Reply { status: *status, body: body.clone().into() }),
            Some(None) => Err(FetchError::Redirects),
            None => Ok(Reply { status: StatusCode::NOT_FOUND, body: "{}".into() }),
        };
        future::ready(reply)
    }
}

/// In-memory users and scores with the same find-or-create semantics as the database.
#[derive(Default)]
pub struct Memory {
    /// User names; the index is the user ID.
    pub users: std::sync::Mutex<Vec<String>>,
    /// Pairs of user ID and score.
    pub scores: std::sync::Mutex<Vec<(usize, f64)>>,
    /// Makes every submission fail as if the database were down.
    pub down: bool,
}

impl crate::score::ScoreStore for Memory {
    fn record_score(&self, user: &str, score: f64) -> impl Future<Output = db::error::Result<()>> + Send {
        let result = if self.down {
            Err(db::error::Error::Fatal)
        } else {
            let mut users = self.users.lock().unwrap();
            let id = match users.iter().position(|name| name == user) {
                Some(id) => id,
                None => {
                    users.push(String::from(user));
                    users.len() - 1
                }
            };
            self.scores.lock().unwrap().push((id, score));
            Ok(())
        };
        future::ready(result)
    }
}
