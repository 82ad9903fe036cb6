use core::future::Future;
use db::Database;
use model::Score;

/// Persistence capability behind `POST /score`.
pub trait ScoreStore {
    /// Resolves (or creates) the user by exact name and appends the score.
    fn record_score(&self, user: &str, score: f64) -> impl Future<Output = db::error::Result<()>> + Send;
}

impl ScoreStore for Database {
    fn record_score(&self, user: &str, score: f64) -> impl Future<Output = db::error::Result<()>> + Send {
        Database::record_score(self, user, score)
    }
}

/// Parses a submission. The user must be a non-empty string and the score any JSON number.
pub fn parse_submission(body: &[u8]) -> Option<Score> {
    let score: Score = serde_json::from_slice(body).ok()?;
    if score.user.is_empty() {
        return None;
    }
    Some(score)
}
