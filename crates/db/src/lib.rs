#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;

use model::NewUser;
use tokio_postgres::error::SqlState;

pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Statements that bring an empty database up to date. Every statement is idempotent.
const SCHEMA: &str = include_str!("../schema.sql");

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

/// Classifies a driver error. Constraint and encoding violations are the caller's fault.
fn classify(err: tokio_postgres::Error) -> error::Error {
    let Some(db) = err.as_db_error() else {
        log::error!("database connection failure: {err}");
        return error::Error::Fatal;
    };

    match (db.code(), db.constraint()) {
        (&SqlState::CHECK_VIOLATION, Some("users_name_check")) => error::Error::BadInput,
        (&SqlState::CHARACTER_NOT_IN_REPERTOIRE | &SqlState::UNTRANSLATABLE_CHARACTER, _) => error::Error::BadInput,
        _ => {
            log::error!("database rejected statement: {db}");
            error::Error::Fatal
        }
    }
}

impl Database {
    pub async fn migrate(&self) -> error::Result<()> {
        self.0.batch_execute(SCHEMA).await.map_err(classify)
    }

    /// Returns the ID of the user with the exact given name, creating the user with placeholder
    /// contact details if none exists. The upsert runs as a single statement so that concurrent
    /// submissions for the same unseen name resolve to the same row.
    pub async fn resolve_user(&self, name: &str) -> error::Result<i32> {
        let NewUser { name, email, password, phone } = NewUser::placeholder(name);
        let row = self
            .0
            .query_one(
                "INSERT INTO users (name, email, password, phone) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                 RETURNING id",
                &[&name, &email, &password, &phone],
            )
            .await
            .map_err(classify)?;
        row.try_get("id").map_err(classify)
    }

    pub async fn insert_score(&self, user: i32, score: f64) -> error::Result<()> {
        match self.0.execute("INSERT INTO scores (score, user_id) VALUES ($1, $2)", &[&score, &user]).await {
            Ok(1) => Ok(()),
            Ok(_) => Err(error::Error::Fatal),
            Err(err) => Err(classify(err)),
        }
    }

    /// Appends a score for the named user. Scores are never updated nor deleted.
    pub async fn record_score(&self, name: &str, score: f64) -> error::Result<()> {
        let user = self.resolve_user(name).await?;
        self.insert_score(user, score).await
    }
}
