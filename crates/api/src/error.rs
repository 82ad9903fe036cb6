use crate::fetch::FetchError;
use core::fmt::{self, Display};
use serde_json::error::Category;

/// Reasons a question builder gives up on a topic.
#[derive(Debug)]
pub enum Error {
    /// The upstream could not be reached.
    Fetch(FetchError),
    /// JSON syntax error detected in the upstream payload.
    Syntax,
    /// Unexpected JSON data types encountered in the upstream payload.
    Data,
    /// The summary endpoint did not find the topic.
    SummaryNotFound,
    /// The related-pages endpoint answered with a failure.
    RelatedUnavailable,
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Data,
            _ => Self::Syntax,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => Display::fmt(err, f),
            Self::Syntax => f.write_str("Erro de sintaxe no JSON da Wikipédia."),
            Self::Data => f.write_str("Tipos inesperados no JSON da Wikipédia."),
            Self::SummaryNotFound => f.write_str("Resumo não encontrado para o título principal."),
            Self::RelatedUnavailable => f.write_str("Não foi possível obter páginas relacionadas."),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
