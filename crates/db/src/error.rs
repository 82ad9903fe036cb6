use core::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    /// The database refused the input (e.g. a name that is too long).
    BadInput,
    /// Unrecoverable error.
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadInput => "the database rejected the input",
            Self::Fatal => "unexpected database failure",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
