use std::fmt;
use std::io;

/// Why a single citation could not be turned into a passage.
///
/// None of these abort a batch; each one only turns its own citation into a
/// [`BadReference`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("malformed reference: {0}")]
    MalformedSyntax(&'static str),
    #[error("unknown book: {0}")]
    UnresolvedBook(String),
    #[error("invalid number: {0}")]
    InvalidNumeric(String),
    #[error("no text found")]
    NotFoundInStore,
}

/// A citation that failed somewhere between parsing and lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadReference {
    pub raw: String,
    pub error: ReferenceError,
}

impl BadReference {
    pub fn new(raw: &str, error: ReferenceError) -> BadReference {
        BadReference {
            raw: raw.to_string(),
            error,
        }
    }
}

impl fmt::Display for BadReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.raw, self.error)
    }
}

impl std::error::Error for BadReference {}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No input provided")]
    NoInput,
    #[error("DB: {0}")]
    NoDatabaseConnection(String),
    #[error("template {name}: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}
