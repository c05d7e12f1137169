use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of a transaction a name was searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    Sender,
    /// Sender or beneficiary.
    Client,
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientRole::Sender => write!(f, "Sender"),
            ClientRole::Client => write!(f, "Client"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("{role} not found: {name}")]
    NotFound { name: String, role: ClientRole },
}

/// Shape problems in a single raw record.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("issue fields must be all present or all absent")]
    PartialIssue,

    #[error("amount pushes the total beyond the representable range")]
    AmountOverflow,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: RecordError,
    },

    #[error("Malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    /// True for errors caused by the shape or encoding of the input rather than
    /// by the environment.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            LoadError::InvalidRecord { .. } | LoadError::Json(_) | LoadError::Csv(_)
        )
    }
}
