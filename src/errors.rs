//! Definition of errors.

use std::path::PathBuf;

/// A specialized Result type for the tagger.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for training, decoding and scoring.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No training source was given and none was configured before.
    #[error("no training file given and none configured previously")]
    Configuration,

    /// A training or input file is missing or unreadable.
    #[error("unavailable resource {}: {source}", path.display())]
    UnavailableResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding against an untrained model, or scoring sequences of different lengths.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A persisted model could not be decoded.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Unknown parameter name or a value that does not parse.
    #[error("invalid parameter: {name}={value}")]
    InvalidParameter { name: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unavailable<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::UnavailableResource {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn precondition<S: Into<String>>(msg: S) -> Self {
        Self::Precondition(msg.into())
    }

    pub(crate) fn invalid_parameter(name: &str, value: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::Io(e.into())
        } else {
            Self::InvalidModel(e.to_string())
        }
    }
}
