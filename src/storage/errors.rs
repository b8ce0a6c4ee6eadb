use std::fmt;

use crate::common::errors::ConfigError;

pub type IndexResult<T> = Result<T, IndexError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    Config(ConfigError),

    /// A structural invariant does not hold. Never repaired in place.
    Corrupted { index: &'static str, reason: String },
}

impl IndexError {
    pub fn corrupted(index: &'static str, reason: impl Into<String>) -> Self {
        IndexError::Corrupted {
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Config(e) => write!(f, "index error: {}", e),

            IndexError::Corrupted { index, reason } => {
                write!(f, "index error: {} is corrupted ({})", index, reason)
            }
        }
    }
}

impl std::error::Error for IndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndexError::Config(e) => Some(e),
            IndexError::Corrupted { .. } => None,
        }
    }
}

impl From<ConfigError> for IndexError {
    fn from(e: ConfigError) -> Self {
        IndexError::Config(e)
    }
}
