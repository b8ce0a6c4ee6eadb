use std::fmt;

use crate::common::errors::ConfigError;

#[derive(Debug)]
pub enum WorkloadError {
    Parse { line: usize, reason: String },

    InvalidParams(String),

    Config(ConfigError),

    Io(std::io::Error),
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadError::Parse { line, reason } => {
                write!(f, "workload error: line {}: {}", line, reason)
            }

            WorkloadError::InvalidParams(reason) => {
                write!(f, "workload error: invalid parameters ({})", reason)
            }

            WorkloadError::Config(e) => write!(f, "workload error: {}", e),

            WorkloadError::Io(e) => write!(f, "workload IO error: {}", e),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkloadError::Config(e) => Some(e),
            WorkloadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WorkloadError {
    fn from(e: std::io::Error) -> Self {
        WorkloadError::Io(e)
    }
}

impl From<ConfigError> for WorkloadError {
    fn from(e: ConfigError) -> Self {
        WorkloadError::Config(e)
    }
}
