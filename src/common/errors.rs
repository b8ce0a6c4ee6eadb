use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    PageSizeTooSmall { page_size: usize, min: usize },

    NoFields,

    RecordShape { expected: usize, got: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PageSizeTooSmall { page_size, min } => {
                write!(
                    f,
                    "config error: page size must be >= {} bytes, got {}",
                    min, page_size
                )
            }

            ConfigError::NoFields => {
                write!(f, "config error: records need at least one field")
            }

            ConfigError::RecordShape { expected, got } => {
                write!(
                    f,
                    "config error: record has {} fields, index expects {}",
                    got, expected
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
