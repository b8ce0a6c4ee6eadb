pub mod config;
pub mod errors;
pub mod record;

pub use config::IndexConfig;
pub use errors::ConfigError;
pub use record::{Key, Record};
