/// Prescan application errors
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrescanError>;

#[derive(Debug, Error)]
pub enum PrescanError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for PrescanError {
    fn from(err: config::ConfigError) -> Self {
        PrescanError::Config(err.to_string())
    }
}
