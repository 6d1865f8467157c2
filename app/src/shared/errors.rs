use thiserror::Error;

use crate::modules::chat::{ApplicationError, LLMError};
use crate::modules::config::ConfigError;
use crate::view::ViewError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Chat error: {0}")]
    ApplicationError(#[from] ApplicationError),

    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("View error: {0}")]
    ViewError(#[from] ViewError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_layer() {
        let err: AppError = ConfigError::StorageError("disk full".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error:"));

        let err: AppError = LLMError::NetworkError("offline".to_string()).into();
        assert!(err.to_string().contains("offline"));
    }
}
