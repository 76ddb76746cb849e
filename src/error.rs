use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{procedure} expects {expected} argument(s), got {actual}")]
    Arity {
        procedure: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{procedure}: argument {position} must be {expected}, got {actual}")]
    ArgumentType {
        procedure: &'static str,
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
