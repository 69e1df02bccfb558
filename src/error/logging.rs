use std::any::Any;

use statehub_error::{ErrorExt, StatusCode};
use thiserror::Error;

/// Ошибки инициализации логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("log directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging is already initialized")]
    AlreadyInitialized,
}

impl ErrorExt for LoggingError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoggingError::InvalidFilter { .. } => StatusCode::InvalidConfig,
            LoggingError::Io(_) => StatusCode::Io,
            LoggingError::AlreadyInitialized => StatusCode::AlreadyInitialized,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
