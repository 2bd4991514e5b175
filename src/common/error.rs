use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlueError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Looper error: {0}")]
    LooperError(String),
    #[error("Log handler error: {0}")]
    LogHandlerError(String),
}

pub type Result<T> = std::result::Result<T, GlueError>;
