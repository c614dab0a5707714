//! Error types for cloudview

use thiserror::Error;

/// Main error type for cloudview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid viewport: {width}x{height} (width and height must be positive)")]
    InvalidViewport { width: u32, height: u32 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Singular transform: {0}")]
    SingularTransform(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for cloudview operations
pub type Result<T> = std::result::Result<T, Error>;
