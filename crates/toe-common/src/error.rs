//! Error types for the glm-toe workspace.

use thiserror::Error;

/// Result type alias using ToeError.
pub type ToeResult<T> = Result<T, ToeError>;

/// Primary error type for TOE aggregation and rendering.
///
/// The taxonomy is deliberately narrow: malformed event records are
/// silently skipped at the ingest boundary and out-of-range tiles degrade
/// to empty transparent images, so errors surface only for broken
/// configuration, bad request parameters, and encoder failures.
#[derive(Debug, Error)]
pub enum ToeError {
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid color ramp: {0}")]
    InvalidRamp(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ToeError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ToeError::InvalidParameter { .. } => 400,
            ToeError::InvalidRamp(_) | ToeError::InvalidConfig(_) => 500,
            ToeError::RenderError(_) | ToeError::EncodeError(_) => 500,
            ToeError::InternalError(_) => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for ToeError {
    fn from(err: std::io::Error) -> Self {
        ToeError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for ToeError {
    fn from(err: serde_json::Error) -> Self {
        ToeError::InternalError(format!("JSON error: {}", err))
    }
}
