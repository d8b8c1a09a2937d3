//! Error types for wavenet-ml

use thiserror::Error;

/// Result type for wavenet-ml operations
pub type Result<T> = std::result::Result<T, WaveNetError>;

/// wavenet-ml error types
///
/// Every variant is a precondition violation: the caller wired a layer
/// stack or a parameter tensor wrongly. Numerical edge cases (bin mass
/// underflow, CDF saturation) never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveNetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Pad target {target} on axis {axis} is shorter than the current length {actual}")]
    PadTooShort {
        axis: usize,
        target: usize,
        actual: usize,
    },

    #[error("Queue capacity {capacity} cannot hold a window spanning {required} samples")]
    InsufficientCapacity { required: usize, capacity: usize },

    #[error("Invalid mixture parameters: {0}")]
    InvalidMixture(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl WaveNetError {
    pub(crate) fn shape(expected: impl std::fmt::Debug, actual: impl std::fmt::Debug) -> Self {
        WaveNetError::ShapeMismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

impl From<std::io::Error> for WaveNetError {
    fn from(err: std::io::Error) -> Self {
        WaveNetError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for WaveNetError {
    fn from(err: serde_json::Error) -> Self {
        WaveNetError::SerializationError(err.to_string())
    }
}
