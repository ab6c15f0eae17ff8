//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid or unsatisfiable target dimensions.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer or geometry error from the core types.
    #[error(transparent)]
    Core(#[from] pixkit_core::Error),
}

impl OpsError {
    /// Returns `true` if a rectangle fell outside its buffer.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_bounds_error())
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
