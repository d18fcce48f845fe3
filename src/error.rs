//! Error type shared by every shading operation.
//!
//! All failures are input-validation failures raised before any output
//! buffer is produced.

use thiserror::Error;

/// Errors returned by the colorizers, the compositor and the spreader.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShadeError {
    #[error("invalid color {spec:?}: {reason}")]
    InvalidColor { spec: String, reason: String },

    #[error("unknown scaling {0:?}, expected one of \"linear\", \"log\", \"cbrt\"")]
    InvalidScaling(String),

    #[error("no color given for category {0:?}")]
    UnknownCategory(String),

    #[error("color key has {got} colors but the aggregate has {expected} categories")]
    ColorCountMismatch { expected: usize, got: usize },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("radius must be >= 0, got {0}")]
    InvalidRadius(i64),

    #[error("mask must be a square 2-D grid with odd side length: {0}")]
    InvalidMask(String),

    #[error("no images to stack")]
    NoImages,

    #[error("min_alpha must be in 0..=255, got {0}")]
    InvalidMinAlpha(u32),

    #[error("threshold must be in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("span must be finite with lo <= hi, got ({0}, {1})")]
    InvalidSpan(f64, f64),

    #[error("unknown composite operator {0:?}, expected \"over\", \"add\" or \"max\"")]
    InvalidCompositeOp(String),
}

impl ShadeError {
    pub(crate) fn color(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        ShadeError::InvalidColor {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShadeError>;
