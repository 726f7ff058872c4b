//! Error types for kinetic_animation

use thiserror::Error;

/// Configuration errors caught when a component is constructed
///
/// Running animations never fail; every check happens up front.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A cycling component was given nothing to cycle through
    #[error("sequence must contain at least one item")]
    EmptySequence,

    /// A repeating timer would fire continuously
    #[error("interval must be greater than zero")]
    ZeroInterval,

    /// Visibility threshold outside the unit range
    #[error("visibility threshold {0} is outside 0.0..=1.0")]
    InvalidThreshold(f32),

    /// Scroll multiplier is NaN or infinite
    #[error("parallax speed must be finite, got {0}")]
    InvalidSpeed(f32),

    /// String option that does not name a known variant
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl AnimationError {
    pub(crate) fn unknown(kind: &'static str, value: &str, expected: &'static str) -> Self {
        AnimationError::UnknownVariant {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

/// Result type for kinetic_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
