//! Configuration errors.
//!
//! All errors in this crate are construction-time configuration failures:
//! once a model or spawner has been built, no operation returns an error.
//! Transient unavailability (no free column, no free letter) is expressed
//! as `Option`, and duplicate or stale outcome deliveries are absorbed as
//! no-ops.

use thiserror::Error;

use crate::types::Symbol;

/// Fatal configuration errors, raised at construction only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("symbol set is empty")]
    EmptySymbolSet,

    #[error("duplicate symbol '{0}' in symbol set")]
    DuplicateSymbol(Symbol),

    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeParameter { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    #[error("hint bounds must satisfy 0 <= min <= max <= 1, got [{min}, {max}]")]
    InvalidHintBounds { min: f64, max: f64 },

    #[error("fall duration range must be positive and ordered, got [{min}, {max}]")]
    InvalidFallDurationRange { min: f64, max: f64 },

    #[error("initial tested count must be within 1..={max}, got {got}")]
    InvalidTestedCount { got: usize, max: usize },

    #[error("grid must have at least one column")]
    EmptyGrid,
}
