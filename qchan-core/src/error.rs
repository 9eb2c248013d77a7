//! Error types for qchan

use crate::ModeId;
use thiserror::Error;

/// Errors raised while building states or running a channel simulator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Tensor shape does not match the expected mode count or cutoff
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Operation addresses a mode the state does not have
    #[error("Invalid mode {mode}: state has only {num_modes} modes")]
    InvalidMode { mode: ModeId, num_modes: usize },

    /// Same mode listed twice in one operation
    #[error("Duplicate mode {0} in operation")]
    DuplicateMode(ModeId),

    /// Operation applied to the wrong number of modes
    #[error("Operation '{operation}' requires {expected} modes, but {actual} were provided")]
    ModeCountMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// Operation parameters are missing or out of range
    #[error("Invalid parameter for '{operation}': {reason}")]
    InvalidParameter { operation: String, reason: String },

    /// Backend cannot execute this operation on this kind of state
    #[error("Unsupported operation '{operation}': {reason}")]
    UnsupportedOperation { operation: String, reason: String },

    /// Evolution produced non-finite amplitudes
    #[error("Numerical instability in '{operation}': {reason}")]
    NumericalInstability { operation: String, reason: String },

    /// Kraus set with no operators
    #[error("Kraus set must contain at least one operator")]
    EmptyKrausSet,

    /// Backend-specific failure
    #[error("Backend failure: {0}")]
    Backend(String),
}

impl SimulationError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mode_error() {
        let err = SimulationError::InvalidMode {
            mode: ModeId::new(5),
            num_modes: 3,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("m5"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn test_mode_count_error() {
        let err = SimulationError::ModeCountMismatch {
            operation: "BSgate".to_string(),
            expected: 2,
            actual: 1,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("BSgate"));
        assert!(msg.contains("2"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn test_dimension_mismatch_helper() {
        let err = SimulationError::dimension_mismatch("cutoff 4", "cutoff 3");
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected cutoff 4, got cutoff 3"
        );
    }
}
