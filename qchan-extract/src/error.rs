//! Error types for channel extraction

use qchan_core::SimulationError;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during channel extraction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractError {
    /// Request rejected before the simulator was invoked
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Failure reported by the simulator, passed through unchanged
    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}

impl ExtractError {
    /// Create an invalid configuration error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_error_is_wrapped_verbatim() {
        let inner = SimulationError::Backend("overflow".to_string());
        let err: ExtractError = inner.clone().into();
        assert_eq!(err, ExtractError::Simulation(inner));
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn test_invalid_configuration_message() {
        let err = ExtractError::invalid("cutoff must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: cutoff must be at least 1"
        );
    }
}
