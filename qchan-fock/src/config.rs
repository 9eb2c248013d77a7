//! Backend configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Fock-space simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FockConfig {
    /// Reject results containing NaN or infinite amplitudes
    ///
    /// Default: true
    pub finite_check: bool,
}

impl Default for FockConfig {
    fn default() -> Self {
        Self { finite_check: true }
    }
}

impl FockConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the finite-amplitude check
    pub fn with_finite_check(mut self, enabled: bool) -> Self {
        self.finite_check = enabled;
        self
    }
}
