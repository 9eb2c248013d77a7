//! Extractor configuration

use serde::{Deserialize, Serialize};

/// Configuration for the channel extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Threshold for the truncation advisory
    ///
    /// A [`crate::NumericalAccuracyWarning`] is attached when the norm lost
    /// from the vacuum input, or the population it places on the top Fock
    /// level, exceeds this value.
    ///
    /// Default: 1e-6
    pub accuracy_tolerance: f64,

    /// Run the truncation advisory after each extraction
    ///
    /// Default: true
    pub check_accuracy: bool,

    /// Largest identity probe, in complex elements, that will be built
    ///
    /// Unitary probes hold cutoff^(2n) elements, channel probes
    /// cutoff^(4n). Larger requests are rejected before simulation.
    ///
    /// Default: 2^26 (1 GiB of Complex64)
    pub max_probe_elements: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            accuracy_tolerance: 1e-6,
            check_accuracy: true,
            max_probe_elements: 1 << 26,
        }
    }
}

impl ExtractorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Tight advisory threshold for high-accuracy work
    pub fn strict() -> Self {
        Self {
            accuracy_tolerance: 1e-10,
            ..Default::default()
        }
    }

    /// Skip the truncation advisory
    pub fn unchecked() -> Self {
        Self {
            check_accuracy: false,
            ..Default::default()
        }
    }

    /// Set the advisory threshold
    pub fn with_accuracy_tolerance(mut self, tolerance: f64) -> Self {
        self.accuracy_tolerance = tolerance;
        self
    }

    /// Enable or disable the advisory
    pub fn with_accuracy_check(mut self, enabled: bool) -> Self {
        self.check_accuracy = enabled;
        self
    }

    /// Set the probe size limit
    pub fn with_max_probe_elements(mut self, limit: usize) -> Self {
        self.max_probe_elements = limit;
        self
    }
}
