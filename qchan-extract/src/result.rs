//! Extraction results

use crate::accuracy::NumericalAccuracyWarning;

/// A successfully extracted representation plus any advisories
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<T> {
    /// The extracted representation
    pub value: T,
    /// Truncation advisories; empty when the cutoff looked adequate
    pub warnings: Vec<NumericalAccuracyWarning>,
}

impl<T> Extraction<T> {
    pub(crate) fn new(value: T, warning: Option<NumericalAccuracyWarning>) -> Self {
        Self {
            value,
            warnings: warning.into_iter().collect(),
        }
    }

    /// Whether any advisory was raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Drop the advisories, keeping the representation
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the representation, keeping the advisories
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extraction<U> {
        Extraction {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
