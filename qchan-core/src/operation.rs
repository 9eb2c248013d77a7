//! Channel step descriptions

use crate::{ModeId, Result, SimulationError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A single channel step: a gate or noise process bound to modes
///
/// Operations are opaque to everything except the simulator that executes
/// them. The name selects the step in the backend's vocabulary, the
/// parameters are passed through untouched.
///
/// # Example
/// ```
/// use qchan_core::{ModeId, Operation};
///
/// let bs = Operation::new("BSgate", &[0.785, 0.0], &[ModeId::new(0), ModeId::new(1)]).unwrap();
/// assert_eq!(bs.num_modes(), 2);
/// assert_eq!(bs.param(0), Some(0.785));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOperation")]
pub struct Operation {
    name: String,
    params: SmallVec<[f64; 2]>,
    modes: SmallVec<[ModeId; 2]>, // Most steps touch 1-2 modes
}

/// Unchecked wire form; deserialization goes through [`Operation::new`]
#[derive(Deserialize)]
struct RawOperation {
    name: String,
    #[serde(default)]
    params: Vec<f64>,
    modes: Vec<ModeId>,
}

impl TryFrom<RawOperation> for Operation {
    type Error = SimulationError;

    fn try_from(raw: RawOperation) -> Result<Self> {
        Operation::new(raw.name, &raw.params, &raw.modes)
    }
}

impl Operation {
    /// Create a new operation
    ///
    /// # Errors
    /// Returns error if no modes are given or a mode is repeated
    pub fn new(name: impl Into<String>, params: &[f64], modes: &[ModeId]) -> Result<Self> {
        let name = name.into();
        if modes.is_empty() {
            return Err(SimulationError::ModeCountMismatch {
                operation: name,
                expected: 1,
                actual: 0,
            });
        }

        for i in 0..modes.len() {
            for j in (i + 1)..modes.len() {
                if modes[i] == modes[j] {
                    return Err(SimulationError::DuplicateMode(modes[i]));
                }
            }
        }

        Ok(Self {
            name,
            params: SmallVec::from_slice(params),
            modes: SmallVec::from_slice(modes),
        })
    }

    /// Create a single-mode operation
    pub fn single(name: impl Into<String>, params: &[f64], mode: ModeId) -> Self {
        let mut modes = SmallVec::new();
        modes.push(mode);
        Self {
            name: name.into(),
            params: SmallVec::from_slice(params),
            modes,
        }
    }

    /// Get the operation name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all parameters
    #[inline]
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Get a parameter by position
    #[inline]
    pub fn param(&self, index: usize) -> Option<f64> {
        self.params.get(index).copied()
    }

    /// Get the modes this operation acts on
    #[inline]
    pub fn modes(&self) -> &[ModeId] {
        &self.modes
    }

    /// Get the number of modes
    #[inline]
    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    /// Rebind the operation onto other modes
    ///
    /// `map` must be injective on this operation's modes.
    pub fn remap(&self, map: impl Fn(ModeId) -> ModeId) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            modes: self.modes.iter().map(|&m| map(m)).collect(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "(")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", p)?;
            }
            write!(f, ")")?;
        }
        write!(f, " |")?;
        for m in &self.modes {
            write!(f, " {}", m)?;
        }
        Ok(())
    }
}
