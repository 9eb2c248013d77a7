//! Tensor-indexed states over truncated bosonic modes
//!
//! A [`TensorState`] stores amplitudes or density-matrix elements of `n`
//! modes, each truncated to `cutoff` Fock levels.
//!
//! # Layout
//!
//! - **Pure**: rank `n`, axis `k` is the Fock index of mode `k`
//! - **Mixed**: rank `2n`, axes ordered `(row_0, col_0, row_1, col_1, ...)`
//!
//! States are not required to be normalized; identity probes used for
//! channel extraction have trace equal to a power of the cutoff.

use crate::{Result, SimulationError};
use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a state stores a ket or a density matrix
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// State vector, one axis per mode
    Pure,
    /// Density matrix, a (row, col) axis pair per mode
    Mixed,
}

impl StateKind {
    /// Number of tensor axes each mode contributes
    #[inline]
    pub const fn axes_per_mode(&self) -> usize {
        match self {
            StateKind::Pure => 1,
            StateKind::Mixed => 2,
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Pure => write!(f, "pure"),
            StateKind::Mixed => write!(f, "mixed"),
        }
    }
}

/// Dense state tensor over truncated modes
#[derive(Clone, Debug, PartialEq)]
pub struct TensorState {
    kind: StateKind,
    num_modes: usize,
    cutoff: usize,
    data: ArrayD<Complex64>,
}

impl TensorState {
    /// Wrap a tensor, inferring mode count and cutoff from its shape
    ///
    /// # Errors
    /// Returns error if the tensor is rank 0, axes differ in length, or a
    /// mixed tensor has odd rank
    pub fn new(kind: StateKind, data: ArrayD<Complex64>) -> Result<Self> {
        let rank = data.ndim();
        let per_mode = kind.axes_per_mode();

        if rank == 0 || rank % per_mode != 0 {
            return Err(SimulationError::dimension_mismatch(
                format!("{} axes per mode for a {} state", per_mode, kind),
                format!("rank {}", rank),
            ));
        }

        let cutoff = data.shape()[0];
        if cutoff == 0 {
            return Err(SimulationError::dimension_mismatch(
                "cutoff >= 1",
                "cutoff 0",
            ));
        }
        if let Some(&bad) = data.shape().iter().find(|&&len| len != cutoff) {
            return Err(SimulationError::dimension_mismatch(
                format!("all axes of length {}", cutoff),
                format!("axis of length {}", bad),
            ));
        }

        Ok(Self {
            kind,
            num_modes: rank / per_mode,
            cutoff,
            data,
        })
    }

    /// Wrap a state-vector tensor
    pub fn pure(data: ArrayD<Complex64>) -> Result<Self> {
        Self::new(StateKind::Pure, data)
    }

    /// Wrap a density-matrix tensor
    pub fn mixed(data: ArrayD<Complex64>) -> Result<Self> {
        Self::new(StateKind::Mixed, data)
    }

    /// Create the all-vacuum state |0...0⟩ (or |0...0⟩⟨0...0|)
    pub fn vacuum(kind: StateKind, num_modes: usize, cutoff: usize) -> Result<Self> {
        let shape = vec![cutoff; num_modes * kind.axes_per_mode()];
        let mut data = ArrayD::zeros(IxDyn(&shape));
        if let Some(first) = data.iter_mut().next() {
            *first = Complex64::new(1.0, 0.0);
        }
        Self::new(kind, data)
    }

    /// Create a pure state from row-major amplitudes
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != cutoff^num_modes`
    pub fn from_amplitudes(
        num_modes: usize,
        cutoff: usize,
        amplitudes: &[Complex64],
    ) -> Result<Self> {
        let shape = vec![cutoff; num_modes];
        let data = ArrayD::from_shape_vec(IxDyn(&shape), amplitudes.to_vec()).map_err(|_| {
            SimulationError::dimension_mismatch(
                format!("{} amplitudes", cutoff.pow(num_modes as u32)),
                format!("{} amplitudes", amplitudes.len()),
            )
        })?;
        Self::pure(data)
    }

    /// Get the state kind
    #[inline]
    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Get the number of modes
    #[inline]
    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    /// Get the per-mode truncation dimension
    #[inline]
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Get the tensor rank
    #[inline]
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// Get the underlying tensor
    #[inline]
    pub fn data(&self) -> &ArrayD<Complex64> {
        &self.data
    }

    /// Consume the state, returning the tensor
    pub fn into_data(self) -> ArrayD<Complex64> {
        self.data
    }

    /// Get a single element by multi-index
    pub fn get(&self, index: &[usize]) -> Option<Complex64> {
        self.data.get(IxDyn(index)).copied()
    }

    /// Convert a pure state into its density matrix ρ = |ψ⟩⟨ψ|
    ///
    /// Mixed states are returned unchanged.
    pub fn to_mixed(&self) -> Self {
        match self.kind {
            StateKind::Mixed => self.clone(),
            StateKind::Pure => {
                let n = self.num_modes;
                let shape = vec![self.cutoff; 2 * n];
                let mut rows = vec![0usize; n];
                let mut cols = vec![0usize; n];
                let data = ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
                    for k in 0..n {
                        rows[k] = idx[2 * k];
                        cols[k] = idx[2 * k + 1];
                    }
                    self.data[IxDyn(&rows)] * self.data[IxDyn(&cols)].conj()
                });
                Self {
                    kind: StateKind::Mixed,
                    num_modes: n,
                    cutoff: self.cutoff,
                    data,
                }
            }
        }
    }

    /// Trace of a mixed state, squared norm of a pure state
    pub fn trace(&self) -> f64 {
        match self.kind {
            StateKind::Pure => self.data.iter().map(|a| a.norm_sqr()).sum(),
            StateKind::Mixed => {
                let n = self.num_modes;
                self.data
                    .indexed_iter()
                    .filter(|(idx, _)| (0..n).all(|k| idx[2 * k] == idx[2 * k + 1]))
                    .map(|(_, v)| v.re)
                    .sum()
            }
        }
    }

    /// Whether every element is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|z| z.re.is_finite() && z.im.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vacuum_shapes() {
        let pure = TensorState::vacuum(StateKind::Pure, 3, 4).unwrap();
        assert_eq!(pure.rank(), 3);
        assert_eq!(pure.num_modes(), 3);
        assert_eq!(pure.get(&[0, 0, 0]), Some(Complex64::new(1.0, 0.0)));

        let mixed = TensorState::vacuum(StateKind::Mixed, 2, 3).unwrap();
        assert_eq!(mixed.rank(), 4);
        assert_eq!(mixed.num_modes(), 2);
        assert_relative_eq!(mixed.trace(), 1.0);
    }

    #[test]
    fn test_odd_rank_mixed_rejected() {
        let data = ArrayD::zeros(IxDyn(&[3, 3, 3]));
        assert!(matches!(
            TensorState::mixed(data),
            Err(SimulationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_ragged_axes_rejected() {
        let data = ArrayD::zeros(IxDyn(&[3, 4]));
        assert!(TensorState::pure(data).is_err());
    }

    #[test]
    fn test_zero_cutoff_rejected() {
        assert!(TensorState::vacuum(StateKind::Pure, 1, 0).is_err());
    }

    #[test]
    fn test_from_amplitudes_length_check() {
        let amps = vec![Complex64::new(1.0, 0.0); 5];
        assert!(TensorState::from_amplitudes(2, 2, &amps).is_err());
    }

    #[test]
    fn test_to_mixed_outer_product() {
        let s = 0.5f64.sqrt();
        let amps = vec![
            Complex64::new(s, 0.0),
            Complex64::new(0.0, s),
        ];
        let psi = TensorState::from_amplitudes(1, 2, &amps).unwrap();
        let rho = psi.to_mixed();

        assert_eq!(rho.kind(), StateKind::Mixed);
        assert_relative_eq!(rho.trace(), 1.0, epsilon = 1e-12);
        // ρ₀₁ = ψ₀ ψ₁* = s · (-i s)
        let off = rho.get(&[0, 1]).unwrap();
        assert_relative_eq!(off.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(off.im, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_two_mode_to_mixed_axis_order() {
        // |ψ⟩ = |0,1⟩ on two modes with cutoff 2
        let mut amps = vec![Complex64::new(0.0, 0.0); 4];
        amps[1] = Complex64::new(1.0, 0.0);
        let rho = TensorState::from_amplitudes(2, 2, &amps).unwrap().to_mixed();
        // axes: (row_0, col_0, row_1, col_1)
        assert_eq!(rho.get(&[0, 0, 1, 1]), Some(Complex64::new(1.0, 0.0)));
        assert_eq!(rho.get(&[0, 1, 0, 1]), Some(Complex64::new(0.0, 0.0)));
    }
}
