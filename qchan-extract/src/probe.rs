//! Identity-encoded probe states
//!
//! The probe doubles every target mode into a probe slot and a readout
//! slot tied together by identity matrices. Running the channel on the
//! probe slots turns the channel's matrix into the simulator's output state.

use crate::error::{ExtractError, Result};
use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use qchan_core::{ModeId, StateKind, TensorState};

const ONE: Complex64 = Complex64::new(1.0, 0.0);
const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Slot assignment for a probe over `n` target modes
///
/// Unitary probes put target `k`'s probe copy in slot `2k` and the readout
/// in `2k + 1`. Channel probes use the opposite order, so their output
/// axes come out as `(j, l, i, m)` per mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ProbeLayout {
    Unitary,
    Channel,
}

impl ProbeLayout {
    /// Simulator slot carrying the probe copy of target `k`
    #[inline]
    pub(crate) fn probe_slot(&self, k: usize) -> ModeId {
        match self {
            ProbeLayout::Unitary => ModeId::new(2 * k),
            ProbeLayout::Channel => ModeId::new(2 * k + 1),
        }
    }

    #[inline]
    pub(crate) fn state_kind(&self) -> StateKind {
        match self {
            ProbeLayout::Unitary => StateKind::Pure,
            ProbeLayout::Channel => StateKind::Mixed,
        }
    }

    /// Tensor rank of the probe for `n` target modes
    #[inline]
    pub(crate) fn rank(&self, num_targets: usize) -> usize {
        match self {
            ProbeLayout::Unitary => 2 * num_targets,
            ProbeLayout::Channel => 4 * num_targets,
        }
    }
}

/// Identity probe, built once per extraction and handed to the simulator
#[derive(Debug)]
pub(crate) struct IdentityProbe {
    state: TensorState,
}

impl IdentityProbe {
    /// Build the probe for `num_targets` modes at `cutoff`
    ///
    /// - Unitary: ψ[p₀, r₀, p₁, r₁, …] = Π δ(p_k, r_k)
    /// - Channel: ρ[a₀, b₀, c₀, e₀, …] = Π δ(a_k, c_k) δ(b_k, e_k), where
    ///   `(a, b)` are readout row/col and `(c, e)` probe row/col
    pub(crate) fn new(layout: ProbeLayout, num_targets: usize, cutoff: usize) -> Result<Self> {
        let shape = vec![cutoff; layout.rank(num_targets)];

        let data = match layout {
            ProbeLayout::Unitary => ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
                if (0..num_targets).all(|k| idx[2 * k] == idx[2 * k + 1]) {
                    ONE
                } else {
                    ZERO
                }
            }),
            ProbeLayout::Channel => ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
                let tied = (0..num_targets).all(|k| {
                    idx[4 * k] == idx[4 * k + 2] && idx[4 * k + 1] == idx[4 * k + 3]
                });
                if tied {
                    ONE
                } else {
                    ZERO
                }
            }),
        };

        let state = TensorState::new(layout.state_kind(), data).map_err(ExtractError::from)?;
        Ok(Self { state })
    }

    /// Hand the probe over to the simulator
    pub(crate) fn into_state(self) -> TensorState {
        self.state
    }
}
