//! Fock-space channel simulator
//!
//! Evolves kets and density matrices over truncated bosonic modes. Gates
//! act as ψ → Uψ (pure) or ρ → U ρ U† (mixed); channels act as
//! ρ → Σ_k A_k ρ A_k† and are only accepted on mixed states.

use crate::config::FockConfig;
use crate::contract::apply_on_axes;
use crate::{channels, gates, ops};
use ndarray::{Array2, ArrayD};
use num_complex::Complex64;
use qchan_core::{
    ChannelSimulator, KrausSet, Operation, Result, SimulationError, StateKind, TensorState,
};
use tracing::trace;

/// How a resolved operation acts on a state
enum Action {
    Unitary(Array2<Complex64>),
    Channel(KrausSet),
}

/// Truncated Fock-space simulator
///
/// # Example
///
/// ```
/// use qchan_core::{ChannelSimulator, ModeId, StateKind, TensorState};
/// use qchan_fock::{ops, FockSimulator};
///
/// let sim = FockSimulator::default();
/// let rho = TensorState::vacuum(StateKind::Mixed, 1, 5).unwrap();
/// let out = sim.run(rho, &[ops::loss(0.5, ModeId::new(0))], 5).unwrap();
/// assert!((out.trace() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FockSimulator {
    config: FockConfig,
}

impl FockSimulator {
    /// Create a simulator with the given configuration
    pub fn new(config: FockConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &FockConfig {
        &self.config
    }

    /// Resolve an operation into its matrix or Kraus action
    fn resolve(&self, op: &Operation, cutoff: usize) -> Result<Action> {
        match op.name() {
            ops::ROTATION => {
                expect_modes(op, 1)?;
                let phi = param(op, 0, None)?;
                expect_max_params(op, 1)?;
                Ok(Action::Unitary(gates::rotation(phi, cutoff)))
            }
            ops::DISPLACEMENT => {
                expect_modes(op, 1)?;
                let r = param(op, 0, None)?;
                let phi = param(op, 1, Some(0.0))?;
                expect_max_params(op, 2)?;
                Ok(Action::Unitary(gates::displacement(r, phi, cutoff)))
            }
            ops::SQUEEZING => {
                expect_modes(op, 1)?;
                let r = param(op, 0, None)?;
                let phi = param(op, 1, Some(0.0))?;
                expect_max_params(op, 2)?;
                Ok(Action::Unitary(gates::squeezing(r, phi, cutoff)))
            }
            ops::BEAMSPLITTER => {
                expect_modes(op, 2)?;
                let theta = param(op, 0, None)?;
                let phi = param(op, 1, Some(0.0))?;
                expect_max_params(op, 2)?;
                Ok(Action::Unitary(gates::beamsplitter(theta, phi, cutoff)))
            }
            ops::LOSS => {
                expect_modes(op, 1)?;
                let eta = param(op, 0, None)?;
                expect_max_params(op, 1)?;
                Ok(Action::Channel(channels::loss_kraus(eta, cutoff)?))
            }
            other => Err(SimulationError::unsupported(
                other,
                "not in the Fock backend vocabulary",
            )),
        }
    }

    fn apply(
        &self,
        data: ArrayD<Complex64>,
        kind: StateKind,
        action: &Action,
        slots: &[usize],
        op: &Operation,
    ) -> Result<ArrayD<Complex64>> {
        match (kind, action) {
            (StateKind::Pure, Action::Unitary(u)) => apply_on_axes(data, u, slots),
            (StateKind::Pure, Action::Channel(_)) => Err(SimulationError::unsupported(
                op.name(),
                "channels require a mixed state",
            )),
            (StateKind::Mixed, Action::Unitary(u)) => {
                let (rows, cols) = row_col_axes(slots);
                let u_conj = u.mapv(|z| z.conj());
                let data = apply_on_axes(data, u, &rows)?;
                apply_on_axes(data, &u_conj, &cols)
            }
            (StateKind::Mixed, Action::Channel(kraus)) => {
                let (rows, cols) = row_col_axes(slots);
                let mut acc: Option<ArrayD<Complex64>> = None;
                for a in kraus.operators() {
                    let a_conj = a.mapv(|z| z.conj());
                    let term = apply_on_axes(data.clone(), a, &rows)?;
                    let term = apply_on_axes(term, &a_conj, &cols)?;
                    acc = Some(match acc {
                        Some(sum) => sum + term,
                        None => term,
                    });
                }
                acc.ok_or(SimulationError::EmptyKrausSet)
            }
        }
    }
}

impl ChannelSimulator for FockSimulator {
    fn name(&self) -> &str {
        "fock"
    }

    fn run(
        &self,
        initial: TensorState,
        program: &[Operation],
        cutoff: usize,
    ) -> Result<TensorState> {
        if initial.cutoff() != cutoff {
            return Err(SimulationError::dimension_mismatch(
                format!("cutoff {}", cutoff),
                format!("state cutoff {}", initial.cutoff()),
            ));
        }

        let kind = initial.kind();
        let num_modes = initial.num_modes();
        let mut state = initial;

        for (index, op) in program.iter().enumerate() {
            let mut slots = Vec::with_capacity(op.num_modes());
            for &mode in op.modes() {
                if mode.index() >= num_modes {
                    return Err(SimulationError::InvalidMode { mode, num_modes });
                }
                slots.push(mode.index());
            }

            let action = self.resolve(op, cutoff)?;
            trace!(index, operation = %op, %kind, "applying operation");
            let data = self.apply(state.into_data(), kind, &action, &slots, op)?;
            state = TensorState::new(kind, data)?;

            if self.config.finite_check && !state.is_finite() {
                return Err(SimulationError::NumericalInstability {
                    operation: op.to_string(),
                    reason: "non-finite amplitude".to_string(),
                });
            }
        }

        Ok(state)
    }
}

/// Row and column axes of the given modes in a mixed state tensor
fn row_col_axes(slots: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let rows = slots.iter().map(|&s| 2 * s).collect();
    let cols = slots.iter().map(|&s| 2 * s + 1).collect();
    (rows, cols)
}

fn expect_modes(op: &Operation, expected: usize) -> Result<()> {
    if op.num_modes() != expected {
        return Err(SimulationError::ModeCountMismatch {
            operation: op.name().to_string(),
            expected,
            actual: op.num_modes(),
        });
    }
    Ok(())
}

fn expect_max_params(op: &Operation, max: usize) -> Result<()> {
    if op.params().len() > max {
        return Err(SimulationError::invalid_parameter(
            op.name(),
            format!("expected at most {} parameters, got {}", max, op.params().len()),
        ));
    }
    Ok(())
}

fn param(op: &Operation, index: usize, default: Option<f64>) -> Result<f64> {
    let value = op.param(index).or(default).ok_or_else(|| {
        SimulationError::invalid_parameter(op.name(), format!("missing parameter {}", index))
    })?;
    if !value.is_finite() {
        return Err(SimulationError::invalid_parameter(
            op.name(),
            format!("parameter {} is not finite", index),
        ));
    }
    Ok(value)
}
