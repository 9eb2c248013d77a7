//! The channel simulator capability

use crate::{Operation, Result, TensorState};
use std::fmt;

/// A black-box evolution backend
///
/// The simulator takes an initial tensor state, evolves it through an
/// ordered program of operations at a fixed cutoff, and returns a state of
/// the same kind and rank. Operation modes index the modes of `initial`.
///
/// # Implementing a Backend
///
/// ```ignore
/// #[derive(Debug)]
/// struct Passthrough;
///
/// impl ChannelSimulator for Passthrough {
///     fn name(&self) -> &str { "passthrough" }
///
///     fn run(&self, initial: TensorState, _: &[Operation], _: usize) -> Result<TensorState> {
///         Ok(initial)
///     }
/// }
/// ```
pub trait ChannelSimulator: Send + Sync + fmt::Debug {
    /// Name of the backend, used in logs
    fn name(&self) -> &str;

    /// Evolve `initial` through `program`
    ///
    /// # Errors
    /// Returns [`crate::SimulationError`] on invalid operations, dimension
    /// mismatches or numerical failures
    fn run(
        &self,
        initial: TensorState,
        program: &[Operation],
        cutoff: usize,
    ) -> Result<TensorState>;
}

impl<S: ChannelSimulator + ?Sized> ChannelSimulator for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(
        &self,
        initial: TensorState,
        program: &[Operation],
        cutoff: usize,
    ) -> Result<TensorState> {
        (**self).run(initial, program, cutoff)
    }
}

impl<S: ChannelSimulator + ?Sized> ChannelSimulator for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(
        &self,
        initial: TensorState,
        program: &[Operation],
        cutoff: usize,
    ) -> Result<TensorState> {
        (**self).run(initial, program, cutoff)
    }
}
