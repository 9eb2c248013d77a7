//! Channel extraction via the identity trick
//!
//! The extractor never evolves states itself. It builds an identity probe,
//! binds the caller's operations onto the probe copies of each target mode,
//! hands both to the simulator in a single call, and relabels the output
//! tensor into the requested representation.

use crate::accuracy::{assess_channel, assess_unitary};
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::probe::{IdentityProbe, ProbeLayout};
use crate::representation::{ChannelRepresentation, ChoiTensor, RepresentationKind, UnitaryTensor};
use crate::result::Extraction;
use qchan_core::{ChannelSimulator, ModeId, Operation, SimulationError, TensorState};
use std::collections::HashMap;
use tracing::debug;

/// Extracts numerical channel representations from a black-box simulator
///
/// # Example
///
/// ```
/// use qchan_core::ModeId;
/// use qchan_extract::{ChannelExtractor, RepresentationKind};
/// use qchan_fock::{ops, FockSimulator};
///
/// let extractor = ChannelExtractor::new(FockSimulator::default());
/// let m0 = ModeId::new(0);
///
/// let choi = extractor
///     .extract_channel(&[ops::loss(0.9, m0)], 4, &[m0], RepresentationKind::Choi)
///     .unwrap();
/// assert!(!choi.has_warnings());
/// ```
#[derive(Debug, Clone)]
pub struct ChannelExtractor<S> {
    simulator: S,
    config: ExtractorConfig,
}

impl<S: ChannelSimulator> ChannelExtractor<S> {
    /// Create an extractor with default configuration
    pub fn new(simulator: S) -> Self {
        Self::with_config(simulator, ExtractorConfig::default())
    }

    /// Create an extractor with the given configuration
    pub fn with_config(simulator: S, config: ExtractorConfig) -> Self {
        Self { simulator, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Get the simulator
    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Extract the unitary of a purely unitary operation sequence
    ///
    /// Each target mode gets a probe and a readout slot joined by a
    /// `cutoff_dim × cutoff_dim` identity; the operations run on the probe
    /// slots only. The output's `(probe, readout)` axes are `U[out, in]`.
    ///
    /// Operations must be unitary; this is not checked here.
    ///
    /// # Errors
    /// - [`ExtractError::InvalidConfiguration`] for bad cutoffs or mode sets
    /// - [`ExtractError::Simulation`] if the simulator fails
    pub fn extract_unitary(
        &self,
        operations: &[Operation],
        cutoff_dim: usize,
        target_modes: &[ModeId],
    ) -> Result<Extraction<UnitaryTensor>> {
        let layout = ProbeLayout::Unitary;
        let program = self.bind(operations, cutoff_dim, target_modes, layout)?;
        let output = self.probe_once(&program, cutoff_dim, target_modes.len(), layout)?;

        let unitary = UnitaryTensor::new(output.into_data(), target_modes, cutoff_dim)?;
        let warning = if self.config.check_accuracy {
            assess_unitary(&unitary, self.config.accuracy_tolerance)
        } else {
            None
        };

        debug!(
            simulator = self.simulator.name(),
            cutoff = cutoff_dim,
            modes = target_modes.len(),
            warned = warning.is_some(),
            "extracted unitary"
        );
        Ok(Extraction::new(unitary, warning))
    }

    /// Extract the Choi or Liouville tensor of a general channel
    ///
    /// Each target mode gets a readout and a probe slot whose density-matrix
    /// rows and columns are tied by identities; the operations run on the
    /// probe slots. The output axes are the Choi layout `(j, l, i, m)`;
    /// Liouville is the relabeling `L_{m,l,i,j} = J_{j,l,i,m}`.
    ///
    /// # Errors
    /// - [`ExtractError::InvalidConfiguration`] if `representation` is
    ///   [`RepresentationKind::Unitary`], or for bad cutoffs or mode sets
    /// - [`ExtractError::Simulation`] if the simulator fails
    pub fn extract_channel(
        &self,
        operations: &[Operation],
        cutoff_dim: usize,
        target_modes: &[ModeId],
        representation: RepresentationKind,
    ) -> Result<Extraction<ChannelRepresentation>> {
        if representation == RepresentationKind::Unitary {
            return Err(ExtractError::invalid(
                "extract_channel produces choi or liouville; use extract_unitary for unitaries",
            ));
        }

        let layout = ProbeLayout::Channel;
        let program = self.bind(operations, cutoff_dim, target_modes, layout)?;
        let output = self.probe_once(&program, cutoff_dim, target_modes.len(), layout)?;

        let choi = ChoiTensor::new(output.into_data(), target_modes)?;
        let warning = if self.config.check_accuracy {
            assess_channel(&choi, self.config.accuracy_tolerance)?
        } else {
            None
        };

        let value = match representation {
            RepresentationKind::Liouville => ChannelRepresentation::Liouville(choi.to_liouville()?),
            _ => ChannelRepresentation::Choi(choi),
        };

        debug!(
            simulator = self.simulator.name(),
            cutoff = cutoff_dim,
            modes = target_modes.len(),
            representation = %representation,
            warned = warning.is_some(),
            "extracted channel"
        );
        Ok(Extraction::new(value, warning))
    }

    /// Extract whichever representation `kind` names
    pub fn extract(
        &self,
        operations: &[Operation],
        cutoff_dim: usize,
        target_modes: &[ModeId],
        kind: RepresentationKind,
    ) -> Result<Extraction<ChannelRepresentation>> {
        match kind {
            RepresentationKind::Unitary => Ok(self
                .extract_unitary(operations, cutoff_dim, target_modes)?
                .map(ChannelRepresentation::Unitary)),
            _ => self.extract_channel(operations, cutoff_dim, target_modes, kind),
        }
    }

    /// Validate the request and rebind operations onto probe slots
    ///
    /// Every check here runs before the simulator is touched.
    fn bind(
        &self,
        operations: &[Operation],
        cutoff_dim: usize,
        target_modes: &[ModeId],
        layout: ProbeLayout,
    ) -> Result<Vec<Operation>> {
        if cutoff_dim == 0 {
            return Err(ExtractError::invalid("cutoff dimension must be at least 1"));
        }
        if target_modes.is_empty() {
            return Err(ExtractError::invalid("at least one target mode is required"));
        }

        let mut slots: HashMap<ModeId, ModeId> = HashMap::with_capacity(target_modes.len());
        for (k, &mode) in target_modes.iter().enumerate() {
            if slots.insert(mode, layout.probe_slot(k)).is_some() {
                return Err(ExtractError::invalid(format!(
                    "target mode {} listed twice",
                    mode
                )));
            }
        }

        for (index, op) in operations.iter().enumerate() {
            if op.modes().is_empty() {
                return Err(ExtractError::invalid(format!(
                    "operation {} ({}) acts on no modes",
                    index,
                    op.name()
                )));
            }
            let modes = op.modes();
            if let Some((pos, repeated)) = modes
                .iter()
                .enumerate()
                .find(|(pos, m)| modes[..*pos].contains(*m))
            {
                return Err(ExtractError::invalid(format!(
                    "operation {} ({}) lists mode {} twice (position {})",
                    index, op, repeated, pos
                )));
            }
            if let Some(stray) = modes.iter().find(|m| !slots.contains_key(*m)) {
                return Err(ExtractError::invalid(format!(
                    "operation {} ({}) acts on mode {} which is not a target mode",
                    index, op, stray
                )));
            }
        }

        let rank = layout.rank(target_modes.len());
        let elements = u32::try_from(rank)
            .ok()
            .and_then(|r| cutoff_dim.checked_pow(r))
            .filter(|&e| e <= self.config.max_probe_elements)
            .ok_or_else(|| {
                ExtractError::invalid(format!(
                    "probe of {}^{} elements exceeds the limit of {}",
                    cutoff_dim, rank, self.config.max_probe_elements
                ))
            })?;

        debug!(
            cutoff = cutoff_dim,
            modes = target_modes.len(),
            operations = operations.len(),
            probe_elements = elements,
            "building identity probe"
        );

        Ok(operations
            .iter()
            .map(|op| op.remap(|m| slots.get(&m).copied().unwrap_or(m)))
            .collect())
    }

    /// Build the probe and run the simulator exactly once
    fn probe_once(
        &self,
        program: &[Operation],
        cutoff_dim: usize,
        num_targets: usize,
        layout: ProbeLayout,
    ) -> Result<TensorState> {
        let probe = IdentityProbe::new(layout, num_targets, cutoff_dim)?;
        let output = self.simulator.run(probe.into_state(), program, cutoff_dim)?;

        let expected_rank = layout.rank(num_targets);
        if output.kind() != layout.state_kind()
            || output.rank() != expected_rank
            || output.cutoff() != cutoff_dim
        {
            return Err(SimulationError::dimension_mismatch(
                format!(
                    "{} state of rank {} at cutoff {}",
                    layout.state_kind(),
                    expected_rank,
                    cutoff_dim
                ),
                format!(
                    "{} state of rank {} at cutoff {}",
                    output.kind(),
                    output.rank(),
                    output.cutoff()
                ),
            )
            .into());
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use parking_lot::Mutex;
    use qchan_core::Result as SimResult;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the probe unchanged and counts calls
    #[derive(Debug, Default)]
    struct Passthrough {
        calls: AtomicUsize,
    }

    impl ChannelSimulator for Passthrough {
        fn name(&self) -> &str {
            "passthrough"
        }

        fn run(&self, initial: TensorState, _: &[Operation], _: usize) -> SimResult<TensorState> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(initial)
        }
    }

    /// Always fails and counts calls
    #[derive(Debug, Default)]
    struct Failing {
        calls: AtomicUsize,
    }

    impl ChannelSimulator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn run(&self, _: TensorState, _: &[Operation], _: usize) -> SimResult<TensorState> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SimulationError::Backend("truncation overflow".to_string()))
        }
    }

    /// Records the program it was given
    #[derive(Debug, Default)]
    struct Recording {
        program: Mutex<Vec<Operation>>,
    }

    impl ChannelSimulator for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn run(
            &self,
            initial: TensorState,
            program: &[Operation],
            _: usize,
        ) -> SimResult<TensorState> {
            *self.program.lock() = program.to_vec();
            Ok(initial)
        }
    }

    fn m(i: usize) -> ModeId {
        ModeId::new(i)
    }

    #[test]
    fn test_identity_channel_gives_identity_unitary() {
        let extractor = ChannelExtractor::new(Passthrough::default());
        let u = extractor.extract_unitary(&[], 4, &[m(0)]).unwrap().into_value();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(u.matrix()[[i, j]], Complex64::new(expected, 0.0));
            }
        }
        assert_eq!(extractor.simulator().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_identity_channel_choi() {
        let extractor = ChannelExtractor::new(Passthrough::default());
        let repr = extractor
            .extract_channel(&[], 3, &[m(0)], RepresentationKind::Choi)
            .unwrap()
            .into_value();
        let choi = repr.as_choi().unwrap();
        // J_{jlim} = δ(i,j) δ(m,l)
        for j in 0..3 {
            for l in 0..3 {
                for i in 0..3 {
                    for mm in 0..3 {
                        let expected = if i == j && mm == l { 1.0 } else { 0.0 };
                        assert_eq!(
                            choi.tensor().get(&[j, l, i, mm]),
                            Some(Complex64::new(expected, 0.0))
                        );
                    }
                }
            }
        }
        assert_eq!(extractor.simulator().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_operations_bound_to_probe_slots() {
        let extractor = ChannelExtractor::new(Recording::default());
        let op = Operation::new("BSgate", &[0.1], &[m(7), m(3)]).unwrap();

        extractor.extract_unitary(&[op.clone()], 2, &[m(3), m(7)]).unwrap();
        let bound = extractor.simulator().program.lock().clone();
        assert_eq!(bound[0].modes(), &[m(2), m(0)]);

        extractor
            .extract_channel(&[op], 2, &[m(3), m(7)], RepresentationKind::Choi)
            .unwrap();
        let bound = extractor.simulator().program.lock().clone();
        assert_eq!(bound[0].modes(), &[m(3), m(1)]);
    }

    #[test]
    fn test_simulation_error_propagates_without_retry() {
        let extractor = ChannelExtractor::new(Failing::default());
        let err = extractor.extract_unitary(&[], 3, &[m(0)]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::Simulation(SimulationError::Backend("truncation overflow".to_string()))
        );
        assert_eq!(extractor.simulator().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_requests_never_reach_simulator() {
        let extractor = ChannelExtractor::new(Failing::default());
        let stray = Operation::single("Rgate", &[0.3], m(5));

        let cases = vec![
            extractor.extract_unitary(&[], 0, &[m(0)]),
            extractor.extract_unitary(&[], 3, &[]),
            extractor.extract_unitary(&[], 3, &[m(0), m(0)]),
            extractor.extract_unitary(&[stray.clone()], 3, &[m(0)]),
        ];
        for case in cases {
            assert!(matches!(case, Err(ExtractError::InvalidConfiguration(_))));
        }
        assert!(matches!(
            extractor.extract_channel(&[stray], 3, &[m(0)], RepresentationKind::Choi),
            Err(ExtractError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            extractor.extract_channel(&[], 3, &[m(0)], RepresentationKind::Unitary),
            Err(ExtractError::InvalidConfiguration(_))
        ));
        assert_eq!(extractor.simulator().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_repeated_mode_in_operation_rejected() {
        let extractor = ChannelExtractor::new(Failing::default());
        let bs = Operation::new("BSgate", &[0.7, 0.0], &[m(0), m(1)]).unwrap();
        let collapsed = bs.remap(|_| m(0));
        assert_eq!(collapsed.modes(), &[m(0), m(0)]);

        assert!(matches!(
            extractor.extract_unitary(&[collapsed.clone()], 2, &[m(0)]),
            Err(ExtractError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            extractor.extract_channel(&[collapsed], 2, &[m(0), m(1)], RepresentationKind::Choi),
            Err(ExtractError::InvalidConfiguration(_))
        ));
        assert_eq!(extractor.simulator().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_probe_limit() {
        let config = ExtractorConfig::default().with_max_probe_elements(1000);
        let extractor = ChannelExtractor::with_config(Passthrough::default(), config);
        // 6^4 = 1296 > 1000
        assert!(matches!(
            extractor.extract_channel(&[], 6, &[m(0)], RepresentationKind::Choi),
            Err(ExtractError::InvalidConfiguration(_))
        ));
        // 6^2 = 36
        assert!(extractor.extract_unitary(&[], 6, &[m(0)]).is_ok());
        // overflow of cutoff^rank is rejected as well
        assert!(extractor.extract_unitary(&[], usize::MAX, &[m(0)]).is_err());
    }

    #[test]
    fn test_wrong_output_shape_is_simulation_error() {
        #[derive(Debug)]
        struct Shrinking;

        impl ChannelSimulator for Shrinking {
            fn name(&self) -> &str {
                "shrinking"
            }

            fn run(
                &self,
                _: TensorState,
                _: &[Operation],
                cutoff: usize,
            ) -> SimResult<TensorState> {
                TensorState::vacuum(qchan_core::StateKind::Pure, 1, cutoff)
            }
        }

        let extractor = ChannelExtractor::new(Shrinking);
        assert!(matches!(
            extractor.extract_unitary(&[], 3, &[m(0)]),
            Err(ExtractError::Simulation(SimulationError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_extract_dispatch() {
        let extractor = ChannelExtractor::new(Passthrough::default());
        let u = extractor.extract(&[], 2, &[m(0)], RepresentationKind::Unitary).unwrap();
        assert_eq!(u.value.kind(), RepresentationKind::Unitary);
        let l = extractor.extract(&[], 2, &[m(0)], RepresentationKind::Liouville).unwrap();
        assert_eq!(l.value.kind(), RepresentationKind::Liouville);
    }
}
