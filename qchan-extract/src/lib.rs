//! Numerical channel extraction for truncated bosonic simulators
//!
//! Given a sequence of operations and a black-box [`ChannelSimulator`],
//! this crate produces the unitary, Choi or Liouville tensor of the channel
//! the sequence implements. Extraction uses the identity trick: every target
//! mode is paired with an untouched readout copy, the pair is prepared in an
//! unnormalized identity state, and one simulator run yields every matrix
//! element of the channel at once.
//!
//! - [`ChannelExtractor`]: unitary and channel extraction
//! - [`choi_and_liouville_from_kraus`]: tensors from an explicit Kraus set
//! - [`apply_channel_representation`]: evolve a density matrix by a tensor
//!
//! # Example
//!
//! ```
//! use qchan_core::{ModeId, StateKind, TensorState};
//! use qchan_extract::{apply_channel_representation, ChannelExtractor, RepresentationKind};
//! use qchan_fock::{ops, FockSimulator};
//!
//! let extractor = ChannelExtractor::new(FockSimulator::default());
//! let m0 = ModeId::new(0);
//! let liouville = extractor
//!     .extract_channel(&[ops::loss(0.5, m0)], 3, &[m0], RepresentationKind::Liouville)
//!     .unwrap()
//!     .into_value();
//!
//! let rho = TensorState::vacuum(StateKind::Mixed, 1, 3).unwrap();
//! let out = apply_channel_representation(&rho, &liouville).unwrap();
//! assert!((out.trace() - 1.0).abs() < 1e-12);
//! ```
//!
//! [`ChannelSimulator`]: qchan_core::ChannelSimulator

pub mod accuracy;
pub mod apply;
pub mod axes;
pub mod config;
pub mod error;
pub mod extractor;
pub mod kraus;
mod probe;
pub mod representation;
pub mod result;

pub use accuracy::NumericalAccuracyWarning;
pub use apply::apply_channel_representation;
pub use axes::{AxisRole, LabeledTensor, Side, Slot};
pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use extractor::ChannelExtractor;
pub use kraus::choi_and_liouville_from_kraus;
pub use representation::{
    ChannelRepresentation, ChoiTensor, LiouvilleTensor, RepresentationKind, UnitaryTensor,
};
pub use result::Extraction;
