//! Core types and traits for qchan
//!
//! This crate provides the vocabulary shared by channel simulators and the
//! channel extractor:
//! - [`ModeId`]: Type-safe mode addressing
//! - [`Operation`]: Opaque description of one channel step
//! - [`TensorState`]: Pure or mixed state over truncated modes
//! - [`KrausSet`]: Explicit Kraus decomposition of a channel
//! - [`ChannelSimulator`]: Trait for black-box evolution backends
//!
//! # Example
//! ```
//! use qchan_core::{ModeId, Operation, StateKind, TensorState};
//!
//! let op = Operation::single("Sgate", &[0.5], ModeId::new(0));
//! assert_eq!(op.modes(), &[ModeId::new(0)]);
//!
//! let vacuum = TensorState::vacuum(StateKind::Pure, 2, 4).unwrap();
//! assert_eq!(vacuum.rank(), 2);
//! ```

pub mod error;
pub mod kraus;
pub mod mode;
pub mod operation;
pub mod simulator;
pub mod state;

// Re-exports for convenience
pub use error::SimulationError;
pub use kraus::KrausSet;
pub use mode::ModeId;
pub use num_complex::Complex64;
pub use operation::Operation;
pub use simulator::ChannelSimulator;
pub use state::{StateKind, TensorState};

/// Type alias for results in qchan-core
pub type Result<T> = std::result::Result<T, SimulationError>;
