//! Reference truncated Fock-space backend for qchan
//!
//! [`FockSimulator`] implements [`qchan_core::ChannelSimulator`] over modes
//! truncated to a fixed cutoff. Pure states evolve as kets, mixed states as
//! density matrices (ρ → U ρ U† for gates, ρ → Σ A ρ A† for channels).
//!
//! # Operation vocabulary
//!
//! | name          | params          | modes |
//! |---------------|-----------------|-------|
//! | `Rgate`       | `phi`           | 1     |
//! | `Dgate`       | `r`, `phi`      | 1     |
//! | `Sgate`       | `r`, `phi`      | 1     |
//! | `BSgate`      | `theta`, `phi`  | 2     |
//! | `LossChannel` | `eta`           | 1     |
//!
//! Trailing phase parameters default to zero. Gate matrix elements are
//! exact, so a smaller cutoff yields the top-left block of a larger one.
//!
//! # Example
//!
//! ```
//! use qchan_core::{ChannelSimulator, ModeId, StateKind, TensorState};
//! use qchan_fock::{ops, FockSimulator};
//!
//! let sim = FockSimulator::default();
//! let vacuum = TensorState::vacuum(StateKind::Pure, 1, 8).unwrap();
//! let out = sim.run(vacuum, &[ops::displacement(0.5, 0.0, ModeId::new(0))], 8).unwrap();
//! assert!((out.trace() - 1.0).abs() < 1e-6);
//! ```

pub mod channels;
pub mod config;
mod contract;
pub mod gates;
pub mod ops;
pub mod simulator;

pub use channels::loss_kraus;
pub use config::FockConfig;
pub use simulator::FockSimulator;
