//! Constructors for the backend's operation vocabulary

use qchan_core::{ModeId, Operation, Result};

pub const ROTATION: &str = "Rgate";
pub const DISPLACEMENT: &str = "Dgate";
pub const SQUEEZING: &str = "Sgate";
pub const BEAMSPLITTER: &str = "BSgate";
pub const LOSS: &str = "LossChannel";

/// Phase rotation by `phi`
pub fn rotation(phi: f64, mode: ModeId) -> Operation {
    Operation::single(ROTATION, &[phi], mode)
}

/// Displacement by α = r e^{iφ}
pub fn displacement(r: f64, phi: f64, mode: ModeId) -> Operation {
    Operation::single(DISPLACEMENT, &[r, phi], mode)
}

/// Squeezing by ζ = r e^{iφ}
pub fn squeezing(r: f64, phi: f64, mode: ModeId) -> Operation {
    Operation::single(SQUEEZING, &[r, phi], mode)
}

/// Beamsplitter with mixing angle `theta` and phase `phi`
///
/// # Errors
/// Returns error if both modes are the same
pub fn beamsplitter(
    theta: f64,
    phi: f64,
    first: ModeId,
    second: ModeId,
) -> Result<Operation> {
    Operation::new(BEAMSPLITTER, &[theta, phi], &[first, second])
}

/// Pure loss with transmissivity `eta`
pub fn loss(eta: f64, mode: ModeId) -> Operation {
    Operation::single(LOSS, &[eta], mode)
}
