//! Kraus decompositions of Fock-space noise channels

use crate::gates::ln_binomial;
use ndarray::Array2;
use num_complex::Complex64;
use qchan_core::{KrausSet, Result, SimulationError};

/// Pure-loss channel with transmissivity η
///
/// Models a beamsplitter coupling to a vacuum environment that is then
/// traced out. Kraus operators, for k = 0..cutoff:
/// ```text
/// A_k = Σ_n √C(n,k) · η^{(n−k)/2} · (1−η)^{k/2} |n−k⟩⟨n|
/// ```
///
/// # Errors
/// Returns error if η is not in [0, 1] or the cutoff is zero
///
/// # Example
/// ```
/// let kraus = qchan_fock::loss_kraus(0.9, 6).unwrap();
/// assert_eq!(kraus.len(), 6);
/// assert!(kraus.completeness_defect() < 1e-12);
/// ```
pub fn loss_kraus(eta: f64, cutoff: usize) -> Result<KrausSet> {
    if !(0.0..=1.0).contains(&eta) {
        return Err(SimulationError::invalid_parameter(
            "LossChannel",
            format!("transmissivity must be in [0,1], got {}", eta),
        ));
    }
    if cutoff == 0 {
        return Err(SimulationError::dimension_mismatch("cutoff >= 1", "cutoff 0"));
    }

    let operators = (0..cutoff)
        .map(|k| {
            let mut op = Array2::<Complex64>::zeros((cutoff, cutoff));
            for n in k..cutoff {
                let amplitude = (0.5 * ln_binomial(n, k)).exp()
                    * eta.powf(0.5 * (n - k) as f64)
                    * (1.0 - eta).powf(0.5 * k as f64);
                op[[n - k, n]] = Complex64::new(amplitude, 0.0);
            }
            op
        })
        .collect();

    KrausSet::new(operators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_loss_is_trace_preserving() {
        for &eta in &[0.0, 0.25, 0.9, 1.0] {
            let kraus = loss_kraus(eta, 8).unwrap();
            assert_relative_eq!(kraus.completeness_defect(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unit_transmissivity_is_identity() {
        let kraus = loss_kraus(1.0, 5).unwrap();
        let a0 = &kraus.operators()[0];
        for n in 0..5 {
            assert_relative_eq!(a0[[n, n]].re, 1.0);
        }
        for k in 1..5 {
            assert!(kraus.operators()[k].iter().all(|z| z.norm() == 0.0));
        }
    }

    #[test]
    fn test_single_photon_decay() {
        // A_1 |1⟩ = √(1−η) |0⟩
        let eta = 0.9;
        let kraus = loss_kraus(eta, 4).unwrap();
        assert_relative_eq!(kraus.operators()[1][[0, 1]].re, (1.0 - eta).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(kraus.operators()[0][[1, 1]].re, eta.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_transmissivity() {
        assert!(matches!(
            loss_kraus(1.5, 4),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(loss_kraus(-0.1, 4).is_err());
    }
}
