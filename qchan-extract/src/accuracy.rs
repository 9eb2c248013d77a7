//! Truncation advisory
//!
//! A cutoff that is too small for the operations silently drops amplitude
//! beyond the top Fock level. The advisory looks at what the extracted
//! channel does to the vacuum: how much norm it loses (leakage) and how much
//! population it places on level `cutoff − 1` (boundary population). Either
//! exceeding the tolerance yields a [`NumericalAccuracyWarning`].

use crate::error::Result;
use crate::representation::{ChoiTensor, UnitaryTensor};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Non-fatal advisory attached to an extraction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalAccuracyWarning {
    /// Norm lost from the vacuum input, 1 − ‖E(|0⟩⟨0|)‖
    pub leakage: f64,
    /// Population of the vacuum's image on the top Fock level of any mode
    pub boundary_population: f64,
    /// Cutoff the extraction ran at
    pub cutoff: usize,
    /// Threshold that was exceeded
    pub tolerance: f64,
}

impl fmt::Display for NumericalAccuracyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cutoff {} may be too small: leakage {:.3e}, \
             boundary population {:.3e} (tolerance {:.1e})",
            self.cutoff, self.leakage, self.boundary_population, self.tolerance
        )
    }
}

/// Check a unitary through its vacuum column
pub(crate) fn assess_unitary(
    unitary: &UnitaryTensor,
    tolerance: f64,
) -> Option<NumericalAccuracyWarning> {
    let d = unitary.cutoff();
    let n = unitary.modes().len();
    let column = unitary.matrix().column(0);

    let mut norm = 0.0;
    let mut boundary = 0.0;
    for (row, amplitude) in column.iter().enumerate() {
        let population = amplitude.norm_sqr();
        norm += population;
        if touches_boundary(row, n, d) {
            boundary += population;
        }
    }

    judge(1.0 - norm, boundary, d, tolerance)
}

/// Check a channel through its image of |0⟩⟨0|
pub(crate) fn assess_channel(
    choi: &ChoiTensor,
    tolerance: f64,
) -> Result<Option<NumericalAccuracyWarning>> {
    let d = choi.output_dim();
    let n = choi.modes().len();
    let matrix = choi.contraction_matrix()?;
    // Row 0 is the all-vacuum input pair; columns are (i₀, m₀, i₁, m₁, …)
    let image = matrix.row(0);

    let mut trace = 0.0;
    let mut boundary = 0.0;
    for out in 0..d.pow(n as u32) {
        let diagonal = diagonal_index(out, n, d);
        let population = image[diagonal].re;
        trace += population;
        if touches_boundary(out, n, d) {
            boundary += population;
        }
    }

    Ok(judge(1.0 - trace, boundary, d, tolerance))
}

fn judge(
    leakage: f64,
    boundary_population: f64,
    cutoff: usize,
    tolerance: f64,
) -> Option<NumericalAccuracyWarning> {
    if leakage.abs() <= tolerance && boundary_population <= tolerance {
        return None;
    }
    let warning = NumericalAccuracyWarning {
        leakage,
        boundary_population,
        cutoff,
        tolerance,
    };
    warn!(%warning, "truncation advisory");
    Some(warning)
}

/// Whether any mode digit of a row-major index equals `d − 1`
///
/// A single-level space has no boundary distinct from the vacuum.
fn touches_boundary(mut index: usize, num_modes: usize, d: usize) -> bool {
    if d < 2 {
        return false;
    }
    for _ in 0..num_modes {
        if index % d == d - 1 {
            return true;
        }
        index /= d;
    }
    false
}

/// Map a row-major ket index (i₀, i₁, …) to the (i₀, i₀, i₁, i₁, …) pair index
fn diagonal_index(index: usize, num_modes: usize, d: usize) -> usize {
    let mut digits = Vec::with_capacity(num_modes);
    let mut rest = index;
    for _ in 0..num_modes {
        digits.push(rest % d);
        rest /= d;
    }
    digits
        .iter()
        .rev()
        .fold(0, |acc, &i| (acc * d + i) * d + i)
}
