//! Applying extracted representations to density matrices

use crate::error::{ExtractError, Result};
use crate::representation::{ChannelRepresentation, UnitaryTensor};
use ndarray::{Array1, Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use qchan_core::{StateKind, TensorState};
use tracing::debug;

/// Evolve `rho` by an extracted representation
///
/// Pure inputs are first converted to `|ψ⟩⟨ψ|`. The result is always a
/// mixed-kind state over the representation's output dimension. Choi and
/// Liouville forms of the same channel give identical results up to
/// floating-point rounding.
///
/// # Errors
/// Returns error if the state's mode count or cutoff does not match the
/// representation
pub fn apply_channel_representation(
    rho: &TensorState,
    repr: &ChannelRepresentation,
) -> Result<TensorState> {
    let rho = rho.to_mixed();
    let n = repr.modes().len();
    if rho.num_modes() != n {
        return Err(ExtractError::invalid(format!(
            "representation acts on {} modes, state has {}",
            n,
            rho.num_modes()
        )));
    }

    let (d_in, d_out) = match repr {
        ChannelRepresentation::Unitary(u) => (u.cutoff(), u.cutoff()),
        ChannelRepresentation::Choi(choi) => (choi.input_dim(), choi.output_dim()),
        ChannelRepresentation::Liouville(l) => (l.input_dim(), l.output_dim()),
    };
    if rho.cutoff() != d_in {
        return Err(ExtractError::invalid(format!(
            "state cutoff {} does not match representation input dimension {}",
            rho.cutoff(),
            d_in
        )));
    }
    debug!(kind = %repr.kind(), modes = n, d_in, d_out, "applying representation");

    let data = match repr {
        ChannelRepresentation::Unitary(u) => conjugate(&rho, u)?,
        ChannelRepresentation::Choi(choi) => {
            let vec: Array1<Complex64> = rho.data().iter().copied().collect();
            let out = vec.dot(&choi.contraction_matrix()?);
            reshape(out, n, d_out)?
        }
        ChannelRepresentation::Liouville(l) => {
            let vec: Array1<Complex64> = rho.data().iter().copied().collect();
            let out = l.superoperator()?.dot(&vec);
            reshape(out, n, d_out)?
        }
    };

    debug_assert_eq!(data.ndim(), 2 * n);
    Ok(TensorState::new(StateKind::Mixed, data)?)
}

/// `U ρ U†` with ρ regrouped into a `dⁿ × dⁿ` matrix
fn conjugate(rho: &TensorState, unitary: &UnitaryTensor) -> Result<ArrayD<Complex64>> {
    let n = rho.num_modes();
    let d = rho.cutoff();
    let dim = d.pow(n as u32);

    // (r₀, c₀, r₁, c₁, …) → (r₀, r₁, …, c₀, c₁, …)
    let grouped: Vec<usize> = (0..n).map(|k| 2 * k).chain((0..n).map(|k| 2 * k + 1)).collect();
    let matrix: Array2<Complex64> = rho
        .data()
        .view()
        .permuted_axes(grouped.as_slice())
        .as_standard_layout()
        .into_owned()
        .into_shape((dim, dim))
        .map_err(|e| ExtractError::invalid(e.to_string()))?;

    let u = unitary.matrix();
    let u_dagger = u.t().mapv(|z| z.conj());
    let evolved = u.dot(&matrix).dot(&u_dagger);

    let shape = vec![d; 2 * n];
    let separated = evolved
        .into_shape(IxDyn(&shape))
        .map_err(|e| ExtractError::invalid(e.to_string()))?;

    // back to interleaved (row, col) pairs
    let interleaved: Vec<usize> = (0..n).flat_map(|k| [k, n + k]).collect();
    Ok(separated
        .permuted_axes(interleaved.as_slice())
        .as_standard_layout()
        .into_owned())
}

fn reshape(flat: Array1<Complex64>, n: usize, d: usize) -> Result<ArrayD<Complex64>> {
    let shape = vec![d; 2 * n];
    flat.into_shape(IxDyn(&shape))
        .map_err(|e| ExtractError::invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kraus::choi_and_liouville_from_kraus;
    use approx::assert_relative_eq;
    use qchan_core::KrausSet;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn dephasing(p: f64) -> KrausSet {
        let mut a0 = Array2::eye(2);
        a0.mapv_inplace(|z: Complex64| z * (1.0 - p).sqrt());
        let mut a1 = Array2::zeros((2, 2));
        a1[[0, 0]] = c(p.sqrt(), 0.0);
        a1[[1, 1]] = c(-p.sqrt(), 0.0);
        KrausSet::new(vec![a0, a1]).unwrap()
    }

    fn plus_state() -> TensorState {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        TensorState::from_amplitudes(1, 2, &[c(s, 0.0), c(s, 0.0)]).unwrap()
    }

    #[test]
    fn test_dephasing_shrinks_coherence() {
        let p = 0.2;
        let (choi, liouville) = choi_and_liouville_from_kraus(&dephasing(p));

        let coherence = 0.5 * (1.0 - 2.0 * p);
        for repr in [ChannelRepresentation::from(choi), ChannelRepresentation::from(liouville)] {
            let out = apply_channel_representation(&plus_state(), &repr).unwrap();
            assert_eq!(out.kind(), StateKind::Mixed);
            assert_relative_eq!(out.get(&[0, 0]).unwrap().re, 0.5, epsilon = 1e-12);
            assert_relative_eq!(out.get(&[1, 1]).unwrap().re, 0.5, epsilon = 1e-12);
            assert_relative_eq!(out.get(&[0, 1]).unwrap().re, coherence, epsilon = 1e-12);
            assert_relative_eq!(out.get(&[1, 0]).unwrap().re, coherence, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cutoff_mismatch_rejected() {
        let (choi, _) = choi_and_liouville_from_kraus(&dephasing(0.1));
        let rho = TensorState::vacuum(StateKind::Mixed, 1, 3).unwrap();
        let err = apply_channel_representation(&rho, &choi.into()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_mode_count_mismatch_rejected() {
        let (_, liouville) = choi_and_liouville_from_kraus(&dephasing(0.1));
        let rho = TensorState::vacuum(StateKind::Mixed, 2, 2).unwrap();
        assert!(apply_channel_representation(&rho, &liouville.into()).is_err());
    }
}
