//! Operator application on selected tensor axes

use ndarray::{Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use qchan_core::{Result, SimulationError};

/// Contract `op` (rows = outputs) against `axes` of `tensor`
///
/// `op` must be `D × D` where `D` is the product of the lengths of `axes`;
/// the axes are treated jointly in the listed order, row-major. All other
/// axes are left untouched and the result keeps the input's axis order.
pub(crate) fn apply_on_axes(
    tensor: ArrayD<Complex64>,
    op: &Array2<Complex64>,
    axes: &[usize],
) -> Result<ArrayD<Complex64>> {
    let rank = tensor.ndim();
    let joint: usize = axes.iter().map(|&a| tensor.shape()[a]).product();
    if op.nrows() != joint || op.ncols() != joint {
        return Err(SimulationError::dimension_mismatch(
            format!("{}x{} operator", joint, joint),
            format!("{}x{}", op.nrows(), op.ncols()),
        ));
    }

    let mut perm: Vec<usize> = axes.to_vec();
    perm.extend((0..rank).filter(|a| !axes.contains(a)));

    let moved = tensor.permuted_axes(perm.as_slice());
    let moved_shape = moved.shape().to_vec();
    let rest = moved.len() / joint.max(1);

    let matrix = moved
        .as_standard_layout()
        .into_owned()
        .into_shape((joint, rest))
        .map_err(|e| SimulationError::Backend(e.to_string()))?;

    let product = op.dot(&matrix);

    let mut inverse = vec![0usize; rank];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p] = i;
    }

    let restored = product
        .into_shape(IxDyn(&moved_shape))
        .map_err(|e| SimulationError::Backend(e.to_string()))?
        .permuted_axes(inverse.as_slice());

    Ok(restored.as_standard_layout().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_apply_on_middle_axis() {
        // tensor[a, b, c] = δ(b, 0)
        let mut t = ArrayD::<Complex64>::zeros(IxDyn(&[2, 2, 2]));
        for a in 0..2 {
            for cc in 0..2 {
                t[[a, 0, cc]] = c(1.0);
            }
        }
        let flip = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let out = apply_on_axes(t, &flip, &[1]).unwrap();
        for a in 0..2 {
            for cc in 0..2 {
                assert_eq!(out[[a, 1, cc]], c(1.0));
                assert_eq!(out[[a, 0, cc]], c(0.0));
            }
        }
    }

    #[test]
    fn test_joint_axes_order() {
        // SWAP on axes (2, 0) moves amplitude at [1, 0, 0] to [0, 0, 1]
        let mut t = ArrayD::<Complex64>::zeros(IxDyn(&[2, 2, 2]));
        t[[1, 0, 0]] = c(1.0);
        let mut swap = Array2::<Complex64>::zeros((4, 4));
        swap[[0, 0]] = c(1.0);
        swap[[1, 2]] = c(1.0);
        swap[[2, 1]] = c(1.0);
        swap[[3, 3]] = c(1.0);
        let out = apply_on_axes(t, &swap, &[2, 0]).unwrap();
        assert_eq!(out[[0, 0, 1]], c(1.0));
        assert_eq!(out[[1, 0, 0]], c(0.0));
    }

    #[test]
    fn test_wrong_operator_size() {
        let t = ArrayD::<Complex64>::zeros(IxDyn(&[3, 3]));
        let op = Array2::<Complex64>::eye(2);
        assert!(apply_on_axes(t, &op, &[0]).is_err());
    }
}
