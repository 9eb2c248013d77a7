//! Explicit Kraus decompositions

use crate::{Result, SimulationError};
use ndarray::Array2;
use num_complex::Complex64;

/// An ordered set of Kraus operators {A_k}
///
/// Each operator is a `d_out × d_in` matrix; the channel acts as
/// ρ → Σ_k A_k ρ A_k†. Completeness (Σ_k A_k† A_k = I) is not enforced so
/// that subnormalized channels can be represented.
#[derive(Clone, Debug, PartialEq)]
pub struct KrausSet {
    operators: Vec<Array2<Complex64>>,
}

impl KrausSet {
    /// Create a Kraus set
    ///
    /// # Errors
    /// Returns error if the set is empty or operator shapes differ
    pub fn new(operators: Vec<Array2<Complex64>>) -> Result<Self> {
        let first = operators.first().ok_or(SimulationError::EmptyKrausSet)?;
        let shape = first.dim();

        if let Some(bad) = operators.iter().find(|op| op.dim() != shape) {
            return Err(SimulationError::dimension_mismatch(
                format!("{}x{} Kraus operators", shape.0, shape.1),
                format!("{}x{}", bad.nrows(), bad.ncols()),
            ));
        }

        Ok(Self { operators })
    }

    /// Get the operators
    #[inline]
    pub fn operators(&self) -> &[Array2<Complex64>] {
        &self.operators
    }

    /// Number of operators
    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Always false; construction rejects empty sets
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Output dimension (rows of each operator)
    #[inline]
    pub fn output_dim(&self) -> usize {
        self.operators[0].nrows()
    }

    /// Input dimension (columns of each operator)
    #[inline]
    pub fn input_dim(&self) -> usize {
        self.operators[0].ncols()
    }

    /// Largest deviation of Σ_k A_k† A_k from the identity
    ///
    /// Zero (up to rounding) for trace-preserving channels.
    pub fn completeness_defect(&self) -> f64 {
        let d = self.input_dim();
        let mut sum = Array2::<Complex64>::zeros((d, d));

        for op in &self.operators {
            let adjoint = op.t().mapv(|z| z.conj());
            sum = sum + adjoint.dot(op);
        }

        sum.indexed_iter()
            .map(|((i, j), &z)| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (z - Complex64::new(expected, 0.0)).norm()
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(KrausSet::new(vec![]), Err(SimulationError::EmptyKrausSet));
    }

    #[test]
    fn test_mismatched_shapes_rejected() {
        let a = Array2::<Complex64>::eye(2);
        let b = Array2::<Complex64>::eye(3);
        assert!(matches!(
            KrausSet::new(vec![a, b]),
            Err(SimulationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_amplitude_damping_is_complete() {
        let gamma: f64 = 0.3;
        let k0 = array![[c(1.0), c(0.0)], [c(0.0), c((1.0 - gamma).sqrt())]];
        let k1 = array![[c(0.0), c(gamma.sqrt())], [c(0.0), c(0.0)]];
        let set = KrausSet::new(vec![k0, k1]).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.input_dim(), 2);
        assert_relative_eq!(set.completeness_defect(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_subnormalized_defect() {
        let half = Array2::<Complex64>::eye(2).mapv(|z| z * 0.5);
        let set = KrausSet::new(vec![half]).unwrap();
        assert_relative_eq!(set.completeness_defect(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_rectangular_operators() {
        let op = Array2::<Complex64>::zeros((3, 2));
        let set = KrausSet::new(vec![op]).unwrap();
        assert_eq!(set.output_dim(), 3);
        assert_eq!(set.input_dim(), 2);
    }
}
