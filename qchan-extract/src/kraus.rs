//! Channel tensors straight from a Kraus decomposition

use crate::axes::{choi_roles, liouville_roles, LabeledTensor};
use crate::representation::{ChoiTensor, LiouvilleTensor};
use ndarray::Array4;
use num_complex::Complex64;
use qchan_core::{KrausSet, ModeId};

/// Build both Choi and Liouville tensors of a single-mode Kraus channel
///
/// `J[j, l, i, m] = Σ_k A_k[i, j] · conj(A_k[m, l])` and
/// `L[m, l, i, j] = J[j, l, i, m]`. The tensors are labeled with mode 0.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use ndarray::Array2;
/// use qchan_core::KrausSet;
/// use qchan_extract::choi_and_liouville_from_kraus;
///
/// let identity = Array2::<Complex64>::eye(2);
/// let kraus = KrausSet::new(vec![identity]).unwrap();
/// let (choi, liouville) = choi_and_liouville_from_kraus(&kraus);
///
/// assert_eq!(choi.data()[&[0, 0, 0, 0][..]], Complex64::new(1.0, 0.0));
/// assert_eq!(liouville.data().shape(), &[2, 2, 2, 2]);
/// ```
pub fn choi_and_liouville_from_kraus(kraus: &KrausSet) -> (ChoiTensor, LiouvilleTensor) {
    let d_in = kraus.input_dim();
    let d_out = kraus.output_dim();

    let mut choi = Array4::<Complex64>::zeros((d_in, d_in, d_out, d_out));
    for op in kraus.operators() {
        for ((j, l, i, m), value) in choi.indexed_iter_mut() {
            *value += op[[i, j]] * op[[m, l]].conj();
        }
    }

    let mut liouville = Array4::<Complex64>::zeros((d_out, d_in, d_out, d_in));
    for ((j, l, i, m), &value) in choi.indexed_iter() {
        liouville[[m, l, i, j]] = value;
    }

    let modes = [ModeId::new(0)];
    let choi = LabeledTensor::from_parts(choi.into_dyn(), choi_roles(&modes));
    let liouville = LabeledTensor::from_parts(liouville.into_dyn(), liouville_roles(&modes));
    (
        ChoiTensor::from_labeled(choi, &modes),
        LiouvilleTensor::from_labeled(liouville, &modes),
    )
}
