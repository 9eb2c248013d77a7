//! Numerical channel representations
//!
//! All three tensors keep their axis roles (see [`crate::axes`]) so that
//! conversions and contractions never depend on raw axis positions.

use crate::axes::{
    choi_roles, density_roles, ket_roles, liouville_roles, unitary_roles, AxisRole, LabeledTensor,
    Side, Slot,
};
use crate::error::{ExtractError, Result};
use ndarray::{Array2, ArrayD};
use num_complex::Complex64;
use qchan_core::ModeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selector for the representation to produce
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationKind {
    Unitary,
    Choi,
    Liouville,
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationKind::Unitary => write!(f, "unitary"),
            RepresentationKind::Choi => write!(f, "choi"),
            RepresentationKind::Liouville => write!(f, "liouville"),
        }
    }
}

impl FromStr for RepresentationKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unitary" => Ok(RepresentationKind::Unitary),
            "choi" => Ok(RepresentationKind::Choi),
            "liouville" => Ok(RepresentationKind::Liouville),
            other => Err(ExtractError::invalid(format!(
                "unknown representation '{}'",
                other
            ))),
        }
    }
}

/// Unitary extracted from a pure evolution
///
/// Storage axes are `(out₀, in₀, out₁, in₁, …)`; [`UnitaryTensor::matrix`]
/// regroups them into a `dⁿ × dⁿ` matrix with rows `(out₀, …, out_{n−1})`
/// and columns `(in₀, …, in_{n−1})`, both row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitaryTensor {
    tensor: LabeledTensor,
    matrix: Array2<Complex64>,
    modes: Vec<ModeId>,
    cutoff: usize,
}

impl UnitaryTensor {
    pub(crate) fn new(data: ArrayD<Complex64>, modes: &[ModeId], cutoff: usize) -> Result<Self> {
        let tensor = LabeledTensor::new(data, unitary_roles(modes))?;
        let matrix = tensor.matrix(
            &ket_roles(modes, Slot::Probe),
            &ket_roles(modes, Slot::Readout),
        )?;
        Ok(Self {
            tensor,
            matrix,
            modes: modes.to_vec(),
            cutoff,
        })
    }

    /// Target modes, in axis order
    pub fn modes(&self) -> &[ModeId] {
        &self.modes
    }

    /// Per-mode cutoff
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Labeled storage tensor
    pub fn tensor(&self) -> &LabeledTensor {
        &self.tensor
    }

    /// Matrix form, rows = outputs, columns = inputs
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Amplitude ⟨out|U|in⟩ for per-mode Fock indices
    pub fn element(&self, output: &[usize], input: &[usize]) -> Option<Complex64> {
        let row = flat_index(output, self.modes.len(), self.cutoff)?;
        let col = flat_index(input, self.modes.len(), self.cutoff)?;
        self.matrix.get((row, col)).copied()
    }
}

/// Choi tensor `J_{j,l,i,m} = Σ_k A_k[i,j] · conj(A_k[m,l])`
///
/// `(j, l)` are input (readout) indices, `(i, m)` output (probe) indices.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiTensor {
    tensor: LabeledTensor,
    modes: Vec<ModeId>,
}

impl ChoiTensor {
    pub(crate) fn new(data: ArrayD<Complex64>, modes: &[ModeId]) -> Result<Self> {
        let tensor = LabeledTensor::new(data, choi_roles(modes))?;
        Ok(Self {
            tensor,
            modes: modes.to_vec(),
        })
    }

    pub(crate) fn from_labeled(tensor: LabeledTensor, modes: &[ModeId]) -> Self {
        Self {
            tensor,
            modes: modes.to_vec(),
        }
    }

    /// Target modes, in axis order
    pub fn modes(&self) -> &[ModeId] {
        &self.modes
    }

    /// Labeled storage tensor
    pub fn tensor(&self) -> &LabeledTensor {
        &self.tensor
    }

    /// Raw tensor, axes `(j, l, i, m)` per mode
    pub fn data(&self) -> &ArrayD<Complex64> {
        self.tensor.data()
    }

    /// Per-mode input dimension
    pub fn input_dim(&self) -> usize {
        axis_dim(&self.tensor, &self.modes, Slot::Readout)
    }

    /// Per-mode output dimension
    pub fn output_dim(&self) -> usize {
        axis_dim(&self.tensor, &self.modes, Slot::Probe)
    }

    /// Relabel into the Liouville layout, `L_{m,l,i,j} = J_{j,l,i,m}`
    pub fn to_liouville(&self) -> Result<LiouvilleTensor> {
        let tensor = self.tensor.permuted_to(&liouville_roles(&self.modes))?;
        Ok(LiouvilleTensor {
            tensor,
            modes: self.modes.clone(),
        })
    }

    /// Matrix with input pairs `(j, l)…` as rows and output pairs `(i, m)…` as columns
    ///
    /// Contracting a row-major flattened ρ from the left gives the output.
    pub(crate) fn contraction_matrix(&self) -> Result<Array2<Complex64>> {
        self.tensor.matrix(
            &density_roles(&self.modes, Slot::Readout),
            &density_roles(&self.modes, Slot::Probe),
        )
    }
}

/// Liouville tensor `L_{m,l,i,j} = J_{j,l,i,m}`
#[derive(Clone, Debug, PartialEq)]
pub struct LiouvilleTensor {
    tensor: LabeledTensor,
    modes: Vec<ModeId>,
}

impl LiouvilleTensor {
    pub(crate) fn from_labeled(tensor: LabeledTensor, modes: &[ModeId]) -> Self {
        Self {
            tensor,
            modes: modes.to_vec(),
        }
    }

    /// Target modes, in axis order
    pub fn modes(&self) -> &[ModeId] {
        &self.modes
    }

    /// Labeled storage tensor
    pub fn tensor(&self) -> &LabeledTensor {
        &self.tensor
    }

    /// Raw tensor, axes `(m, l, i, j)` per mode
    pub fn data(&self) -> &ArrayD<Complex64> {
        self.tensor.data()
    }

    /// Per-mode input dimension
    pub fn input_dim(&self) -> usize {
        axis_dim(&self.tensor, &self.modes, Slot::Readout)
    }

    /// Per-mode output dimension
    pub fn output_dim(&self) -> usize {
        axis_dim(&self.tensor, &self.modes, Slot::Probe)
    }

    /// Relabel back into the Choi layout
    pub fn to_choi(&self) -> Result<ChoiTensor> {
        let tensor = self.tensor.permuted_to(&choi_roles(&self.modes))?;
        Ok(ChoiTensor {
            tensor,
            modes: self.modes.clone(),
        })
    }

    /// Superoperator `S[(i,m)…, (j,l)…]` acting on row-major vectorized ρ
    pub fn superoperator(&self) -> Result<Array2<Complex64>> {
        self.tensor.matrix(
            &density_roles(&self.modes, Slot::Probe),
            &density_roles(&self.modes, Slot::Readout),
        )
    }
}

/// An extracted channel in one of the supported forms
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelRepresentation {
    Unitary(UnitaryTensor),
    Choi(ChoiTensor),
    Liouville(LiouvilleTensor),
}

impl ChannelRepresentation {
    /// Which form this is
    pub fn kind(&self) -> RepresentationKind {
        match self {
            ChannelRepresentation::Unitary(_) => RepresentationKind::Unitary,
            ChannelRepresentation::Choi(_) => RepresentationKind::Choi,
            ChannelRepresentation::Liouville(_) => RepresentationKind::Liouville,
        }
    }

    /// Target modes, in axis order
    pub fn modes(&self) -> &[ModeId] {
        match self {
            ChannelRepresentation::Unitary(u) => u.modes(),
            ChannelRepresentation::Choi(c) => c.modes(),
            ChannelRepresentation::Liouville(l) => l.modes(),
        }
    }

    pub fn as_unitary(&self) -> Option<&UnitaryTensor> {
        match self {
            ChannelRepresentation::Unitary(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_choi(&self) -> Option<&ChoiTensor> {
        match self {
            ChannelRepresentation::Choi(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_liouville(&self) -> Option<&LiouvilleTensor> {
        match self {
            ChannelRepresentation::Liouville(l) => Some(l),
            _ => None,
        }
    }
}

impl From<UnitaryTensor> for ChannelRepresentation {
    fn from(u: UnitaryTensor) -> Self {
        ChannelRepresentation::Unitary(u)
    }
}

impl From<ChoiTensor> for ChannelRepresentation {
    fn from(c: ChoiTensor) -> Self {
        ChannelRepresentation::Choi(c)
    }
}

impl From<LiouvilleTensor> for ChannelRepresentation {
    fn from(l: LiouvilleTensor) -> Self {
        ChannelRepresentation::Liouville(l)
    }
}

fn axis_dim(tensor: &LabeledTensor, modes: &[ModeId], slot: Slot) -> usize {
    modes
        .first()
        .and_then(|&m| tensor.axis_len(AxisRole::new(m, slot, Side::Row)))
        .unwrap_or(0)
}

/// Row-major flat index of per-mode Fock indices
pub(crate) fn flat_index(indices: &[usize], num_modes: usize, cutoff: usize) -> Option<usize> {
    if indices.len() != num_modes || indices.iter().any(|&i| i >= cutoff) {
        return None;
    }
    Some(indices.iter().fold(0, |acc, &i| acc * cutoff + i))
}
