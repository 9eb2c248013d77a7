//! Role-labeled tensor axes
//!
//! Extracted tensors mix indices from several copies of each mode. Every
//! axis carries an [`AxisRole`] naming the mode it belongs to, whether it
//! comes from the probe copy (acted on by the channel) or the readout copy
//! (left untouched), and whether it is a ket, row or column index.
//! Reordering always goes through role lookup, never through hard-coded
//! positions.
//!
//! # Layouts
//!
//! Per target mode, concatenated in target order:
//!
//! | representation | axes                                                        |
//! |----------------|-------------------------------------------------------------|
//! | unitary        | `(probe ket, readout ket)` = `(out, in)`                     |
//! | Choi           | `(readout row, readout col, probe row, probe col)` = `(j, l, i, m)` |
//! | Liouville      | `(probe col, readout col, probe row, readout row)` = `(m, l, i, j)` |

use crate::error::{ExtractError, Result};
use ndarray::{Array2, ArrayD, IxDyn};
use num_complex::Complex64;
use qchan_core::ModeId;
use std::fmt;

/// Which copy of a mode an axis belongs to
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Slot {
    /// Copy the operations act on; carries output indices
    Probe,
    /// Untouched copy; carries input indices
    Readout,
}

/// Which index of a state an axis is
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// State-vector index
    Ket,
    /// Density-matrix row index
    Row,
    /// Density-matrix column index
    Col,
}

/// Full label of one tensor axis
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AxisRole {
    pub mode: ModeId,
    pub slot: Slot,
    pub side: Side,
}

impl AxisRole {
    #[inline]
    pub const fn new(mode: ModeId, slot: Slot, side: Side) -> Self {
        Self { mode, slot, side }
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = match self.slot {
            Slot::Probe => "probe",
            Slot::Readout => "readout",
        };
        let side = match self.side {
            Side::Ket => "ket",
            Side::Row => "row",
            Side::Col => "col",
        };
        write!(f, "{}.{}.{}", self.mode, slot, side)
    }
}

/// Output/input axes of a unitary, per mode
pub fn unitary_roles(modes: &[ModeId]) -> Vec<AxisRole> {
    modes
        .iter()
        .flat_map(|&m| {
            [
                AxisRole::new(m, Slot::Probe, Side::Ket),
                AxisRole::new(m, Slot::Readout, Side::Ket),
            ]
        })
        .collect()
}

/// `(j, l, i, m)` quadruples of a Choi tensor
pub fn choi_roles(modes: &[ModeId]) -> Vec<AxisRole> {
    modes
        .iter()
        .flat_map(|&m| {
            [
                AxisRole::new(m, Slot::Readout, Side::Row),
                AxisRole::new(m, Slot::Readout, Side::Col),
                AxisRole::new(m, Slot::Probe, Side::Row),
                AxisRole::new(m, Slot::Probe, Side::Col),
            ]
        })
        .collect()
}

/// `(m, l, i, j)` quadruples of a Liouville tensor
pub fn liouville_roles(modes: &[ModeId]) -> Vec<AxisRole> {
    modes
        .iter()
        .flat_map(|&m| {
            [
                AxisRole::new(m, Slot::Probe, Side::Col),
                AxisRole::new(m, Slot::Readout, Side::Col),
                AxisRole::new(m, Slot::Probe, Side::Row),
                AxisRole::new(m, Slot::Readout, Side::Row),
            ]
        })
        .collect()
}

/// `(row, col)` pairs of one slot, per mode
pub fn density_roles(modes: &[ModeId], slot: Slot) -> Vec<AxisRole> {
    modes
        .iter()
        .flat_map(|&m| [AxisRole::new(m, slot, Side::Row), AxisRole::new(m, slot, Side::Col)])
        .collect()
}

/// Ket axes of one slot, per mode
pub fn ket_roles(modes: &[ModeId], slot: Slot) -> Vec<AxisRole> {
    modes.iter().map(|&m| AxisRole::new(m, slot, Side::Ket)).collect()
}

/// A dense tensor whose axes carry roles
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledTensor {
    data: ArrayD<Complex64>,
    roles: Vec<AxisRole>,
}

impl LabeledTensor {
    /// Attach roles to a tensor
    ///
    /// # Errors
    /// Returns error if the role count differs from the rank or a role repeats
    pub fn new(data: ArrayD<Complex64>, roles: Vec<AxisRole>) -> Result<Self> {
        if data.ndim() != roles.len() {
            return Err(ExtractError::invalid(format!(
                "tensor of rank {} labeled with {} roles",
                data.ndim(),
                roles.len()
            )));
        }
        for i in 0..roles.len() {
            for j in (i + 1)..roles.len() {
                if roles[i] == roles[j] {
                    return Err(ExtractError::invalid(format!(
                        "axis role {} appears twice",
                        roles[i]
                    )));
                }
            }
        }
        Ok(Self { data, roles })
    }

    /// Attach roles already known to match the tensor
    pub(crate) fn from_parts(data: ArrayD<Complex64>, roles: Vec<AxisRole>) -> Self {
        debug_assert_eq!(data.ndim(), roles.len());
        Self { data, roles }
    }

    /// Axis roles in storage order
    #[inline]
    pub fn roles(&self) -> &[AxisRole] {
        &self.roles
    }

    /// The underlying tensor
    #[inline]
    pub fn data(&self) -> &ArrayD<Complex64> {
        &self.data
    }

    /// Consume, returning the tensor
    pub fn into_data(self) -> ArrayD<Complex64> {
        self.data
    }

    /// Storage position of a role
    pub fn position(&self, role: AxisRole) -> Option<usize> {
        self.roles.iter().position(|&r| r == role)
    }

    /// Length of the axis carrying `role`
    pub fn axis_len(&self, role: AxisRole) -> Option<usize> {
        self.position(role).map(|p| self.data.shape()[p])
    }

    /// Element at the given multi-index (storage order)
    pub fn get(&self, index: &[usize]) -> Option<Complex64> {
        self.data.get(IxDyn(index)).copied()
    }

    /// Reorder axes so that they appear as `target`
    ///
    /// Pure relabeling; element values are copied bit-for-bit.
    ///
    /// # Errors
    /// Returns error if `target` is not a permutation of this tensor's roles
    pub fn permuted_to(&self, target: &[AxisRole]) -> Result<LabeledTensor> {
        let perm = self.permutation_for(target)?;
        let data = self
            .data
            .view()
            .permuted_axes(perm.as_slice())
            .as_standard_layout()
            .into_owned();
        Ok(Self {
            data,
            roles: target.to_vec(),
        })
    }

    /// Flatten into a matrix with `rows` roles as row index and `cols` as column
    ///
    /// Both groups are combined row-major in the order given.
    pub fn matrix(&self, rows: &[AxisRole], cols: &[AxisRole]) -> Result<Array2<Complex64>> {
        let mut order = rows.to_vec();
        order.extend_from_slice(cols);
        let permuted = self.permuted_to(&order)?;

        let shape = permuted.data.shape();
        let n_rows: usize = shape[..rows.len()].iter().product();
        let n_cols: usize = shape[rows.len()..].iter().product();

        permuted
            .data
            .into_shape((n_rows, n_cols))
            .map_err(|e| ExtractError::invalid(e.to_string()))
    }

    fn permutation_for(&self, target: &[AxisRole]) -> Result<Vec<usize>> {
        if target.len() != self.roles.len() {
            return Err(ExtractError::invalid(format!(
                "cannot reorder {} axes into {}",
                self.roles.len(),
                target.len()
            )));
        }
        let mut perm = Vec::with_capacity(target.len());
        for &role in target {
            let pos = self
                .position(role)
                .ok_or_else(|| ExtractError::invalid(format!("no axis with role {}", role)))?;
            if perm.contains(&pos) {
                return Err(ExtractError::invalid(format!(
                    "axis role {} requested twice",
                    role
                )));
            }
            perm.push(pos);
        }
        Ok(perm)
    }
}
