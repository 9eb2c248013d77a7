//! Mode addressing and identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe identifier for a bosonic mode
///
/// # Example
/// ```
/// use qchan_core::ModeId;
///
/// let m0 = ModeId::new(0);
/// let m1 = ModeId::new(1);
/// assert!(m0 < m1);
/// ```
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ModeId(usize);

impl ModeId {
    /// Create a new mode identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    ///
    /// # Example
    /// ```
    /// use qchan_core::ModeId;
    /// assert_eq!(ModeId::new(5).index(), 5);
    /// ```
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

impl From<usize> for ModeId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<ModeId> for usize {
    #[inline]
    fn from(mode: ModeId) -> Self {
        mode.index()
    }
}
