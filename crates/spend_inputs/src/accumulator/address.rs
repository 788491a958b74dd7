use core::fmt;

use bitvec::{order::Lsb0, view::BitView as _};
use ff::PrimeField as _;
use num_bigint::BigUint;
use pasta_curves::Fp;

use crate::constants::REPR_BYTES;

/// How a commitment is assigned its leaf.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Addressing {
    /// The low `depth` bits of the commitment's little-endian
    /// representation. A commitment's leaf is a function of its value alone,
    /// so two commitments may share a leaf; the later one wins.
    #[default]
    ValueBits,
    /// First-insertion order: the first distinct commitment lands on leaf 0,
    /// the next on leaf 1, and so on until all $2^D$ leaves are taken.
    Sequential,
}

/// Position of a node within its level, as a 256-bit little-endian integer.
///
/// At level 0 this is the leaf address. Bit $i$ of a leaf address says
/// whether the path node at level $i$ is a right child, and the parent of
/// the node at index $n$ sits at index $n \gg 1$.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeIndex([u8; REPR_BYTES]);

impl NodeIndex {
    /// Leaf address of `value` under [`Addressing::ValueBits`].
    pub(crate) fn from_value(value: Fp, depth: usize) -> Self {
        let mut bytes = value.to_repr();
        if let Some(high) = bytes.view_bits_mut::<Lsb0>().get_mut(depth..) {
            high.fill(false);
        }
        Self(bytes)
    }

    /// Leaf address of the `position`-th distinct insertion.
    pub(crate) fn from_position(position: u64) -> Self {
        let mut bytes = [0u8; REPR_BYTES];
        for (slot, byte) in bytes.iter_mut().zip(position.to_le_bytes()) {
            *slot = byte;
        }
        Self(bytes)
    }

    /// Whether a node at this index is the right child of its parent.
    #[must_use]
    pub fn is_right(&self) -> bool {
        self.0.view_bits::<Lsb0>().first().is_some_and(|bit| *bit)
    }

    /// The other child of this node's parent.
    #[must_use]
    pub(crate) fn sibling(self) -> Self {
        let mut bytes = self.0;
        bytes.view_bits_mut::<Lsb0>().set(0, !self.is_right());
        Self(bytes)
    }

    /// Index of the parent one level up.
    #[must_use]
    pub(crate) fn parent(self) -> Self {
        let mut bytes = self.0;
        bytes.view_bits_mut::<Lsb0>().shift_start(1);
        Self(bytes)
    }
}

/// Decimal, matching how leaves and hashes are printed everywhere else.
impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BigUint::from_bytes_le(&self.0))
    }
}

/// Whether the `position`-th distinct leaf still fits in a tree of `depth`.
pub(crate) fn fits(position: u64, depth: usize) -> bool {
    u32::try_from(depth)
        .ok()
        .and_then(|shift| position.checked_shr(shift))
        .is_none_or(|overflow| overflow == 0)
}
