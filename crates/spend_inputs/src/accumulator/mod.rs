//! Sparse, fixed-depth Merkle accumulator of coin commitments.
//!
//! The tree has $2^D$ leaves but stores only the nodes on paths that an
//! insertion has touched. Every untouched subtree at level $i$ hashes to
//! the same precomputed value:
//!
//! $$h_0 = \mathsf{EMPTY\_LEAF}, \qquad h_{i+1} = H(h_i, h_i)$$
//!
//! so an empty tree has digest $h_D$, and a lookup that misses the node
//! map falls back to $h_{\text{level}}$.
//!
//! ```text
//!            root (level D)
//!           /    \
//!         ...    h_{D-1}       <- untouched subtree, never stored
//!        /   \
//!      cm    h_0               <- level 0: leaves
//! ```
//!
//! ## Cost
//!
//! Insert and path are $O(D)$ hash calls / map lookups; digest is $O(1)$.
//! Memory is $O(\text{leaves} \cdot D)$ regardless of $2^D$.
//!
//! ## Direction bits
//!
//! A path step records which side its sibling is on. The circuit receives
//! `1` when the sibling is on the left, i.e. when bit $i$ of the leaf
//! address is set. See [`PathNode`].

mod address;
mod path;

pub use address::{Addressing, NodeIndex};
pub use path::{MembershipPath, PathNode};

use alloc::collections::BTreeMap;
use core::fmt;

use pasta_curves::Fp;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    constants::{EMPTY_LEAF, MAX_DEPTH},
    hash::HashOracle,
    primitives::{Commitment, Digest},
};

/// What a failed membership query found at the commitment's leaf.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeafState {
    /// Sequential addressing has never seen this commitment.
    Unassigned,
    /// The leaf at this address was never written.
    Empty(NodeIndex),
    /// The leaf at this address holds another commitment.
    Holds(NodeIndex, Commitment),
}

impl fmt::Display for LeafState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unassigned => f.write_str("no leaf was ever assigned to it"),
            Self::Empty(address) => write!(f, "leaf {address} is empty"),
            Self::Holds(address, other) => write!(f, "leaf {address} holds {other}"),
        }
    }
}

/// Accumulator construction and query failures.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum AccumulatorError {
    /// More levels than address bits.
    #[error("depth {depth} exceeds the {MAX_DEPTH}-bit leaf address space")]
    DepthTooLarge {
        /// Requested depth.
        depth: usize,
    },
    /// Sequential addressing ran out of leaves.
    #[error("all 2^{depth} leaves are occupied")]
    AccumulatorFull {
        /// Depth of the full tree.
        depth: usize,
    },
    /// The queried commitment is not a member.
    #[error("commitment {commitment} is not a member: {leaf}")]
    LeafMismatch {
        /// The commitment whose path was requested.
        commitment: Commitment,
        /// What its leaf actually holds.
        leaf: LeafState,
    },
}

/// A fixed-depth sparse Merkle tree over $\mathbb{F}_p$.
///
/// Owned by exactly one replay. Reads (`digest`, `path`, `contains`) never
/// modify the tree.
#[derive(Clone, Debug)]
pub struct SparseAccumulator<H> {
    depth: usize,
    addressing: Addressing,
    hasher: H,
    /// $h_0 \ldots h_D$.
    empty: Vec<Fp>,
    /// Every non-empty node, keyed by `(level, index)`. Level 0 holds the
    /// commitments themselves.
    nodes: BTreeMap<(usize, NodeIndex), Fp>,
    /// Leaf assignments for [`Addressing::Sequential`].
    positions: BTreeMap<Commitment, NodeIndex>,
    leaves: usize,
    root: Fp,
}

impl<H: HashOracle> SparseAccumulator<H> {
    /// Creates an empty accumulator with `depth` levels below the root.
    pub fn new(depth: usize, addressing: Addressing, hasher: H) -> Result<Self, AccumulatorError> {
        if depth > MAX_DEPTH {
            return Err(AccumulatorError::DepthTooLarge { depth });
        }

        let mut empty = Vec::with_capacity(depth + 1);
        let mut level_hash = EMPTY_LEAF;
        empty.push(level_hash);
        for _ in 0..depth {
            level_hash = hasher.hash(level_hash, level_hash);
            empty.push(level_hash);
        }
        debug!(depth, ?addressing, "created empty accumulator");

        Ok(Self {
            depth,
            addressing,
            hasher,
            empty,
            nodes: BTreeMap::new(),
            positions: BTreeMap::new(),
            leaves: 0,
            root: level_hash,
        })
    }

    /// Number of levels below the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Leaf assignment rule.
    #[must_use]
    pub const fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// The hash this tree combines nodes with.
    #[must_use]
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of occupied leaves.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.leaves
    }

    /// Whether no commitment has been inserted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    /// Current root.
    #[must_use]
    pub fn digest(&self) -> Digest {
        Digest::from(self.root)
    }

    /// Root of an empty subtree of height `level`, or `None` above the root.
    #[must_use]
    pub fn empty_root(&self, level: usize) -> Option<Fp> {
        self.empty.get(level).copied()
    }

    /// Inserts a commitment and returns its leaf address.
    ///
    /// Reinserting a commitment that already occupies its leaf is a no-op.
    /// Under [`Addressing::ValueBits`], a commitment whose address is held
    /// by a different commitment replaces it.
    pub fn insert(&mut self, commitment: Commitment) -> Result<NodeIndex, AccumulatorError> {
        let address = self.assign(commitment)?;
        let value = Fp::from(commitment);

        match self.nodes.get(&(0, address)).copied() {
            Some(stored) if stored == value => {
                trace!(%commitment, %address, "commitment already present");
                return Ok(address);
            }
            Some(stored) => {
                warn!(
                    %commitment,
                    %address,
                    evicted = %Commitment::from(stored),
                    "leaf address collision, overwriting earlier commitment"
                );
            }
            None => self.leaves += 1,
        }

        self.nodes.insert((0, address), value);
        let mut index = address;
        let mut node = value;
        for level in 0..self.depth {
            let sibling = self.node(level, index.sibling());
            node = if index.is_right() {
                self.hasher.hash(sibling, node)
            } else {
                self.hasher.hash(node, sibling)
            };
            index = index.parent();
            self.nodes.insert((level + 1, index), node);
        }
        self.root = node;

        trace!(%commitment, %address, digest = %self.digest(), "inserted commitment");
        Ok(address)
    }

    /// Whether `commitment` currently occupies its leaf.
    #[must_use]
    pub fn contains(&self, commitment: Commitment) -> bool {
        self.check_leaf(commitment).is_ok()
    }

    /// Membership path for `commitment`, leaf level first.
    ///
    /// Always `depth` entries long.
    pub fn path(&self, commitment: Commitment) -> Result<MembershipPath, AccumulatorError> {
        let mut index = self.check_leaf(commitment)?;

        let mut steps = Vec::with_capacity(self.depth);
        for level in 0..self.depth {
            let sibling = self.node(level, index.sibling());
            steps.push(if index.is_right() {
                PathNode::Left(sibling)
            } else {
                PathNode::Right(sibling)
            });
            index = index.parent();
        }

        Ok(MembershipPath::from(steps))
    }

    /// Leaf address for a new insertion, allocating one if sequential.
    fn assign(&mut self, commitment: Commitment) -> Result<NodeIndex, AccumulatorError> {
        match self.addressing {
            Addressing::ValueBits => Ok(NodeIndex::from_value(commitment.into(), self.depth)),
            Addressing::Sequential => {
                if let Some(address) = self.positions.get(&commitment) {
                    return Ok(*address);
                }
                let position = u64::try_from(self.positions.len())
                    .ok()
                    .filter(|next| address::fits(*next, self.depth))
                    .ok_or(AccumulatorError::AccumulatorFull { depth: self.depth })?;
                let address = NodeIndex::from_position(position);
                self.positions.insert(commitment, address);
                Ok(address)
            }
        }
    }

    /// Leaf address `commitment` would occupy, without allocating.
    fn locate(&self, commitment: Commitment) -> Option<NodeIndex> {
        match self.addressing {
            Addressing::ValueBits => Some(NodeIndex::from_value(commitment.into(), self.depth)),
            Addressing::Sequential => self.positions.get(&commitment).copied(),
        }
    }

    fn check_leaf(&self, commitment: Commitment) -> Result<NodeIndex, AccumulatorError> {
        let mismatch = |leaf| AccumulatorError::LeafMismatch { commitment, leaf };

        let address = self
            .locate(commitment)
            .ok_or_else(|| mismatch(LeafState::Unassigned))?;
        match self.nodes.get(&(0, address)).copied() {
            Some(stored) if stored == Fp::from(commitment) => Ok(address),
            Some(stored) => Err(mismatch(LeafState::Holds(address, stored.into()))),
            None => Err(mismatch(LeafState::Empty(address))),
        }
    }

    /// Hash at `(level, index)`, falling back to the empty hash for that level.
    fn node(&self, level: usize, index: NodeIndex) -> Fp {
        debug_assert!(level <= self.depth, "level {level} above the root");
        self.nodes
            .get(&(level, index))
            .copied()
            .or_else(|| self.empty_root(level))
            .unwrap_or(EMPTY_LEAF)
    }
}
