use core::slice;

use pasta_curves::Fp;

use crate::hash::HashOracle;

/// One step of a membership path: the sibling hash and the side it sits on.
///
/// The direction bit handed to the spend circuit is `1` for
/// [`Left`](Self::Left) (the path node is a right child) and `0` for
/// [`Right`](Self::Right).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathNode {
    /// Sibling is the left child: `parent = H(sibling, node)`.
    Left(Fp),
    /// Sibling is the right child: `parent = H(node, sibling)`.
    Right(Fp),
}

impl PathNode {
    /// The sibling hash.
    #[must_use]
    pub const fn sibling(&self) -> Fp {
        match *self {
            Self::Left(sibling) | Self::Right(sibling) => sibling,
        }
    }

    /// Circuit direction bit: `true` iff the sibling is on the left.
    #[must_use]
    pub const fn direction(&self) -> bool {
        match *self {
            Self::Left(_) => true,
            Self::Right(_) => false,
        }
    }

    /// Hashes `node` with this sibling into their parent.
    pub fn combine<H: HashOracle>(&self, hasher: &H, node: Fp) -> Fp {
        match *self {
            Self::Left(sibling) => hasher.hash(sibling, node),
            Self::Right(sibling) => hasher.hash(node, sibling),
        }
    }
}

/// Sibling path from a leaf (level 0) up to the level just below the root.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MembershipPath(Vec<PathNode>);

impl MembershipPath {
    /// Number of levels, equal to the accumulator depth.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True only for a depth-0 accumulator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Steps ordered from the leaf level upwards.
    pub fn iter(&self) -> slice::Iter<'_, PathNode> {
        self.0.iter()
    }

    /// Folds `leaf` up the path, returning the root it implies.
    pub fn root<H: HashOracle>(&self, hasher: &H, leaf: Fp) -> Fp {
        self.0
            .iter()
            .fold(leaf, |node, step| step.combine(hasher, node))
    }
}

impl From<Vec<PathNode>> for MembershipPath {
    fn from(nodes: Vec<PathNode>) -> Self {
        Self(nodes)
    }
}

impl<'path> IntoIterator for &'path MembershipPath {
    type Item = &'path PathNode;
    type IntoIter = slice::Iter<'path, PathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
