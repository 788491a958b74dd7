use pasta_curves::Fp;

use crate::hash::HashOracle;

/// A coin commitment: the value stored at an accumulator leaf.
///
/// Either published directly (a bare transcript record) or derived from a
/// keyed coin as $\mathsf{cm} = H(\mathsf{nf}, \rho)$.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Commitment(Fp);

impl Commitment {
    /// Commits to a keyed coin: $H(\mathsf{nf}, \rho)$.
    ///
    /// Uses the tree's own node hash with no domain tag.
    #[must_use]
    pub fn derive<H: HashOracle>(hasher: &H, nullifier: Nullifier, nonce: Nonce) -> Self {
        Self(hasher.hash(nullifier.0, nonce.0))
    }
}

field_newtype!(Commitment);

/// A coin nullifier ($\mathsf{nf}$), revealed when the coin is spent.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Nullifier(Fp);

field_newtype!(Nullifier);

/// The secret blinding nonce ($\rho$) paired with a nullifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Nonce(Fp);

field_newtype!(Nonce);
