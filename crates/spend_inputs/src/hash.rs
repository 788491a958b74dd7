//! The two-input field hash shared by commitments and tree nodes.
//!
//! One function $H : \mathbb{F}_p \times \mathbb{F}_p \to \mathbb{F}_p$
//! serves both uses:
//!
//! - coin commitments: $\mathsf{cm} = H(\mathsf{nf}, \rho)$
//! - tree nodes: $\mathsf{parent} = H(\mathsf{left}, \mathsf{right})$
//!
//! There is no domain separation between the two. The spend circuit hashes
//! the same way, so adding a tag here would produce witnesses it rejects.

use halo2_gadgets::poseidon::primitives::{self as poseidon, ConstantLength, P128Pow5T3};
use pasta_curves::Fp;

/// A deterministic, collision-resistant two-input hash over $\mathbb{F}_p$.
///
/// The accumulator and the replayer only ever see this trait, so tests and
/// alternative circuits can swap the primitive without touching the tree.
pub trait HashOracle {
    /// Hashes an ordered pair. `hash(a, b)` and `hash(b, a)` differ.
    fn hash(&self, left: Fp, right: Fp) -> Fp;
}

impl<H: HashOracle + ?Sized> HashOracle for &H {
    fn hash(&self, left: Fp, right: Fp) -> Fp {
        (**self).hash(left, right)
    }
}

/// Poseidon over the Pallas base field.
///
/// `P128Pow5T3` (width 3, rate 2) absorbing exactly two elements with the
/// `ConstantLength<2>` padding, matching the halo2 Poseidon chip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poseidon;

impl HashOracle for Poseidon {
    fn hash(&self, left: Fp, right: Fp) -> Fp {
        poseidon::Hash::<Fp, P128Pow5T3, ConstantLength<2>, 3, 2>::init().hash([left, right])
    }
}
