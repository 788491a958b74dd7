//! # spend_inputs
//!
//! Membership witnesses for spending a coin from a sparse commitment
//! accumulator.
//!
//! Every issued coin is appended to a fixed-depth binary Merkle tree over
//! the Pallas base field. To spend a coin, its owner proves in zero
//! knowledge that $H(\mathsf{nf}, \rho)$ is a leaf under the published
//! digest, revealing only the nullifier $\mathsf{nf}$. This crate prepares
//! the private half of that statement:
//!
//! 1. parse the coin [`Transcript`](transcript::Transcript),
//! 2. [`replay`](replay::replay) it into a [`SparseAccumulator`], capturing
//!    the coin whose nullifier is being spent,
//! 3. extract its [`MembershipPath`] and assemble a [`Witness`].
//!
//! [`compute_witness`] runs all three steps.
//!
//! ## Nomenclature
//!
//! - **commitment**: a leaf value; a keyed coin commits as
//!   $H(\mathsf{nf}, \rho)$
//! - **digest**: the accumulator root
//! - **direction bit**: `1` when the sibling at that level is the left child

#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(clippy::pub_use, reason = "exporting items for consumers")]

extern crate alloc;

pub mod accumulator;
pub mod constants;
pub mod error;
pub mod hash;
pub mod replay;
pub mod transcript;
pub mod witness;

mod primitives;

pub use accumulator::{Addressing, MembershipPath, SparseAccumulator};
pub use error::{ErrorKind, WitnessError};
pub use hash::{HashOracle, Poseidon};
pub use primitives::{Commitment, Digest, Nonce, Nullifier, decimal};
pub use witness::{Witness, compute_witness};
