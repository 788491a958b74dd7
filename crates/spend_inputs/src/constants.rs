//! Accumulator parameters and tool-wide defaults.
//!
//! The empty-leaf sentinel and the address width are shared with the spend
//! circuit that consumes the witness. Changing either changes every digest.

use ff::Field as _;
use pasta_curves::Fp;

/// Hash of an unoccupied leaf ($h_0$).
///
/// Empty subtrees at level $i + 1$ hash to $h_{i+1} = H(h_i, h_i)$.
pub const EMPTY_LEAF: Fp = Fp::ZERO;

/// Number of address bits available to a leaf.
///
/// A canonical $\mathbb{F}_p$ representation is 32 little-endian bytes, so
/// value-derived addresses never need more than 256 bits.
pub const MAX_DEPTH: usize = 256;

/// Width of the little-endian field representation in bytes.
pub(crate) const REPR_BYTES: usize = 32;

/// Witness file written when no `--output` is given.
pub const DEFAULT_WITNESS_PATH: &str = "input.json";
