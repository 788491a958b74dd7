use pasta_curves::Fp;
use serde::{Deserialize, Serialize};

use super::decimal::as_decimal;

/// The root hash of the commitment accumulator.
///
/// The accumulator is append-only: every insertion yields a new digest, and
/// a witness is only valid against the digest it was extracted with. The
/// spend circuit takes the digest as a public input.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Digest(#[serde(with = "as_decimal")] Fp);

field_newtype!(Digest);
