//! Decimal text encoding of $\mathbb{F}_p$ elements.
//!
//! Transcripts, target nullifiers and witness files carry field elements as
//! unsigned base-10 strings of arbitrary length. Only canonical encodings
//! (values below the modulus) are accepted, so two different strings never
//! name the same element except through leading zeros.

use ff::PrimeField as _;
use num_bigint::BigUint;
use pasta_curves::Fp;
use thiserror::Error;

use crate::constants::REPR_BYTES;

/// A string that does not denote a canonical field element.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecimalError {
    /// Empty, signed, or containing a non-digit character.
    #[error("`{0}` is not an unsigned decimal integer")]
    NotDecimal(String),
    /// A valid integer, but not below the field modulus.
    #[error("`{0}` is not below the field modulus")]
    OutOfRange(String),
}

/// Parses an unsigned decimal string into a field element.
pub fn parse(text: &str) -> Result<Fp, DecimalError> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(DecimalError::NotDecimal(text.to_owned()));
    }
    let integer = BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or_else(|| DecimalError::NotDecimal(text.to_owned()))?;

    let digits = integer.to_bytes_le();
    if digits.len() > REPR_BYTES {
        return Err(DecimalError::OutOfRange(text.to_owned()));
    }
    let mut repr = [0u8; REPR_BYTES];
    for (slot, digit) in repr.iter_mut().zip(digits) {
        *slot = digit;
    }

    Option::from(Fp::from_repr(repr)).ok_or_else(|| DecimalError::OutOfRange(text.to_owned()))
}

/// Formats a field element as its canonical decimal string.
#[must_use]
pub fn format(value: &Fp) -> String {
    BigUint::from_bytes_le(&value.to_repr()).to_str_radix(10)
}

/// `serde` adapter writing field elements as decimal strings.
///
/// Decimal strings survive JSON consumers that parse numbers as doubles.
pub(crate) mod as_decimal {
    use pasta_curves::Fp;
    use serde::{Deserialize as _, Deserializer, Serializer, de};

    pub(crate) fn serialize<S: Serializer>(value: &Fp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(value))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fp, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse(&text).map_err(de::Error::custom)
    }
}
