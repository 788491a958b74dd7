//! Field-element newtypes for coins and accumulator states.

/// Conversions shared by every $\mathbb{F}_p$ newtype: raw field access,
/// decimal `Display`, and decimal `FromStr`.
macro_rules! field_newtype {
    ($name:ident) => {
        impl From<pasta_curves::Fp> for $name {
            fn from(fp: pasta_curves::Fp) -> Self {
                Self(fp)
            }
        }

        impl From<$name> for pasta_curves::Fp {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&$crate::primitives::decimal::format(&self.0))
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::primitives::decimal::DecimalError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                $crate::primitives::decimal::parse(text).map(Self)
            }
        }
    };
}

mod coin;
pub mod decimal;
mod digest;

pub use coin::{Commitment, Nonce, Nullifier};
pub use digest::Digest;
