//! Coin transcripts: every issued coin, in issuance order.
//!
//! The text form has one coin per line, fields separated by whitespace:
//!
//! ```text
//! 1839475893
//! 1984375234 2983475298
//! 3489725451 9834572345
//! 3452345234
//! ```
//!
//! A single field is a bare commitment. Two fields are a nullifier and its
//! nonce, committed as $H(\mathsf{nf}, \rho)$. Blank lines are ignored.

use core::{fmt, slice, str::FromStr};

use thiserror::Error;

use crate::{
    hash::HashOracle,
    primitives::{Commitment, Nonce, Nullifier, decimal::DecimalError},
};

/// A malformed transcript line. Line numbers start at 1.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TranscriptError {
    /// Neither one nor two fields.
    #[error("line {line}: expected 1 or 2 fields, found {fields}")]
    InvalidRecordArity {
        /// Offending line.
        line: usize,
        /// Number of whitespace-separated fields on it.
        fields: usize,
    },
    /// A field that is not a canonical decimal field element.
    #[error("line {line}: {source}")]
    InvalidFieldElement {
        /// Offending line.
        line: usize,
        /// What was wrong with the field.
        source: DecimalError,
    },
}

/// One issued coin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoinRecord {
    /// A published commitment whose opening is unknown.
    Bare(Commitment),
    /// A coin whose opening is known.
    Keyed {
        /// The coin's nullifier.
        nullifier: Nullifier,
        /// The coin's nonce.
        nonce: Nonce,
    },
}

impl CoinRecord {
    /// The commitment this record inserts into the accumulator.
    pub fn commitment<H: HashOracle>(&self, hasher: &H) -> Commitment {
        match *self {
            Self::Bare(commitment) => commitment,
            Self::Keyed { nullifier, nonce } => Commitment::derive(hasher, nullifier, nonce),
        }
    }

    fn parse_line(line: usize, text: &str) -> Result<Option<Self>, TranscriptError> {
        let invalid = |source| TranscriptError::InvalidFieldElement { line, source };
        let fields: Vec<&str> = text.split_whitespace().collect();

        match *fields.as_slice() {
            [] => Ok(None),
            [commitment] => Ok(Some(Self::Bare(commitment.parse().map_err(invalid)?))),
            [nullifier, nonce] => Ok(Some(Self::Keyed {
                nullifier: nullifier.parse().map_err(invalid)?,
                nonce: nonce.parse().map_err(invalid)?,
            })),
            [..] => Err(TranscriptError::InvalidRecordArity {
                line,
                fields: fields.len(),
            }),
        }
    }
}

/// Writes the record as one transcript line (without the newline).
impl fmt::Display for CoinRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Bare(commitment) => write!(f, "{commitment}"),
            Self::Keyed { nullifier, nonce } => write!(f, "{nullifier} {nonce}"),
        }
    }
}

/// An ordered list of coin records.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transcript(Vec<CoinRecord>);

impl Transcript {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Records in issuance order.
    pub fn iter(&self) -> slice::Iter<'_, CoinRecord> {
        self.0.iter()
    }
}

impl FromStr for Transcript {
    type Err = TranscriptError;

    /// Parses newline-delimited records, stopping at the first bad line.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut records = Vec::new();
        for (number, line) in (1..).zip(text.lines()) {
            if let Some(record) = CoinRecord::parse_line(number, line)? {
                records.push(record);
            }
        }
        Ok(Self(records))
    }
}

impl FromIterator<CoinRecord> for Transcript {
    fn from_iter<I: IntoIterator<Item = CoinRecord>>(records: I) -> Self {
        Self(records.into_iter().collect())
    }
}

impl<'transcript> IntoIterator for &'transcript Transcript {
    type Item = &'transcript CoinRecord;
    type IntoIter = slice::Iter<'transcript, CoinRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One record per line, each terminated by `\n`.
impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|record| writeln!(f, "{record}"))
    }
}
