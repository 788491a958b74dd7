//! Failure taxonomy.
//!
//! Every failure is fatal: witness computation is a one-shot batch job, and
//! a partial witness is worse than none. Each error reports an
//! [`ErrorKind`] tag that the command-line tool prints and maps to its exit
//! status.

use core::fmt;

use thiserror::Error;

use crate::{accumulator::AccumulatorError, replay::ReplayError, transcript::TranscriptError};

/// Stable, machine-readable failure tags.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// A transcript line with neither one nor two fields.
    InvalidRecordArity,
    /// A value that is not a canonical decimal field element.
    InvalidFieldElement,
    /// The target nullifier opens more than one coin.
    DuplicateTargetMatch,
    /// No coin carries the target nullifier.
    NullifierNotFound,
    /// The requested commitment does not occupy its leaf.
    LeafMismatch,
    /// Depth beyond the address width.
    DepthTooLarge,
    /// Sequential addressing ran out of leaves.
    AccumulatorFull,
}

impl ErrorKind {
    /// The tag as printed in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRecordArity => "InvalidRecordArity",
            Self::InvalidFieldElement => "InvalidFieldElement",
            Self::DuplicateTargetMatch => "DuplicateTargetMatch",
            Self::NullifierNotFound => "NullifierNotFound",
            Self::LeafMismatch => "LeafMismatch",
            Self::DepthTooLarge => "DepthTooLarge",
            Self::AccumulatorFull => "AccumulatorFull",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can stop a witness from being computed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum WitnessError {
    /// The transcript text is malformed.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    /// Replay found zero or several target coins.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// The accumulator refused a query or configuration.
    #[error(transparent)]
    Accumulator(#[from] AccumulatorError),
}

impl WitnessError {
    /// Tag of the underlying failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::Transcript(TranscriptError::InvalidRecordArity { .. }) => {
                ErrorKind::InvalidRecordArity
            }
            Self::Transcript(TranscriptError::InvalidFieldElement { .. }) => {
                ErrorKind::InvalidFieldElement
            }
            Self::Replay(inner) => inner.kind(),
            Self::Accumulator(inner) => inner.kind(),
        }
    }
}

impl TranscriptError {
    /// Tag of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::InvalidRecordArity { .. } => ErrorKind::InvalidRecordArity,
            Self::InvalidFieldElement { .. } => ErrorKind::InvalidFieldElement,
        }
    }
}

impl ReplayError {
    /// Tag of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::DuplicateTargetMatch { .. } => ErrorKind::DuplicateTargetMatch,
            Self::NullifierNotFound { .. } => ErrorKind::NullifierNotFound,
            Self::Accumulator(inner) => inner.kind(),
        }
    }
}

impl AccumulatorError {
    /// Tag of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::DepthTooLarge { .. } => ErrorKind::DepthTooLarge,
            Self::AccumulatorFull { .. } => ErrorKind::AccumulatorFull,
            Self::LeafMismatch { .. } => ErrorKind::LeafMismatch,
        }
    }
}
