//! Transcript replay.
//!
//! Rebuilds the accumulator from the full transcript and, on the way,
//! captures the coin being spent. Every record is inserted, including the
//! captured one, and in transcript order: the digest commits to the whole
//! ordered sequence, so skipping or reordering records yields a digest no
//! verifier will accept.

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::{
    accumulator::{AccumulatorError, SparseAccumulator},
    hash::HashOracle,
    primitives::{Commitment, Digest, Nonce, Nullifier},
    transcript::{CoinRecord, Transcript},
};

/// Replay failures. Record numbers start at 1 and skip blank lines.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum ReplayError {
    /// The target nullifier opens more than one coin.
    #[error("nullifier {nullifier} appears in records {first} and {second}")]
    DuplicateTargetMatch {
        /// The target nullifier.
        nullifier: Nullifier,
        /// Record of the first capture.
        first: usize,
        /// Record of the conflicting capture.
        second: usize,
    },
    /// No keyed record carries the target nullifier.
    #[error("nullifier {nullifier} does not appear in the transcript")]
    NullifierNotFound {
        /// The target nullifier.
        nullifier: Nullifier,
    },
    /// The accumulator rejected an insertion.
    #[error(transparent)]
    Accumulator(#[from] AccumulatorError),
}

/// The coin matched during replay.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Capture {
    record: usize,
    commitment: Commitment,
    nonce: Nonce,
}

/// Outcome of a replay: the final accumulator and the captured coin.
#[derive(Clone, Debug)]
pub struct Replayed<H> {
    accumulator: SparseAccumulator<H>,
    nullifier: Nullifier,
    capture: Capture,
}

impl<H: HashOracle> Replayed<H> {
    /// Digest after every record was inserted.
    #[must_use]
    pub fn digest(&self) -> Digest {
        self.accumulator.digest()
    }

    /// The target nullifier.
    #[must_use]
    pub const fn nullifier(&self) -> Nullifier {
        self.nullifier
    }

    /// Commitment of the captured coin, $H(\mathsf{nf}, \rho)$.
    #[must_use]
    pub const fn commitment(&self) -> Commitment {
        self.capture.commitment
    }

    /// Nonce of the captured coin.
    #[must_use]
    pub const fn nonce(&self) -> Nonce {
        self.capture.nonce
    }

    /// 1-based record number of the captured coin.
    #[must_use]
    pub const fn record(&self) -> usize {
        self.capture.record
    }

    /// The final accumulator, for path queries.
    #[must_use]
    pub const fn accumulator(&self) -> &SparseAccumulator<H> {
        &self.accumulator
    }

    /// Gives the accumulator back to the caller.
    #[must_use]
    pub fn into_accumulator(self) -> SparseAccumulator<H> {
        self.accumulator
    }
}

/// Replays `transcript` into `accumulator`, capturing the coin whose
/// nullifier is `target`.
///
/// Only keyed records can match; a bare commitment equal to `target` is
/// just another leaf.
pub fn replay<H: HashOracle>(
    mut accumulator: SparseAccumulator<H>,
    transcript: &Transcript,
    target: Nullifier,
) -> Result<Replayed<H>, ReplayError> {
    let mut capture: Option<Capture> = None;

    for (record, coin) in (1..).zip(transcript) {
        let commitment = coin.commitment(accumulator.hasher());

        match *coin {
            CoinRecord::Keyed { nullifier, nonce } if nullifier == target => {
                if let Some(first) = capture {
                    return Err(ReplayError::DuplicateTargetMatch {
                        nullifier,
                        first: first.record,
                        second: record,
                    });
                }
                debug!(record, %commitment, "captured target coin");
                capture = Some(Capture {
                    record,
                    commitment,
                    nonce,
                });
            }
            CoinRecord::Keyed { .. } | CoinRecord::Bare(_) => {}
        }

        let address = accumulator.insert(commitment)?;
        trace!(record, %address, "replayed record");
    }

    let capture = capture.ok_or(ReplayError::NullifierNotFound { nullifier: target })?;
    info!(
        records = transcript.len(),
        leaves = accumulator.len(),
        digest = %accumulator.digest(),
        "replayed transcript"
    );

    Ok(Replayed {
        accumulator,
        nullifier: target,
        capture,
    })
}
