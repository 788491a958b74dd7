//! `compute-spend-inputs`: writes the spend-circuit witness for one coin.
//!
//! ```text
//! compute-spend-inputs [OPTIONS] <DEPTH> <TRANSCRIPT> <NULLIFIER>
//! ```
//!
//! On failure nothing is written, `error[<Kind>]: <message>` goes to stderr,
//! and the exit status identifies the kind.

use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use spend_inputs::{
    Addressing, ErrorKind, Nullifier, Poseidon, SparseAccumulator, WitnessError,
    compute_witness, constants::DEFAULT_WITNESS_PATH, decimal::DecimalError,
    transcript::Transcript,
};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Leaf placement policy, as spelled on the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum AddressingArg {
    /// Low `DEPTH` bits of the commitment.
    #[default]
    ValueBits,
    /// Next free leaf, in first-insertion order.
    Sequential,
}

impl From<AddressingArg> for Addressing {
    fn from(arg: AddressingArg) -> Self {
        match arg {
            AddressingArg::ValueBits => Self::ValueBits,
            AddressingArg::Sequential => Self::Sequential,
        }
    }
}

/// Tool configuration resolved from the command line.
#[derive(Parser, Debug)]
#[command(name = "compute-spend-inputs", version, about)]
struct Config {
    /// Accumulator depth (number of levels below the digest)
    depth: usize,
    /// Coin transcript, one `commitment` or `nullifier nonce` per line
    transcript: PathBuf,
    /// Nullifier of the coin being spent, in decimal
    nullifier: String,
    /// Where to write the witness JSON
    #[arg(short, long, default_value = DEFAULT_WITNESS_PATH)]
    output: PathBuf,
    /// How commitments are assigned to leaves
    #[arg(long, value_enum, default_value_t)]
    addressing: AddressingArg,
    /// Log each replayed record
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("nullifier argument: {0}")]
    Nullifier(DecimalError),
    #[error("cannot serialize witness: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Witness(#[from] WitnessError),
}

impl CliError {
    /// Diagnostic tag and exit status.
    fn into_status(self) -> (&'static str, u8) {
        match self {
            Self::Read { .. } | Self::Write { .. } => ("Io", 9),
            Self::Nullifier(_) => kind_status(ErrorKind::InvalidFieldElement),
            Self::Serialize(_) => ("Serialization", 10),
            Self::Witness(inner) => kind_status(inner.kind()),
        }
    }
}

const fn kind_status(kind: ErrorKind) -> (&'static str, u8) {
    let code = match kind {
        ErrorKind::InvalidRecordArity => 3,
        ErrorKind::DuplicateTargetMatch => 4,
        ErrorKind::NullifierNotFound => 5,
        ErrorKind::LeafMismatch => 6,
        ErrorKind::InvalidFieldElement => 7,
        ErrorKind::DepthTooLarge | ErrorKind::AccumulatorFull => 8,
    };
    (kind.as_str(), code)
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

fn run(config: &Config) -> Result<(), CliError> {
    let target: Nullifier = config.nullifier.parse().map_err(CliError::Nullifier)?;
    let text = fs::read_to_string(&config.transcript).map_err(|source| CliError::Read {
        path: config.transcript.clone(),
        source,
    })?;
    let transcript: Transcript = text.parse().map_err(WitnessError::from)?;
    debug!(records = transcript.len(), path = %config.transcript.display(), "loaded transcript");

    let accumulator = SparseAccumulator::new(config.depth, config.addressing.into(), Poseidon)
        .map_err(WitnessError::from)?;
    debug!(
        depth = accumulator.depth(),
        addressing = ?accumulator.addressing(),
        "replaying into empty accumulator"
    );
    let witness = compute_witness(accumulator, &transcript, target)?;

    let mut json = serde_json::to_string(&witness)?;
    json.push('\n');
    fs::write(&config.output, json).map_err(|source| CliError::Write {
        path: config.output.clone(),
        source,
    })?;
    info!(
        digest = %witness.digest,
        output = %config.output.display(),
        "wrote witness"
    );
    Ok(())
}

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let message = error.to_string();
            let (tag, code) = error.into_status();
            eprintln!("error[{tag}]: {message}");
            ExitCode::from(code)
        }
    }
}
