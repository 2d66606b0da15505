//! # CLI Interface
//!
//! Defines the command-line argument structure for `fairx` using `clap`
//! derive. Three subcommands: `check`, `commit` and `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// FairX witness tool.
///
/// Evaluates fair-exchange witnesses against the circuit and recomputes
/// transcript commitments, without producing proofs.
#[derive(Parser, Debug)]
#[command(
    name = "fairx",
    about = "FairX fair-exchange witness tool",
    version,
    propagate_version = true
)]
pub struct FairxCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Log output format.
    #[arg(long, global = true, env = "FAIRX_LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Default log filter. `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, env = "FAIRX_LOG", default_value = "warn")]
    pub log_level: String,

    /// Report format on stdout.
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Top-level subcommands for the `fairx` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate every constraint of a witness file. Exits non-zero when the
    /// witness is rejected.
    Check(WitnessArgs),
    /// Recompute the public commitment from a witness file and compare it
    /// with the file's `Hpub`.
    Commit(WitnessArgs),
    /// Print version information and exit.
    Version,
}

/// A witness file argument.
#[derive(Args, Debug)]
pub struct WitnessArgs {
    /// Path to a circom-style `input.json` witness.
    pub witness: PathBuf,
}
