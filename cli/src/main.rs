// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # FairX Witness Tool
//!
//! Entry point for the `fairx` binary. Parses CLI arguments, initializes
//! logging, and runs one subcommand:
//!
//! - `check`   — evaluate every constraint of a witness file
//! - `commit`  — recompute the transcript commitment of a witness file
//! - `version` — print build version information
//!
//! Reports go to stdout, logs to stderr. A rejected witness or a commitment
//! mismatch ends the process with a non-zero exit code.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

use fairx_protocol::crypto::bits::pack_bits;
use fairx_protocol::crypto::StandardPrimitives;
use fairx_protocol::types::{PublicInputs, Witness};
use fairx_protocol::zkp::binder::{split_digest, transcript_digest};
use fairx_protocol::zkp::witness::field_to_decimal;
use fairx_protocol::zkp::{evaluate, parse_witness_json, CheckReport};

use cli::{Commands, FairxCli, OutputFormat};

fn main() -> Result<()> {
    let cli = FairxCli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_format);

    match cli.command {
        Commands::Check(args) => check(&args.witness, cli.global.output),
        Commands::Commit(args) => commit(&args.witness, cli.global.output),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Reads and validates a witness file.
fn load_witness(path: &Path) -> Result<(Witness, PublicInputs)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read witness file {}", path.display()))?;
    let instance = parse_witness_json(&json)
        .with_context(|| format!("invalid witness file {}", path.display()))?;
    tracing::info!(path = %path.display(), "witness loaded");
    Ok(instance)
}

fn check(path: &Path, output: OutputFormat) -> Result<()> {
    let (witness, public) = load_witness(path)?;
    let primitives = StandardPrimitives::new();

    let eval = evaluate(&primitives, &witness, &public).context("circuit evaluation failed")?;
    let report = CheckReport::from(&eval);

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_check_report(&report),
    }

    if !report.satisfied {
        bail!(
            "witness rejected: {}",
            eval.which_is_unsatisfied().unwrap_or("unknown constraint")
        );
    }
    if !report.witness_sane {
        bail!(
            "witness sanity assertion failed: {}",
            eval.which_is_insane().unwrap_or("unknown assertion")
        );
    }
    Ok(())
}

fn print_check_report(report: &CheckReport) {
    println!("satisfied           {}", report.satisfied);
    println!("witness sane        {}", report.witness_sane);
    println!("constraints         {}", report.num_constraints);
    println!("r1cs constraints    {}", report.num_r1cs_constraints);
    println!("witness assertions  {}", report.num_witness_assertions);
    for failure in &report.failures {
        println!("failed              {} ({:?})", failure.label, failure.kind);
    }
}

/// Result of `fairx commit`. Both vectors are in public-input order.
#[derive(Debug, Serialize)]
struct CommitReport {
    digest: String,
    hpub: Vec<String>,
    expected: Vec<String>,
    matches: bool,
}

fn commit(path: &Path, output: OutputFormat) -> Result<()> {
    let (witness, public) = load_witness(path)?;
    let primitives = StandardPrimitives::new();

    let digest = transcript_digest(
        &primitives,
        &witness.qa,
        &witness.qb,
        witness.nonce,
        &witness.ew,
    )
    .context("failed to hash the transcript")?;
    let computed = PublicInputs::new(split_digest(&digest)?).to_vec();
    let expected = public.to_vec();

    let report = CommitReport {
        digest: hex::encode(pack_bits(&digest)?),
        hpub: computed.iter().map(field_to_decimal).collect(),
        expected: expected.iter().map(field_to_decimal).collect(),
        matches: computed == expected,
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("digest   {}", report.digest);
            for (i, half) in report.hpub.iter().enumerate() {
                println!("Hpub[{i}]  {half}");
            }
            println!("matches  {}", report.matches);
        }
    }

    if !report.matches {
        bail!("commitment does not match the witness file's Hpub");
    }
    Ok(())
}

/// Prints version information.
fn print_version() {
    println!("fairx     {}", env!("CARGO_PKG_VERSION"));
    println!("protocol  {}", fairx_protocol::config::PROTOCOL_VERSION);
}
