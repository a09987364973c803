//! # vres CLI entry point
//!
//! Parses command-line arguments, loads configuration, installs logging on
//! stderr and dispatches to the subcommand handlers. Results are printed
//! as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vres_cli::config::CliConfig;
use vres_cli::convert::{
    run_duration, run_fingerprint, run_from_vc, run_import, run_to_vc, DocumentArgs, DurationArgs,
    ToVcArgs,
};
use vres_cli::link::{run_link, LinkArgs};
use vres_cli::write_json;

/// Verified resume engine CLI.
///
/// Converts resumes between the editor layout and the resume Verifiable
/// Credential, maps import payloads, fingerprints documents, and reads or
/// writes stored credential links.
#[derive(Parser, Debug)]
#[command(name = "vres", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the resume credential from an editor resume.
    ToVc(ToVcArgs),

    /// Map a resume credential back to the editor layout.
    FromVc(DocumentArgs),

    /// Map an import payload (Drive export, VC, editor JSON) to the editor layout.
    Import(DocumentArgs),

    /// Print the change-detection fingerprint of a resume.
    Fingerprint(DocumentArgs),

    /// Decode or encode stored credential links.
    Link(LinkArgs),

    /// Human-readable duration between two dates.
    Duration(DurationArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("vres CLI starting");

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| {
        let value = match &cli.command {
            Commands::ToVc(args) => run_to_vc(args, &config),
            Commands::FromVc(args) => run_from_vc(args),
            Commands::Import(args) => run_import(args),
            Commands::Fingerprint(args) => run_fingerprint(args),
            Commands::Link(args) => run_link(args),
            Commands::Duration(args) => run_duration(args),
        }?;
        write_json(&value, cli.output.as_deref())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
