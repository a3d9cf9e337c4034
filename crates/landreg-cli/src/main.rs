//! # landreg CLI entry point
//!
//! Parses command-line arguments, sets up logging and dispatches to the
//! subcommand handlers in the library crate.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use landreg_cli::audit::{run_audit, AuditArgs};
use landreg_cli::digest::{run_digest, DigestArgs};
use landreg_cli::verify::{run_verify, VerifyArgs};

/// Land registry document verification.
///
/// Confirms that the deed a parcel record points to is the one attested on
/// the ledger: same content identifier, same SHA-256 fingerprint.
#[derive(Parser, Debug)]
#[command(name = "landreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify one parcel's document against the ledger.
    Verify(VerifyArgs),

    /// Verify many parcels and summarize.
    Audit(AuditArgs),

    /// Print the SHA-256 fingerprint of a file.
    Digest(DigestArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "landreg starting");

    let result = match &cli.command {
        Commands::Digest(args) => run_digest(args),
        Commands::Verify(args) => match landreg_cli::connect() {
            Ok(ctx) => run_verify(args, &ctx, &landreg_cli::cancel_on_ctrl_c()).await,
            Err(e) => Err(e),
        },
        Commands::Audit(args) => match landreg_cli::connect() {
            Ok(ctx) => run_audit(args, &ctx, &landreg_cli::cancel_on_ctrl_c()).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
