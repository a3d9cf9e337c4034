//! # Verify Subcommand
//!
//! Verifies one parcel: reads the ledger and the off-chain record, fetches
//! the document and checks its digest. Optionally retries unavailable
//! content with exponential backoff.

use anyhow::Result;
use clap::Args;

use landreg_core::RecordKey;
use landreg_integrity::{Abort, RegistryContext, RetryPolicy, VerificationResult};
use tokio_util::sync::CancellationToken;

use crate::EXIT_NOT_AUTHENTIC;

/// Arguments for the `landreg verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Parcel identifier as registered on the ledger.
    #[arg(value_name = "PARCEL")]
    pub parcel: RecordKey,

    /// Give up on content retrieval after this many seconds (0 = no limit).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retry unavailable content this many times.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub retries: u32,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the verify subcommand.
pub async fn run_verify(args: &VerifyArgs, ctx: &RegistryContext, cancel: &CancellationToken) -> Result<u8> {
    let abort = Abort::with_token(cancel.clone()).with_deadline(crate::timeout_from_secs(args.timeout));
    let policy = RetryPolicy {
        max_retries: args.retries,
        ..RetryPolicy::default()
    };

    let result = policy.verify_record(ctx, &args.parcel, &abort).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render(&result));
    }

    Ok(exit_code(&result))
}

/// One-line human rendering of a result.
pub fn render(result: &VerificationResult) -> String {
    let mut line = format!("{:<20} {}", result.outcome.as_str(), result.record_key);
    if let Some(d) = &result.computed_digest {
        line.push_str(&format!("  sha256={d}"));
    }
    line.push_str(&format!("  ({})", result.detail));
    line
}

fn exit_code(result: &VerificationResult) -> u8 {
    if result.is_authentic() {
        0
    } else {
        EXIT_NOT_AUTHENTIC
    }
}
