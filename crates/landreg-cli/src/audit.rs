//! # Audit Subcommand
//!
//! Verifies a list of parcels concurrently and prints one line per parcel
//! followed by a summary, or the whole report as JSON.

use anyhow::Result;
use clap::Args;

use landreg_core::RecordKey;
use landreg_integrity::{audit, AuditEntry, AuditOptions, AuditReport, RegistryContext};
use tokio_util::sync::CancellationToken;

use crate::EXIT_NOT_AUTHENTIC;

/// Arguments for the `landreg audit` subcommand.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Parcel identifiers to verify.
    #[arg(value_name = "PARCEL", required = true)]
    pub parcels: Vec<RecordKey>,

    /// Maximum verifications in flight.
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub concurrency: usize,

    /// Per-parcel limit on content retrieval, in seconds (0 = no limit).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the audit subcommand.
pub async fn run_audit(args: &AuditArgs, ctx: &RegistryContext, cancel: &CancellationToken) -> Result<u8> {
    let options = AuditOptions {
        concurrency: args.concurrency,
        per_record_timeout: crate::timeout_from_secs(args.timeout),
    };
    let report = audit(ctx, &args.parcels, &options, cancel).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }

    Ok(if report.summary.all_authentic() {
        0
    } else {
        EXIT_NOT_AUTHENTIC
    })
}

/// Human rendering: one line per parcel, then the counts.
pub fn render(report: &AuditReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        match entry {
            AuditEntry::Verified(result) => out.push_str(&crate::verify::render(result)),
            AuditEntry::LookupFailed { record_key, error } => {
                out.push_str(&format!("{:<20} {record_key}  ({error})", "LOOKUP_FAILED"));
            }
        }
        out.push('\n');
    }
    let s = &report.summary;
    out.push_str(&format!(
        "\n{} parcels: {} authentic, {} identifier mismatch, {} hash mismatch, {} unavailable, {} lookup failed\n",
        s.total, s.authentic, s.identifier_mismatch, s.hash_mismatch, s.content_unavailable, s.lookup_failed
    ));
    out
}
