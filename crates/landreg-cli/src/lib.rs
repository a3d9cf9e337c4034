//! # landreg-cli: the `landreg` command
//!
//! ```bash
//! landreg verify LHR-001 --timeout 30 --retries 2
//! landreg audit LHR-001 LHR-002 LHR-003 --concurrency 8 --json
//! landreg digest deed.pdf
//! ```
//!
//! Service endpoints come from `LANDREG_*` environment variables (see
//! `landreg_client::RegistryConfig::from_env`).
//!
//! ## Exit codes
//!
//! - `0`: every parcel verified as authentic (or the command succeeded).
//! - `2`: verification completed, but at least one parcel is not authentic.
//! - `1`: operational error (bad configuration, unreachable ledger, ...).

pub mod audit;
pub mod digest;
pub mod verify;

use anyhow::{Context, Result};
use landreg_client::{RegistryClient, RegistryConfig};
use landreg_integrity::RegistryContext;
use tokio_util::sync::CancellationToken;

/// Exit code for a completed check that did not come back authentic.
pub const EXIT_NOT_AUTHENTIC: u8 = 2;

/// Build a registry context from the environment.
pub fn connect() -> Result<RegistryContext> {
    let config = RegistryConfig::from_env().context("loading registry configuration")?;
    let client = RegistryClient::new(config).context("building registry client")?;
    Ok(client.into_context())
}

/// A token cancelled on Ctrl-C, so in-flight retrievals resolve promptly.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling in-flight verifications");
            trigger.cancel();
        }
    });
    token
}

/// Convert an optional `--timeout` in seconds.
pub(crate) fn timeout_from_secs(secs: Option<u64>) -> Option<std::time::Duration> {
    secs.filter(|s| *s > 0).map(std::time::Duration::from_secs)
}
