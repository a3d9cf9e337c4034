//! # landreg-client: HTTP collaborators for the land registry
//!
//! Live implementations of the three `landreg-integrity` ports:
//!
//! - **Ledger** via JSON-RPC `eth_call` against the registry contract
//!   ([`ledger::RpcLedgerReader`]).
//! - **Content** via a content-addressed HTTP gateway
//!   ([`gateway::GatewayContentStore`]).
//! - **Off-chain records** via a document database REST API
//!   ([`records::DocumentRecordStore`]).
//!
//! All three share one `reqwest::Client`. [`RegistryClient::into_context`]
//! wires them into a [`RegistryContext`] that callers pass around
//! explicitly.
//!
//! ## Timeouts
//!
//! Ledger and record-store reads carry a per-request timeout and retry
//! transport failures with exponential backoff. Content retrieval has
//! neither: its latency budget belongs to the verifier's caller.

pub mod abi;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod records;
pub(crate) mod retry;

pub use config::{ConfigError, RegistryConfig};
pub use error::ClientError;

use std::sync::Arc;
use std::time::Duration;

use landreg_integrity::RegistryContext;

/// The three live adapters, built from one configuration.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    ledger: ledger::RpcLedgerReader,
    content: gateway::GatewayContentStore,
    records: records::DocumentRecordStore,
}

impl RegistryClient {
    /// Build the HTTP clients from configuration.
    pub fn new(config: RegistryConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("landreg/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        // Gateway requests use the untimed client; metadata reads are bounded.
        let bounded = reqwest::Client::builder()
            .user_agent(concat!("landreg/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        tracing::debug!(?config, "registry client configured");

        Ok(Self {
            ledger: ledger::RpcLedgerReader::new(
                bounded.clone(),
                config.ledger_rpc_url,
                config.registry_contract,
                config.record_selector,
            ),
            content: gateway::GatewayContentStore::new(http, config.gateway_url),
            records: records::DocumentRecordStore::new(
                bounded,
                records::DocumentStoreSettings {
                    base_url: config.records_url,
                    project: config.records_project,
                    collection: config.records_collection,
                    content_id_field: config.content_id_field,
                    api_key: config.records_api_key,
                },
            ),
        })
    }

    /// Access the ledger adapter.
    pub fn ledger(&self) -> &ledger::RpcLedgerReader {
        &self.ledger
    }

    /// Access the content gateway adapter.
    pub fn content(&self) -> &gateway::GatewayContentStore {
        &self.content
    }

    /// Access the record-store adapter.
    pub fn records(&self) -> &records::DocumentRecordStore {
        &self.records
    }

    /// Wire the adapters into a verification context.
    pub fn into_context(self) -> RegistryContext {
        RegistryContext::new(
            Arc::new(self.ledger),
            Arc::new(self.records),
            Arc::new(self.content),
        )
    }
}
