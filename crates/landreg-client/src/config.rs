//! Registry client configuration.
//!
//! Base URLs and identifiers for the three services the verifier reads
//! from. Loaded from `LANDREG_*` environment variables, or built explicitly
//! for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for connecting to the registry's external services.
///
/// Custom `Debug` implementation redacts the record-store API key to
/// prevent credential leakage in log output.
#[derive(Clone)]
pub struct RegistryConfig {
    /// Content-addressed gateway. Documents are read from `{gateway_url}/ipfs/{cid}`.
    pub gateway_url: Url,
    /// Ledger node JSON-RPC endpoint.
    pub ledger_rpc_url: Url,
    /// Address of the registry contract (`0x` + 40 hex chars).
    pub registry_contract: String,
    /// 4-byte selector of the contract's `(string) -> (string, string, ...)`
    /// record getter.
    pub record_selector: [u8; 4],
    /// Document database REST base URL.
    pub records_url: Url,
    /// Document database project id.
    pub records_project: String,
    /// Collection holding parcel records.
    pub records_collection: String,
    /// Field of a parcel document that holds the content pointer.
    pub content_id_field: String,
    /// Optional API key appended as `?key=` to record-store requests.
    pub records_api_key: Option<Zeroizing<String>>,
    /// Per-request timeout for ledger and record-store reads, in seconds.
    /// Content retrieval has no client-side timeout; callers bound it.
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("gateway_url", &self.gateway_url)
            .field("ledger_rpc_url", &self.ledger_rpc_url)
            .field("registry_contract", &self.registry_contract)
            .field("record_selector", &hex::encode(self.record_selector))
            .field("records_url", &self.records_url)
            .field("records_project", &self.records_project)
            .field("records_collection", &self.records_collection)
            .field("content_id_field", &self.content_id_field)
            .field(
                "records_api_key",
                &self.records_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LANDREG_GATEWAY_URL` (default: `https://ipfs.io`)
    /// - `LANDREG_LEDGER_RPC_URL` (default: `http://127.0.0.1:8545`)
    /// - `LANDREG_REGISTRY_CONTRACT` (required)
    /// - `LANDREG_RECORD_SELECTOR` (required, 8 hex chars, optional `0x`)
    /// - `LANDREG_RECORDS_URL` (default: `https://firestore.googleapis.com`)
    /// - `LANDREG_RECORDS_PROJECT` (required)
    /// - `LANDREG_RECORDS_COLLECTION` (default: `properties`)
    /// - `LANDREG_CONTENT_ID_FIELD` (default: `ipfsHash`)
    /// - `LANDREG_RECORDS_API_KEY` (optional)
    /// - `LANDREG_REQUEST_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gateway_url: env_url("LANDREG_GATEWAY_URL", "https://ipfs.io")?,
            ledger_rpc_url: env_url("LANDREG_LEDGER_RPC_URL", "http://127.0.0.1:8545")?,
            registry_contract: parse_contract(&required("LANDREG_REGISTRY_CONTRACT")?)?,
            record_selector: parse_selector(&required("LANDREG_RECORD_SELECTOR")?)?,
            records_url: env_url("LANDREG_RECORDS_URL", "https://firestore.googleapis.com")?,
            records_project: required("LANDREG_RECORDS_PROJECT")?,
            records_collection: std::env::var("LANDREG_RECORDS_COLLECTION")
                .unwrap_or_else(|_| "properties".to_string()),
            content_id_field: std::env::var("LANDREG_CONTENT_ID_FIELD")
                .unwrap_or_else(|_| "ipfsHash".to_string()),
            records_api_key: std::env::var("LANDREG_RECORDS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .map(Zeroizing::new),
            request_timeout_secs: std::env::var("LANDREG_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Point every service at one local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base` cannot be parsed.
    pub fn local_mock(base: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base)
            .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))?;
        Ok(Self {
            gateway_url: url.clone(),
            ledger_rpc_url: url.clone(),
            registry_contract: "0x00000000000000000000000000000000000000aa".to_string(),
            record_selector: [0x12, 0x34, 0x56, 0x78],
            records_url: url,
            records_project: "landreg-test".to_string(),
            records_collection: "properties".to_string(),
            content_id_field: "ipfsHash".to_string(),
            records_api_key: None,
            request_timeout_secs: 5,
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(var.to_string())),
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(var.to_string(), "not a base URL".to_string()));
    }
    Ok(url)
}

/// Parse a 4-byte function selector written as 8 hex chars.
pub fn parse_selector(raw: &str) -> Result<[u8; 4], ConfigError> {
    let body = raw.trim().trim_start_matches("0x");
    let mut out = [0u8; 4];
    hex::decode_to_slice(body, &mut out)
        .map_err(|e| ConfigError::InvalidSelector(raw.to_string(), e.to_string()))?;
    Ok(out)
}

/// Validate a contract address: `0x` followed by 40 hex chars.
pub fn parse_contract(raw: &str) -> Result<String, ConfigError> {
    let body = raw
        .strip_prefix("0x")
        .ok_or_else(|| ConfigError::InvalidContract(raw.to_string()))?;
    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidContract(raw.to_string()));
    }
    Ok(raw.to_string())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid function selector {0:?}: {1}")]
    InvalidSelector(String, String),
    #[error("invalid contract address {0:?}: expected 0x followed by 40 hex chars")]
    InvalidContract(String),
}
