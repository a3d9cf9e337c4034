//! Off-chain record store adapter (document database REST API).
//!
//! Each parcel is one document at
//! `{base}/v1/projects/{project}/databases/(default)/documents/{collection}/{key}`.
//! Document fields arrive typed, e.g. `{"ipfsHash": {"stringValue": "Qm..."}}`.

use std::collections::HashMap;

use async_trait::async_trait;
use landreg_core::{ContentId, RecordKey};
use landreg_integrity::{RecordStore, RecordStoreError};
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::error::{truncate_body, ClientError};

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: HashMap<String, serde_json::Value>,
}

/// Settings for [`DocumentRecordStore`], split out of the client config.
#[derive(Clone)]
pub(crate) struct DocumentStoreSettings {
    pub base_url: Url,
    pub project: String,
    pub collection: String,
    pub content_id_field: String,
    pub api_key: Option<Zeroizing<String>>,
}

/// [`RecordStore`] backed by a document database's REST API.
#[derive(Clone)]
pub struct DocumentRecordStore {
    http: reqwest::Client,
    settings: DocumentStoreSettings,
}

impl std::fmt::Debug for DocumentRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRecordStore")
            .field("base_url", &self.settings.base_url)
            .field("project", &self.settings.project)
            .field("collection", &self.settings.collection)
            .field("content_id_field", &self.settings.content_id_field)
            .finish_non_exhaustive()
    }
}

impl DocumentRecordStore {
    pub(crate) fn new(http: reqwest::Client, settings: DocumentStoreSettings) -> Self {
        Self { http, settings }
    }

    fn document_url(&self, key: &RecordKey) -> Result<Url, RecordStoreError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RecordStoreError::Transport(format!(
                    "record store URL {} cannot be a base",
                    self.settings.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.settings.project.as_str(),
                "databases",
                "(default)",
                "documents",
                self.settings.collection.as_str(),
                key.as_str(),
            ]);
        if let Some(api_key) = &self.settings.api_key {
            url.query_pairs_mut().append_pair("key", api_key.as_str());
        }
        Ok(url)
    }

    async fn fetch_document(&self, key: &RecordKey, url: Url) -> Result<Option<Document>, ClientError> {
        let endpoint = format!("GET documents/{}/{key}", self.settings.collection);
        let resp = crate::retry::retry_send(&endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e.without_url(),
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                endpoint,
                status,
                body: truncate_body(body),
            });
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| ClientError::Deserialization {
                endpoint,
                source: e.without_url(),
            })
    }
}

/// Pull a string out of a typed document field.
fn string_field(doc: &Document, field: &str) -> Result<String, RecordStoreError> {
    let value = doc
        .fields
        .get(field)
        .ok_or_else(|| RecordStoreError::Malformed(format!("document has no {field:?} field")))?;
    value
        .get("stringValue")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RecordStoreError::Malformed(format!("field {field:?} is not a string")))
}

#[async_trait]
impl RecordStore for DocumentRecordStore {
    async fn declared_content_id(&self, key: &RecordKey) -> Result<ContentId, RecordStoreError> {
        let url = self.document_url(key)?;
        let doc = self.fetch_document(key, url).await.map_err(|e| match e {
            ClientError::Deserialization { .. } => RecordStoreError::Malformed(e.to_string()),
            _ => RecordStoreError::Transport(e.to_string()),
        })?;
        let doc = doc.ok_or_else(|| RecordStoreError::NotFound(key.clone()))?;
        let cid = string_field(&doc, &self.settings.content_id_field)?;
        tracing::debug!(record_key = %key, content_id = %cid, "off-chain record read");
        Ok(ContentId::from(cid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(api_key: Option<&str>) -> DocumentRecordStore {
        DocumentRecordStore::new(
            reqwest::Client::new(),
            DocumentStoreSettings {
                base_url: Url::parse("https://firestore.example.com").unwrap(),
                project: "registry-prod".into(),
                collection: "properties".into(),
                content_id_field: "ipfsHash".into(),
                api_key: api_key.map(|k| Zeroizing::new(k.to_string())),
            },
        )
    }

    #[test]
    fn document_url_layout() {
        let url = store(None).document_url(&RecordKey::new("LHR-042").unwrap()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.example.com/v1/projects/registry-prod/databases/(default)/documents/properties/LHR-042"
        );
    }

    #[test]
    fn api_key_goes_in_query() {
        let url = store(Some("k123")).document_url(&RecordKey::new("p1").unwrap()).unwrap();
        assert_eq!(url.query(), Some("key=k123"));
    }

    #[test]
    fn debug_omits_api_key() {
        let dbg = format!("{:?}", store(Some("k123")));
        assert!(!dbg.contains("k123"));
    }

    #[test]
    fn string_field_extraction() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "fields": {
                "ipfsHash": {"stringValue": "QmX"},
                "area": {"integerValue": "120"}
            }
        }))
        .unwrap();
        assert_eq!(string_field(&doc, "ipfsHash").unwrap(), "QmX");
        assert!(matches!(string_field(&doc, "area"), Err(RecordStoreError::Malformed(_))));
        assert!(matches!(string_field(&doc, "owner"), Err(RecordStoreError::Malformed(_))));
    }
}
