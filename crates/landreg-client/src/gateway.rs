//! Content-addressed gateway adapter.
//!
//! `GET {gateway}/ipfs/{cid}` returning the exact response body. No retry
//! and no client-side timeout: a failed fetch is reported once and the
//! verifier's [`Abort`](landreg_integrity::Abort) bounds how long it may take.

use async_trait::async_trait;
use landreg_core::ContentId;
use landreg_integrity::{ContentError, ContentStore};
use url::Url;

use crate::error::truncate_body;

/// [`ContentStore`] backed by an HTTP gateway.
#[derive(Debug, Clone)]
pub struct GatewayContentStore {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayContentStore {
    pub(crate) fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn content_url(&self, id: &ContentId) -> Result<Url, ContentError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ContentError::Transport {
                content_id: id.clone(),
                message: format!("gateway URL {} cannot be a base", self.base_url),
            })?
            .pop_if_empty()
            .push("ipfs")
            .push(id.as_str());
        Ok(url)
    }

    fn map_send_error(id: &ContentId, e: reqwest::Error) -> ContentError {
        if e.is_timeout() {
            ContentError::Timeout {
                content_id: id.clone(),
                message: e.to_string(),
            }
        } else {
            ContentError::Transport {
                content_id: id.clone(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ContentStore for GatewayContentStore {
    async fn fetch_bytes(&self, id: &ContentId) -> Result<Vec<u8>, ContentError> {
        let url = self.content_url(id)?;
        tracing::debug!(content_id = %id, %url, "fetching content");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Self::map_send_error(id, e))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(id.clone()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentError::Status {
                content_id: id.clone(),
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Self::map_send_error(id, e))?;
        tracing::debug!(content_id = %id, len = bytes.len(), "content fetched");
        Ok(bytes.to_vec())
    }
}
