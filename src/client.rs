//! Plist link client
//!
//! Turns a plist reachable over plain HTTP into a link served by a plist
//! proxy: download the document, upload it to the proxy, and join the
//! returned key onto the proxy base URL.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Proxy used when no base URL is configured
pub const DEFAULT_PLIST_PROXY: &str = "https://plistproxy.herokuapp.com/plist";

/// Result type for link generation
pub type LinkResult<T> = Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Failed to fetch plist: {0}")]
    Fetch(String),

    #[error("Failed to upload plist: {0}")]
    Upload(String),

    #[error("Invalid proxy reply: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct KeyReply {
    key: String,
}

pub struct PlistLinkClient {
    client: reqwest::Client,
    proxy_base: String,
}

impl PlistLinkClient {
    /// Create a client that uploads to `proxy_base`
    pub fn new(proxy_base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), proxy_base)
    }

    pub fn with_client(client: reqwest::Client, proxy_base: impl Into<String>) -> Self {
        let proxy_base = proxy_base.into().trim_end_matches('/').to_string();
        Self { client, proxy_base }
    }

    pub fn proxy_base(&self) -> &str {
        &self.proxy_base
    }

    /// Upload the plist at `source_url` and return its proxied link
    pub async fn generate_link(&self, source_url: &str) -> LinkResult<String> {
        let plist = self.fetch(source_url).await?;
        debug!("Fetched {} bytes from {}", plist.len(), source_url);

        let key = self.upload(plist).await?;
        let link = format!("{}/{}", self.proxy_base, key);

        info!("PlistURL: {}", link);
        Ok(link)
    }

    async fn fetch(&self, source_url: &str) -> LinkResult<bytes::Bytes> {
        let response = self
            .client
            .get(source_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LinkError::Fetch(e.to_string()))?;

        response
            .bytes()
            .await
            .map_err(|e| LinkError::Fetch(e.to_string()))
    }

    async fn upload(&self, plist: bytes::Bytes) -> LinkResult<String> {
        let response = self
            .client
            .post(&self.proxy_base)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(plist)
            .send()
            .await
            .map_err(|e| LinkError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LinkError::Upload(format!("proxy answered {status}: {detail}")));
        }

        let reply: KeyReply = response
            .json()
            .await
            .map_err(|e| LinkError::Decode(e.to_string()))?;

        Ok(reply.key)
    }
}

impl Default for PlistLinkClient {
    fn default() -> Self {
        Self::new(DEFAULT_PLIST_PROXY)
    }
}
