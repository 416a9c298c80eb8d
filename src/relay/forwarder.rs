//! Outbound relay forwarder
//!
//! One call is one GET against `http://<target>`. Anything that stops a
//! well-formed HTTP response from arriving is a transport failure; an
//! error status from the target is a normal relay.

use crate::metrics::recorder::ProxyTimer;
use crate::relay::types::{RelayConfig, RelayError, RelayResponse, RelayResult};
use tracing::{info, warn};

/// Scheme prepended to every target
const TARGET_SCHEME: &str = "http://";

pub struct RelayForwarder {
    client: reqwest::Client,
    config: RelayConfig,
}

impl RelayForwarder {
    /// Create a forwarder with its own HTTP client
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RelayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a forwarder around an existing client
    pub fn with_client(client: reqwest::Client, config: RelayConfig) -> Self {
        Self { client, config }
    }

    /// Build the outbound URL for a target
    pub fn target_url(target: &str) -> String {
        format!("{TARGET_SCHEME}{target}")
    }

    /// Fetch `http://<target>` and return the response to relay
    pub async fn forward(&self, target: &str) -> RelayResult<RelayResponse> {
        if target.is_empty() {
            return Err(RelayError::InvalidTarget("empty target URL".to_string()));
        }

        let url = Self::target_url(target);
        info!("PROXY {}", url);

        let timer = ProxyTimer::start();
        let result = match self.config.timeout {
            Some(deadline) => match tokio::time::timeout(deadline, self.fetch(&url)).await {
                Ok(result) => result,
                Err(_) => Err(RelayError::Transport(format!(
                    "request to {url} timed out after {deadline:?}"
                ))),
            },
            None => self.fetch(&url).await,
        };

        match &result {
            Ok(response) => timer.relayed(response.status.as_u16(), response.body.len()),
            Err(e) => {
                warn!("Relay to {} failed: {}", url, e);
                timer.failed();
            }
        }

        result
    }

    async fn fetch(&self, url: &str) -> RelayResult<RelayResponse> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RelayResponse::from_upstream(status, &headers, body))
    }
}
