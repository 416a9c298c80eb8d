//! Server configuration

use crate::relay::RelayConfig;
use crate::store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8200;

/// Everything needed to start the relay server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on
    pub listen_addr: SocketAddr,

    /// Outbound relay settings
    pub relay: RelayConfig,

    /// Payload store settings
    pub store: StoreConfig,

    /// Serve `/metrics`
    pub metrics_enabled: bool,

    /// Allow cross-origin requests
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            relay: RelayConfig::default(),
            store: StoreConfig::default(),
            metrics_enabled: false,
            cors: false,
        }
    }
}

impl ServerConfig {
    /// Create a config listening on a custom address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}
