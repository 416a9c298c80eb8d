#![allow(dead_code)]

//! Shared setup for end-to-end tests: a real relay server on an
//! ephemeral local port.

use plistproxy::api::{create_api_server, AppState};
use plistproxy::config::ServerConfig;
use plistproxy::store::BlobStore;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<BlobStore>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a relay server with the given config on 127.0.0.1:0
pub async fn spawn_server_with(mut config: ServerConfig) -> TestServer {
    config.listen_addr = "127.0.0.1:0".parse().unwrap();

    let state = AppState::from_config(&config).unwrap();
    let store = state.store.clone();
    let app = create_api_server(state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { addr, store }
}

pub async fn spawn_server() -> TestServer {
    spawn_server_with(ServerConfig::default()).await
}

/// A local address with nothing listening on it
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
