//! plistproxy: an HTTP relay plus a small content-addressed plist store.
//!
//! - [`relay`] forwards `GET /proxy/<target>` to `http://<target>`
//! - [`store`] keeps uploaded plist payloads under short digest keys
//! - [`api`] binds both to HTTP routes

pub mod api;
pub mod client;
pub mod config;
pub mod metrics;
pub mod relay;
pub mod store;

pub use config::ServerConfig;
