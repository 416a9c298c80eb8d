use anyhow::Context;
use clap::Parser;
use plistproxy::api::{create_api_server, AppState};
use plistproxy::config::{ServerConfig, DEFAULT_PORT};
use plistproxy::metrics::install_metrics;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "plistproxy-server")]
#[command(about = "HTTP relay and plist store")]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Deadline for one outbound fetch, in seconds
    #[arg(long)]
    upstream_timeout: Option<u64>,

    /// Largest accepted plist upload, in bytes
    #[arg(long, default_value_t = plistproxy::store::MAX_PAYLOAD_BYTES)]
    max_payload: usize,

    /// Serve Prometheus metrics on /metrics
    #[arg(long)]
    metrics: bool,

    /// Allow cross-origin requests
    #[arg(long)]
    cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::with_addr(SocketAddr::new(self.host, self.port));
        config.relay.timeout = self.upstream_timeout.map(Duration::from_secs);
        config.store.max_payload_bytes = self.max_payload;
        config.metrics_enabled = self.metrics;
        config.cors = self.cors;
        config
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.into_config();

    if config.metrics_enabled {
        install_metrics().context("failed to install metrics recorder")?;
    }

    let state = AppState::from_config(&config).context("failed to create relay forwarder")?;
    let app = create_api_server(state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.listen_addr))?;

    info!("Listening on http://{}", listener.local_addr()?);
    info!("  GET  /proxy/<host/path>  relay to http://<host/path>");
    info!("  POST /plist              store a plist (max {} bytes)", config.store.max_payload_bytes);
    info!("  GET  /plist?key=<key>    fetch a stored plist");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
