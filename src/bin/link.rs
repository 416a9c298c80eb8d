use anyhow::Context;
use clap::Parser;
use plistproxy::client::{PlistLinkClient, DEFAULT_PLIST_PROXY};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "plistproxy-link")]
#[command(about = "Upload a plist to a plist proxy and print its link")]
struct Args {
    /// http:// URL of the plist to publish
    source_url: String,

    /// Plist proxy endpoint accepting POST uploads
    #[arg(long, default_value = DEFAULT_PLIST_PROXY)]
    proxy: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = PlistLinkClient::new(args.proxy);

    let link = client
        .generate_link(&args.source_url)
        .await
        .with_context(|| format!("could not publish {}", args.source_url))?;

    println!("{link}");
    Ok(())
}
