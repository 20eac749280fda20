//! purl-resolver binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use purl_resolver::{
    config::Config,
    server::{Server, shutdown_signal},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Service for resolving pURL identifiers to an OCI artifact.
///
/// pURL Resolver resolves Package URL (pURL) identifiers to OCI artifact references.
#[derive(Parser, Debug)]
#[command(name = "purl-resolver")]
#[command(version, about)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "PURL_RESOLVER_CONFIG",
        default_value = "purl-resolver.toml"
    )]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP web server that provides the pURL resolver API endpoints.
    Serve {
        /// Port to run the HTTP server on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to listen on
        #[arg(long)]
        host: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config))?;

    match args.command {
        Command::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            tracing::info!("purl-resolver v{}", env!("CARGO_PKG_VERSION"));
            Server::new(config.server)
                .run(shutdown_signal())
                .await
                .context("server failed")?;
        }
    }

    Ok(())
}
