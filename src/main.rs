use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod engines;
mod error;
mod loader;
mod preprocessing;
mod recognition;
mod server;

#[derive(Parser, Debug)]
#[command(name = "molecule-detector-server")]
#[command(about = "Chemical structure recognition server (image → SMILES via OSRA)")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "MOLECULE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "MOLECULE_PORT", default_value = "5000")]
    pub port: u16,

    /// Path or name of the OSRA executable
    #[arg(long, env = "OSRA_PATH", default_value = "osra")]
    pub osra_path: String,

    /// Hard limit for a single recognition run, in seconds
    #[arg(long, env = "MOLECULE_RECOGNITION_TIMEOUT", default_value = "30")]
    pub recognition_timeout: u64,

    /// Limit for the engine availability probe, in seconds
    #[arg(long, env = "MOLECULE_PROBE_TIMEOUT", default_value = "5")]
    pub probe_timeout: u64,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "MOLECULE_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting molecule-detector-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
