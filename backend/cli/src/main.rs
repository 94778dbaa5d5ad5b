mod data_url;
mod extract_cmd;
mod status_cmd;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use plateread_config::{load_config, log_report, redact, RelayConfig};
use plateread_gateway::{build_router, start_server, GatewayState};

#[derive(Parser)]
#[command(name = "plateread")]
#[command(about = "plateread: vehicle registration and VIN extraction relay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP relay
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running relay's health endpoint
    Status,
    /// Extract plates and VINs from a local image file
    Extract {
        /// Image file (jpg, png, webp, gif)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = load_config();
    plateread_logging::init_logger(
        &loaded.config.log_level,
        loaded.config.log_dir.as_deref().map(Path::new),
    );

    let cli = Cli::parse();
    let valid = log_report(&loaded);
    let config = loaded.config;

    match cli.command {
        Commands::Serve { port } => {
            if !valid {
                bail!("Refusing to start with an invalid configuration");
            }
            let config = RelayConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => status_cmd::run(config.port).await?,
        Commands::Extract { file } => extract_cmd::run(&config, &file).await?,
    }

    Ok(())
}

async fn run_server(config: RelayConfig) -> Result<()> {
    info!(config = %redact(&config), "Starting plateread relay");

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr()))?;

    let state = GatewayState::from_config(&config)?;
    let app = build_router(state, &config);
    start_server(addr, app).await
}
