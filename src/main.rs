//! `petit` binary: parse flags, install logging, serve.
//!
//! Run with:
//!   RUST_LOG=petit=debug cargo run -- --directory /tmp/blobs
//!
//! Try:
//!   curl -v http://localhost:4221/echo/hello
//!   curl -v http://localhost:4221/user-agent
//!   curl -v --data-binary @Cargo.toml http://localhost:4221/files/Cargo.toml
//!   curl -v http://localhost:4221/files/Cargo.toml

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petit::{Config, Context, Server};

#[derive(Debug, Parser)]
#[command(name = "petit", version)]
#[command(about = "A tiny one-request-per-connection HTTP/1.1 server", long_about = None)]
struct Cli {
    /// Root directory for `/files/` blobs. File routes are disabled without it.
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:4221")]
    listen: SocketAddr,

    /// Seconds allowed for reading a request, and again for writing the response.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Largest request body accepted, in bytes.
    #[arg(long, default_value_t = default_max_body_bytes())]
    max_body_bytes: usize,
}

fn default_max_body_bytes() -> usize {
    Config::default().max_body_bytes
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            listen: cli.listen,
            directory: cli.directory,
            io_timeout: Duration::from_secs(cli.timeout_secs),
            max_body_bytes: cli.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(Cli::parse());
    tracing::info!(
        listen = %config.listen,
        io_timeout_secs = config.io_timeout.as_secs(),
        max_body_bytes = config.max_body_bytes,
        "configuration loaded",
    );

    Server::new(Context::new(config)).serve().await?;
    Ok(())
}
