use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use guest_config::GuestConfig;
use guest_server::{AppState, app, serve};

/// Guest list sync endpoint.
#[derive(Debug, Parser)]
#[command(name = "guest-list-server", version, about = "Wedding guest list sync endpoint")]
struct Cli {
    /// Config file (defaults to ./wedding.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("guest-list-server error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => {
            let _ = dotenvy::dotenv();
            GuestConfig::load_from(path)
        }
        None => GuestConfig::load_with_dotenv(),
    }
    .context("failed to load configuration")?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.warn_missing();

    let state = AppState::from_config(&config).context("failed to build S3 client")?;
    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "guest list server listening");

    serve(listener, app(state)).await.context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("WEDDING_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from(["guest-list-server", "--port", "9000", "-v"]).unwrap();
        assert_eq!(cli.port, Some(9000));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }
}
