use anyhow::Result;
use clap::Parser;

use killfeed_daemon::cli::DaemonCli;
use killfeed_daemon::logging;
use killfeed_daemon::orchestrator::{Orchestrator, resolve_config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();
    let config = resolve_config(&cli).await?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "killfeed-daemon starting");

    let mut orchestrator = Orchestrator::build_from_config(config)?;
    orchestrator.run().await?;

    tracing::info!("killfeed-daemon shut down");
    Ok(())
}
