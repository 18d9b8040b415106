use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod core;
mod error;
mod extractors;
mod storage;
mod utils;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("Starting aniscrape v{}", env!("CARGO_PKG_VERSION"));

    cli.run()?;

    Ok(())
}
