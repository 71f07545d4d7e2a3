use anyhow::Result;
use clap::Parser;
use log::info;

use subtrack_cli::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file (truncated each run) so stdout stays clean for the
    // per-record progress output.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("subtrack-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting subtrack-cli");
    cli.run().await
}
