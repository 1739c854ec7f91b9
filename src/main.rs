//! NarrativeIQ command-line client

use clap::Parser;
use narrativeiq::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::run(cli).await
}
