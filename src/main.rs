use clap::Parser;
use synoptiq::cli::Cli;
use synoptiq::{commands, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    tracing::debug!("synoptiq {} (built {})", synoptiq::VERSION, synoptiq::BUILD_DATE);

    commands::run(cli).await
}
