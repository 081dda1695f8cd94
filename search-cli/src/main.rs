//! Entry-point for the `scrollsearch` binary.
use clap::Parser;
use scrollsearch_cli::Cli;
use scrollsearch_cli::run_main;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli).await
}
