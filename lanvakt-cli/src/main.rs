//! ## lanvakt-cli
//! **Operator interface**
//! Watches a LAN interface for traffic an ordinary client should never see,
//! replays recorded traces through the same rules, and lists the rule table.

use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
