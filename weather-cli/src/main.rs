//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and installing the log subscriber
//! - Driving the interactive forecast UI in the terminal
//! - Interactive configuration and the small helper subcommands

use clap::Parser;

mod cli;
mod tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
