//! Binary crate for the `weatherbot` interactive weather client.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and resolving the API key
//! - The interactive command loop and its notification log
//! - Human-friendly console output

use clap::Parser;
use weatherbot_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = Cli::parse();
    cmd.run().await
}
