//! Binary crate for the `meteomap` terminal tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive map-and-chart surface
//! - Human-friendly one-shot output

use clap::Parser;

mod app;
mod cli;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
