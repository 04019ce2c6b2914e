//! SapScout CLI — SAP table-definition scraper with generated analysis.
//!
//! Fetches table pages from leanx.eu, extracts the field structure,
//! attaches a Gemini-generated technical summary, and writes JSON
//! documents for single tables or whole CSV batches.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
