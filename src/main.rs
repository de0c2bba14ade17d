mod config;
mod models;
mod pipeline;
mod scraper;
mod storage;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(
    name = "powerball-scraper",
    about = "Scrape recent Powerball draw history into a CSV file",
    version
)]
struct Cli {
    /// Output CSV path (overrides configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "powerball_scraper=info,warn",
        1 => "powerball_scraper=debug,info",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .compact()
        .with_target(false)
        .init();

    let mut config = AppConfig::load()?;
    if let Some(output) = cli.output {
        config.output.csv_path = output;
    }

    let _t = utils::Timer::start("Powerball history scrape");
    let stats = Pipeline::new(config.clone()).run().await?;

    info!(
        "Total records scraped: {} across {} pages ({:?}). Saved to {:?}.",
        utils::fmt_number(stats.records_written as i64),
        stats.pages_fetched,
        stats.stop,
        config.output.csv_path
    );

    Ok(())
}
