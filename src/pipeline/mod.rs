//! Pipeline orchestrator: ties scraper → storage together.
//!
//! One run walks the results pages from page 1 until a terminal condition
//! (cutoff reached, no data, last page, block page, fetch failure), then
//! finalizes: the browser session is quit and whatever was accumulated —
//! possibly nothing — is serialized to CSV. Every terminal path goes through
//! the same finalize step, and the browser is released before any error is
//! allowed to propagate out of `run()`.

use crate::config::AppConfig;
use crate::scraper::{DrawHistorySource, StopReason, UsamegaScraper};
use crate::storage;
use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeDelta, Utc};
use tracing::info;

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<PipelineStats> {
        let cutoff = cutoff_date(self.config.fetcher.lookback_days);
        info!("Collecting draws back to {}", cutoff);

        let mut scraper = UsamegaScraper::new(&self.config.fetcher)
            .await
            .context("Failed to build scraper")?;

        let result = scraper.scrape_history(cutoff).await;
        scraper.close().await;
        let outcome = result?;

        let records_written = storage::write_csv(&self.config.output.csv_path, &outcome.records)
            .with_context(|| format!("Failed to write {:?}", self.config.output.csv_path))?;

        info!(
            "=== Done: {} pages | {} records | stop: {:?} ===",
            outcome.pages_fetched, records_written, outcome.stop
        );

        Ok(PipelineStats {
            pages_fetched: outcome.pages_fetched,
            records_written,
            stop: outcome.stop,
        })
    }
}

/// Earliest draw date kept, counting back from today in whole days. Uses the
/// 365-day-per-year approximation, so leap days shift it slightly.
pub fn cutoff_date(lookback_days: i64) -> NaiveDate {
    Utc::now().date_naive() - TimeDelta::days(lookback_days)
}

#[derive(Debug)]
pub struct PipelineStats {
    pub pages_fetched: u32,
    pub records_written: usize,
    pub stop: StopReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_strictly_in_the_past() {
        let today = Utc::now().date_naive();
        let cutoff = cutoff_date(5 * 365);
        assert!(cutoff < today);
        assert_eq!((today - cutoff).num_days(), 1825);
    }
}
