pub mod browser;
pub mod cleaner;
pub mod parsers;

use crate::config::FetcherConfig;
use crate::models::{DrawRecord, RawDrawRow};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use url::Url;

use self::browser::{BrowserSession, FetchError};

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable draw-history source abstraction.
#[async_trait]
pub trait DrawHistorySource {
    async fn scrape_history(&mut self, cutoff: NaiveDate) -> Result<ScrapeOutcome>;
}

// ── Outcome types ─────────────────────────────────────────────────────────────

/// Why the page walk ended. Every variant flows into the same finalize step;
/// none of them aborts the run without persisting what was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A row older than the cutoff was seen; the walk stops there.
    CutoffReached,
    /// A page had no rows, or rows but nothing valid.
    NoData,
    /// Last page: no link to the next one.
    EndOfPages,
    /// The site served a challenge page; the session is burned.
    Blocked,
    /// Navigation failed (retries exhausted or a hard error).
    FetchFailed,
}

#[derive(Debug)]
pub struct ScrapeOutcome {
    pub records: Vec<DrawRecord>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// Per-page extraction result. `cutoff_hit` is the explicit stop signal
/// raised from row level, carried as a value so the termination path stays
/// visible in the page loop.
#[derive(Debug)]
pub struct PageExtract {
    pub records: Vec<DrawRecord>,
    pub cutoff_hit: bool,
}

// ── usamega scraper ───────────────────────────────────────────────────────────

pub struct UsamegaScraper {
    session: BrowserSession,
    base_url: String,
    max_pages: u32,
}

impl UsamegaScraper {
    /// Launch the browser session this scraper will own for the whole run.
    pub async fn new(config: &FetcherConfig) -> Result<Self> {
        Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base_url {:?}", config.base_url))?;

        let session = BrowserSession::launch(config)
            .await
            .context("Failed to launch browser session")?;

        Ok(Self {
            session,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_pages: config.max_pages,
        })
    }

    /// URL for a 1-based results page.
    fn results_url(&self, page: u32) -> String {
        format!("{}/{}", self.base_url, page)
    }

    /// Quit the browser. Called on every exit path, success or not.
    pub async fn close(self) {
        if let Err(e) = self.session.quit().await {
            warn!("Failed to quit browser session: {}", e);
        }
    }
}

#[async_trait]
impl DrawHistorySource for UsamegaScraper {
    /// Walk result pages from page 1 until a terminal condition.
    ///
    /// Fetch errors and block pages end the walk but are not bubbled up as
    /// errors: whatever was accumulated before them is still returned for
    /// serialization.
    async fn scrape_history(&mut self, cutoff: NaiveDate) -> Result<ScrapeOutcome> {
        let mut records: Vec<DrawRecord> = Vec::new();
        let mut pages_fetched = 0u32;
        let mut page = 1u32;

        let stop = loop {
            let url = self.results_url(page);
            info!("Fetching results page {} ({})", page, url);

            let html = match self.session.fetch_page(&url).await {
                Ok(html) => html,
                Err(FetchError::Blocked) => {
                    warn!("Block page detected, stopping the session");
                    break StopReason::Blocked;
                }
                Err(FetchError::Timeout) => {
                    warn!("Could not load page {} after retries, stopping", page);
                    break StopReason::FetchFailed;
                }
                Err(FetchError::Navigation(e)) => {
                    warn!("Navigation error on page {}: {}", page, e);
                    break StopReason::FetchFailed;
                }
            };
            pages_fetched += 1;

            let rows = parsers::parse_results_page(&html)?;
            if rows.is_empty() {
                info!("No rows found on page {}, stopping pagination", page);
                break StopReason::NoData;
            }

            let extract = extract_page(rows, cutoff);
            let found = extract.records.len();
            records.extend(extract.records);

            if extract.cutoff_hit {
                info!("Encountered a draw older than the cutoff, stopping");
                break StopReason::CutoffReached;
            }
            if found == 0 {
                info!("No valid draws found on page {}, stopping", page);
                break StopReason::NoData;
            }
            debug!("Page {}: {} draws", page, found);

            if !parsers::has_next_page(&html, page) {
                info!("No next-page link found, finishing");
                break StopReason::EndOfPages;
            }

            page += 1;
            if self.max_pages > 0 && page > self.max_pages {
                warn!("Reached page cap ({}), stopping", self.max_pages);
                break StopReason::EndOfPages;
            }

            self.session.page_delay().await;
        };

        info!("Collected {} draws over {} pages", records.len(), pages_fetched);
        Ok(ScrapeOutcome {
            records,
            pages_fetched,
            stop,
        })
    }
}

// ── Row extraction ────────────────────────────────────────────────────────────

/// Turn one page's raw rows into validated records.
///
/// Malformed rows (bad date shape, short number list) are skipped. A row
/// dated strictly before the cutoff stops the whole extraction: that row is
/// discarded and `cutoff_hit` is set, keeping everything collected so far.
/// The cutoff check runs before number validation, so even a malformed
/// too-old row halts the walk.
pub fn extract_page(rows: Vec<RawDrawRow>, cutoff: NaiveDate) -> PageExtract {
    let mut records = Vec::new();

    for raw in rows {
        let Some(date_text) = raw.date_text.as_deref() else {
            continue;
        };
        let Some(draw_date) = cleaner::parse_draw_date(date_text) else {
            debug!("Skipping row with unparsable date {:?}", date_text);
            continue;
        };

        if draw_date < cutoff {
            return PageExtract {
                records,
                cutoff_hit: true,
            };
        }

        if let Some(record) = cleaner::row_to_record(draw_date, &raw) {
            records.push(record);
        }
    }

    PageExtract {
        records,
        cutoff_hit: false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumberMarker, RawDrawRow, RawNumber};

    fn numbers(whites: &[&str], bonus: &str) -> Vec<RawNumber> {
        let mut out: Vec<RawNumber> = whites
            .iter()
            .map(|v| RawNumber {
                value: v.to_string(),
                marker: NumberMarker::White,
            })
            .collect();
        out.push(RawNumber {
            value: bonus.to_string(),
            marker: NumberMarker::Bonus,
        });
        out
    }

    fn row(date_text: &str, whites: &[&str], bonus: &str) -> RawDrawRow {
        RawDrawRow {
            date_text: Some(date_text.to_string()),
            numbers: numbers(whites, bonus),
            jackpot: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const WHITES: &[&str] = &["5", "12", "23", "34", "41"];

    #[test]
    fn rows_at_or_after_cutoff_are_kept() {
        let rows = vec![
            row("Wed, March, 19, 2025", WHITES, "7"),
            row("Mon, March, 17, 2025", WHITES, "3"),
        ];

        let extract = extract_page(rows, date(2020, 3, 20));
        assert!(!extract.cutoff_hit);
        assert_eq!(extract.records.len(), 2);
        assert_eq!(extract.records[0].draw_date, date(2025, 3, 19));
    }

    #[test]
    fn first_too_old_row_stops_extraction_and_is_discarded() {
        let rows = vec![
            row("Wed, March, 19, 2025", WHITES, "7"),
            row("Sat, January, 4, 2020", WHITES, "3"),
            row("Wed, January, 1, 2020", WHITES, "9"),
        ];

        let extract = extract_page(rows, date(2021, 1, 1));
        assert!(extract.cutoff_hit);
        assert_eq!(extract.records.len(), 1);
        assert_eq!(extract.records[0].draw_date, date(2025, 3, 19));
    }

    #[test]
    fn cutoff_fires_even_for_rows_with_bad_numbers() {
        // The old row has no valid number list, the stop still triggers.
        let rows = vec![RawDrawRow {
            date_text: Some("Wed, January, 1, 2020".to_string()),
            numbers: vec![],
            jackpot: None,
        }];

        let extract = extract_page(rows, date(2021, 1, 1));
        assert!(extract.cutoff_hit);
        assert!(extract.records.is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped_without_stopping() {
        let rows = vec![
            RawDrawRow::default(),
            row("not a date at all", WHITES, "7"),
            row("Wed, March, 19, 2025", &["1", "2"], "7"),
            row("Mon, March, 17, 2025", WHITES, "3"),
        ];

        let extract = extract_page(rows, date(2020, 1, 1));
        assert!(!extract.cutoff_hit);
        assert_eq!(extract.records.len(), 1);
        assert_eq!(extract.records[0].powerball, "3");
    }

    #[test]
    fn record_count_matches_rows_passing_all_shape_checks() {
        let rows = vec![
            row("Wed, March, 19, 2025", WHITES, "7"),
            row("Mon, March, 17, 2025", &["1", "2", "3", "4"], "3"), // short
            row("Sat, March, 15, 2025", WHITES, ""),                 // empty bonus
            row("Wed, March, 12, 2025", WHITES, "9"),
        ];

        let extract = extract_page(rows, date(2020, 1, 1));
        assert_eq!(extract.records.len(), 2);
    }
}
