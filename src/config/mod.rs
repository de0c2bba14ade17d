use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Page fetcher configuration.
///
/// The randomized knobs (window size, user agent, pauses) are applied once
/// per browser session, not per page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WebDriver endpoint (chromedriver).
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// A single page load must finish within this bound.
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Total navigation attempts per page (first try included).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between timed-out attempts.
    #[serde(default = "default_retry_pause_secs")]
    pub retry_pause_secs: u64,

    /// Uniform pause after a load before reading page source.
    #[serde(default = "default_settle_delay_min_secs")]
    pub settle_delay_min_secs: u64,
    #[serde(default = "default_settle_delay_max_secs")]
    pub settle_delay_max_secs: u64,

    /// Uniform pause between consecutive result pages.
    #[serde(default = "default_page_delay_min_secs")]
    pub page_delay_min_secs: u64,
    #[serde(default = "default_page_delay_max_secs")]
    pub page_delay_max_secs: u64,

    /// Browser window is sized randomly within these bounds.
    #[serde(default = "default_window_width_min")]
    pub window_width_min: u32,
    #[serde(default = "default_window_width_max")]
    pub window_width_max: u32,
    #[serde(default = "default_window_height_min")]
    pub window_height_min: u32,
    #[serde(default = "default_window_height_max")]
    pub window_height_max: u32,

    /// Pool the session user agent is drawn from.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// Draws older than now minus this many days are excluded.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// Safety cap on the page walk; 0 means unlimited.
    #[serde(default)]
    pub max_pages: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://www.usamega.com/powerball/results".to_string()
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}
fn default_page_load_timeout_secs() -> u64 {
    300
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_pause_secs() -> u64 {
    3
}
fn default_settle_delay_min_secs() -> u64 {
    2
}
fn default_settle_delay_max_secs() -> u64 {
    5
}
fn default_page_delay_min_secs() -> u64 {
    2
}
fn default_page_delay_max_secs() -> u64 {
    6
}
fn default_window_width_min() -> u32 {
    1000
}
fn default_window_width_max() -> u32 {
    1600
}
fn default_window_height_min() -> u32 {
    700
}
fn default_window_height_max() -> u32 {
    900
}
fn default_user_agents() -> Vec<String> {
    vec![
        // Chrome on Windows
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/114.0.5735.110 Safari/537.36"
            .to_string(),
        // Safari on Mac
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_3) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/16.0 Safari/605.1.15"
            .to_string(),
        // Firefox on Linux
        "Mozilla/5.0 (X11; Linux x86_64; rv:102.0) Gecko/20100101 Firefox/102.0".to_string(),
        // Edge on Windows
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/114.0.5735.110 Safari/537.36 Edg/114.0.0.0"
            .to_string(),
    ]
}
fn default_lookback_days() -> i64 {
    5 * 365
}
fn default_csv_path() -> PathBuf {
    PathBuf::from("powerball_results.csv")
}
fn default_true() -> bool {
    true
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("POWERBALL").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            output: OutputConfig {
                csv_path: default_csv_path(),
            },
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            page_load_timeout_secs: default_page_load_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_pause_secs: default_retry_pause_secs(),
            settle_delay_min_secs: default_settle_delay_min_secs(),
            settle_delay_max_secs: default_settle_delay_max_secs(),
            page_delay_min_secs: default_page_delay_min_secs(),
            page_delay_max_secs: default_page_delay_max_secs(),
            window_width_min: default_window_width_min(),
            window_width_max: default_window_width_max(),
            window_height_min: default_window_height_min(),
            window_height_max: default_window_height_max(),
            user_agents: default_user_agents(),
            lookback_days: default_lookback_days(),
            max_pages: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.fetcher.page_load_timeout_secs, 300);
        assert_eq!(cfg.fetcher.max_attempts, 3);
        assert_eq!(cfg.fetcher.retry_pause_secs, 3);
        assert_eq!(cfg.fetcher.lookback_days, 1825);
        assert_eq!(cfg.fetcher.user_agents.len(), 4);
        assert_eq!(cfg.output.csv_path, PathBuf::from("powerball_results.csv"));
    }

    #[test]
    fn delay_ranges_are_ordered() {
        let cfg = FetcherConfig::default();
        assert!(cfg.settle_delay_min_secs <= cfg.settle_delay_max_secs);
        assert!(cfg.page_delay_min_secs <= cfg.page_delay_max_secs);
        assert!(cfg.window_width_min <= cfg.window_width_max);
        assert!(cfg.window_height_min <= cfg.window_height_max);
    }
}
