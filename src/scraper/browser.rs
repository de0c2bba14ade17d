use crate::config::FetcherConfig;
use rand::seq::IndexedRandom;
use rand::RngExt;
use std::time::Duration;
use thirtyfour::error::WebDriverError;
use thirtyfour::{DesiredCapabilities, WebDriver};
use thiserror::Error;
use tokio::time::sleep;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Signatures of anti-automation challenge pages. Seeing one means the site
/// has flagged the session, so the whole run stops, not just the page.
const BLOCK_MARKERS: &[&str] = &["cf-error-details", "Access Denied", "You have been blocked"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("page load timed out")]
    Timeout,

    #[error("challenge page served instead of results")]
    Blocked,

    #[error("navigation failed: {0}")]
    Navigation(#[from] WebDriverError),
}

/// One WebDriver session, held for the whole run.
pub struct BrowserSession {
    driver: WebDriver,
    config: FetcherConfig,
}

impl BrowserSession {
    /// Start a Chrome session with a randomized window size and a user agent
    /// drawn from the configured pool.
    pub async fn launch(config: &FetcherConfig) -> Result<Self, FetchError> {
        let (width, height, user_agent) = {
            let mut rng = rand::rng();
            (
                rng.random_range(config.window_width_min..=config.window_width_max),
                rng.random_range(config.window_height_min..=config.window_height_max),
                config.user_agents.choose(&mut rng).cloned(),
            )
        };

        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_chrome_arg("--headless=new")?;
        }
        caps.add_chrome_arg(&format!("--window-size={},{}", width, height))?;
        if let Some(ua) = user_agent {
            caps.add_chrome_arg(&format!("--user-agent={}", ua))?;
        }
        caps.add_chrome_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_chrome_arg("--no-sandbox")?;
        caps.add_chrome_arg("--disable-gpu")?;
        caps.add_chrome_arg("--disable-dev-shm-usage")?;

        debug!("Launching browser ({}x{})", width, height);
        let driver = WebDriver::new(&config.webdriver_url, caps).await?;
        driver
            .set_page_load_timeout(Duration::from_secs(config.page_load_timeout_secs))
            .await?;

        Ok(Self {
            driver,
            config: config.clone(),
        })
    }

    /// Load one page and return its rendered source.
    ///
    /// Timeouts are retried up to the configured attempt limit with a fixed
    /// pause in between; any other navigation error aborts immediately. After
    /// a successful load the session idles briefly before reading content,
    /// then checks the source for block markers.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let pauses = FixedInterval::from_millis(self.config.retry_pause_secs * 1000)
            .take(self.config.max_attempts.saturating_sub(1) as usize);

        RetryIf::spawn(
            pauses,
            || self.navigate(url),
            |e: &FetchError| matches!(e, FetchError::Timeout),
        )
        .await?;

        self.settle_delay().await;

        let html = self.driver.source().await?;
        if is_blocked(&html) {
            return Err(FetchError::Blocked);
        }
        Ok(html)
    }

    async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        debug!("GET {}", url);
        let bound = Duration::from_secs(self.config.page_load_timeout_secs);

        match tokio::time::timeout(bound, self.driver.goto(url)).await {
            Err(_) => {
                warn!("Timeout loading {}, retrying", url);
                Err(FetchError::Timeout)
            }
            Ok(Err(WebDriverError::Timeout(_))) => {
                warn!("Timeout loading {}, retrying", url);
                Err(FetchError::Timeout)
            }
            Ok(Err(e)) => Err(FetchError::Navigation(e)),
            Ok(Ok(())) => Ok(()),
        }
    }

    /// Idle between load and read so request timing doesn't look scripted.
    async fn settle_delay(&self) {
        let secs = {
            let mut rng = rand::rng();
            rng.random_range(
                self.config.settle_delay_min_secs as f64..=self.config.settle_delay_max_secs as f64,
            )
        };
        sleep(Duration::from_secs_f64(secs)).await;
    }

    /// Idle before moving on to the next results page.
    pub async fn page_delay(&self) {
        let secs = {
            let mut rng = rand::rng();
            rng.random_range(
                self.config.page_delay_min_secs as f64..=self.config.page_delay_max_secs as f64,
            )
        };
        sleep(Duration::from_secs_f64(secs)).await;
    }

    /// End the WebDriver session. Must run on every exit path.
    pub async fn quit(self) -> Result<(), FetchError> {
        self.driver.quit().await?;
        Ok(())
    }
}

pub fn is_blocked(html: &str) -> bool {
    BLOCK_MARKERS.iter().any(|marker| html.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_markers_are_detected_anywhere_in_content() {
        assert!(is_blocked("<html><body>Access Denied</body></html>"));
        assert!(is_blocked("prefix cf-error-details suffix"));
        assert!(is_blocked("sorry, You have been blocked today"));
        assert!(!is_blocked("<html><table class=\"results pb\"></table></html>"));
    }
}
