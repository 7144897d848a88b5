//! Sequential page fetching with a politeness delay.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::ScrapeError;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("arabic-vocab/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    pub fn new(delay: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ScrapeError::Client)?;
        Ok(Self { client, delay })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// GET `url` and return its body. Non-2xx answers are errors.
    pub async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(|source| ScrapeError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Wait out the delay between two requests.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
