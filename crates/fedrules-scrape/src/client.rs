//! HTTP rule scraper.

use chrono::Utc;
use fedrules_core::{RuleDetailRecord, ScrapeRequest};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::{ScrapeConfig, ScrapeError, extract_rule};

/// Anything that can turn scrape requests into rule-detail records.
///
/// Implementations return exactly one record per request, in request order,
/// or fail the whole batch.
#[async_trait::async_trait]
pub trait RuleSource: Send + Sync {
    async fn fetch(
        &self,
        requests: &[ScrapeRequest],
    ) -> Result<Vec<RuleDetailRecord>, ScrapeError>;
}

/// Fetches GAO rule pages and extracts a [`RuleDetailRecord`] from each.
pub struct RuleScraper {
    client: reqwest::Client,
    config: ScrapeConfig,
}

impl RuleScraper {
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        if config.user_agent.trim().is_empty() {
            return Err(ScrapeError::Config("user agent must not be empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Scrape every request, keeping input order.
    ///
    /// Up to `concurrency` pages are fetched at once. The first request that
    /// still fails after its retries aborts the batch.
    pub async fn scrape_rules(
        &self,
        requests: &[ScrapeRequest],
    ) -> Result<Vec<RuleDetailRecord>, ScrapeError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = self.config.concurrency.max(1);
        info!(count = requests.len(), concurrency, "scraping rule pages");

        // Owned requests keep the buffered futures `Send` for `RuleSource`.
        let records: Vec<RuleDetailRecord> = stream::iter(requests.to_vec())
            .map(|req| async move { self.scrape_one(&req).await })
            .buffered(concurrency)
            .try_collect()
            .await?;

        info!(count = records.len(), "scraped rule pages");
        Ok(records)
    }

    async fn scrape_one(&self, req: &ScrapeRequest) -> Result<RuleDetailRecord, ScrapeError> {
        let html = self.get_with_retry(&req.url).await?;
        let scraped_at = Utc::now().to_rfc3339();
        let record = extract_rule(&req.url, &html, &scraped_at);
        debug!(
            url = %req.url,
            fields = record.fields.len(),
            "extracted rule detail"
        );
        Ok(record)
    }

    async fn get_with_retry(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 0;
        loop {
            match self.get(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.config.max_retries && e.is_transient() => {
                    let delay = self.config.backoff_for(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "retrying rule page"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url = %url, "fetching rule page");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Server {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait::async_trait]
impl RuleSource for RuleScraper {
    async fn fetch(
        &self,
        requests: &[ScrapeRequest],
    ) -> Result<Vec<RuleDetailRecord>, ScrapeError> {
        self.scrape_rules(requests).await
    }
}
