use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::table::Table;
use crate::traits::Fetcher;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Deserialize)]
struct DiscoverPage {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Pages through the popularity-ranked listing and collects raw records.
pub struct DiscoveryService<F: Fetcher> {
    fetcher: F,
    retry_delay: Duration,
}

impl<F: Fetcher> DiscoveryService<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the fixed sleep between attempts for the same page.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Fetch pages `1..=page_count` and concatenate their `results`.
    ///
    /// Each page gets up to `max_retries` attempts. If any page runs out of
    /// attempts the whole call fails with [`AppError::PageFetchExhausted`]
    /// and no partial results are returned.
    pub async fn fetch_pages(
        &self,
        config: &ApiConfig,
        page_count: u32,
        max_retries: u32,
    ) -> Result<Vec<Map<String, Value>>, AppError> {
        if page_count == 0 {
            return Err(AppError::Config("page count must be at least 1".into()));
        }
        if max_retries == 0 {
            return Err(AppError::Config("max retries must be at least 1".into()));
        }

        let mut entries = Vec::new();
        for page in 1..=page_count {
            let body = self.fetch_page(config, page, max_retries).await?;
            let parsed: DiscoverPage = serde_json::from_str(&body).map_err(|e| {
                AppError::ParseFailure(format!("Invalid listing JSON for page {page}: {e}"))
            })?;

            let results = parsed.results.unwrap_or_default();
            let before = entries.len();
            entries.extend(results.into_iter().filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            }));
            tracing::info!(page, records = entries.len() - before, "Fetched listing page");
        }

        Ok(entries)
    }

    async fn fetch_page(
        &self,
        config: &ApiConfig,
        page: u32,
        max_retries: u32,
    ) -> Result<String, AppError> {
        let url = config.discover_url(page);

        for attempt in 1..=max_retries {
            match self.fetcher.fetch(&url, Some(&config.access_token)).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::debug!(page, attempt, max_retries, error = %e, "Listing page attempt failed");
                    if attempt < max_retries && !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        tracing::warn!(page, attempts = max_retries, "Listing page retries exhausted");
        Err(AppError::PageFetchExhausted {
            page,
            attempts: max_retries,
        })
    }

    /// Run discovery and write the resulting table to `path`.
    ///
    /// Nothing is written when discovery fails.
    pub async fn save_to_csv(
        &self,
        config: &ApiConfig,
        page_count: u32,
        max_retries: u32,
        path: &Path,
    ) -> Result<Table, AppError> {
        let records = self.fetch_pages(config, page_count, max_retries).await?;
        let table = Table::from_records(&records);
        table.write_csv(path)?;
        tracing::info!(path = %path.display(), rows = table.len(), "Discovery data saved");
        Ok(table)
    }
}
