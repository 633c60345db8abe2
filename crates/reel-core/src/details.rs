use std::path::Path;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{DETAIL_COLUMNS, MovieDetails};
use crate::table::Table;
use crate::traits::Fetcher;

/// Outcome counts for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub total: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// Adds per-movie detail columns to a discovery table.
pub struct DetailService<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> DetailService<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch and decode the detail document for one movie. Not retried.
    pub async fn fetch_details(
        &self,
        config: &ApiConfig,
        id: u64,
    ) -> Result<MovieDetails, AppError> {
        let url = config.detail_url(id);
        let body = self
            .fetcher
            .fetch(&url, Some(&config.access_token))
            .await
            .map_err(|e| match e {
                AppError::HttpStatus { status, .. } => AppError::DetailFetchFailed { id, status },
                other => other,
            })?;

        MovieDetails::from_json(&body).map_err(|e| {
            AppError::ParseFailure(format!("Invalid detail JSON for movie ID {id}: {e}"))
        })
    }

    /// Enrich every row of `table` in place.
    ///
    /// The ten detail columns are reset to the absent-marker before the loop,
    /// so a row whose fetch fails keeps them absent. Only a missing `id`
    /// column aborts the pass.
    pub async fn enrich(
        &self,
        config: &ApiConfig,
        table: &mut Table,
    ) -> Result<EnrichReport, AppError> {
        let id_col = table
            .column_index("id")
            .ok_or_else(|| AppError::MissingRequiredColumn("id".into()))?;

        let columns: Vec<usize> = DETAIL_COLUMNS
            .iter()
            .map(|name| table.reset_column(name))
            .collect();

        let mut report = EnrichReport {
            total: table.len(),
            ..EnrichReport::default()
        };

        for row in 0..table.len() {
            let raw_id = table.get(row, id_col).unwrap_or_default().to_string();
            let Some(id) = parse_id(&raw_id) else {
                tracing::warn!(row, movie_id = %raw_id, "Skipping row without a usable movie ID");
                report.failed += 1;
                continue;
            };

            match self.fetch_details(config, id).await {
                Ok(details) => {
                    for (col, value) in columns.iter().zip(details.cells()) {
                        table.set(row, *col, value);
                    }
                    report.enriched += 1;
                    tracing::debug!(movie_id = id, "Added details");
                }
                Err(e) => {
                    tracing::warn!(movie_id = id, error = %e, "Failed to fetch details");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            total = report.total,
            enriched = report.enriched,
            failed = report.failed,
            "Detail enrichment complete"
        );
        Ok(report)
    }

    /// Read `input`, enrich it, and write the result to `output`.
    pub async fn add_details_to_csv(
        &self,
        config: &ApiConfig,
        input: &Path,
        output: &Path,
    ) -> Result<EnrichReport, AppError> {
        let mut table = Table::read_csv(input)?;
        let report = self.enrich(config, &mut table).await?;
        table.write_csv(output)?;
        tracing::info!(path = %output.display(), "Updated data saved");
        Ok(report)
    }
}

/// Movie IDs come back from CSV as `"550"`, or `"550.0"` when a numeric
/// column was written as floats.
fn parse_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }
    let float: f64 = raw.parse().ok()?;
    (float.fract() == 0.0 && float >= 0.0 && float <= u64::MAX as f64).then_some(float as u64)
}
