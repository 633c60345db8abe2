use std::path::Path;

use crate::config::BoxOfficeConfig;
use crate::error::AppError;
use crate::models::{BoxOfficeFigures, RegionFigure};
use crate::table::Table;
use crate::traits::{Fetcher, PageParser};

pub const IMDB_ID_COLUMN: &str = "imdb_id";

/// Outcome counts for one box-office pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub total: usize,
    /// Rows that received at least one figure.
    pub updated: usize,
    /// Rows without an external ID.
    pub skipped: usize,
}

/// Scrapes box-office pages and folds their figures into table columns.
pub struct BoxOfficeService<F: Fetcher, P: PageParser> {
    fetcher: F,
    parser: P,
    config: BoxOfficeConfig,
}

impl<F: Fetcher, P: PageParser> BoxOfficeService<F, P> {
    pub fn new(fetcher: F, parser: P, config: BoxOfficeConfig) -> Self {
        Self {
            fetcher,
            parser,
            config,
        }
    }

    /// Fetch the title page. Failures are logged and yield `None`.
    pub async fn fetch_page(&self, imdb_id: &str) -> Option<String> {
        let url = self.config.title_url(imdb_id);
        match self.fetcher.fetch(&url, None).await {
            Ok(html) => Some(html),
            Err(e) => {
                let err = AppError::BoxOfficeFetchFailed {
                    imdb_id: imdb_id.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!(imdb_id, retryable = e.is_retryable(), "{err}");
                None
            }
        }
    }

    /// Region rows for one title, empty if the page could not be fetched.
    pub async fn crawl_title(&self, imdb_id: &str) -> Vec<RegionFigure> {
        match self.fetch_page(imdb_id).await {
            Some(html) => self.parser.parse_regions(&html),
            None => Vec::new(),
        }
    }

    /// Flat figures for one title.
    ///
    /// Region rows fold into `{region}_opening` / `{region}_gross` sums, then
    /// summary totals are set under `domestic`, `international`, `worldwide`.
    pub async fn aggregate(&self, imdb_id: &str) -> BoxOfficeFigures {
        let mut figures = BoxOfficeFigures::new();
        let Some(html) = self.fetch_page(imdb_id).await else {
            return figures;
        };

        for fig in self.parser.parse_regions(&html) {
            figures.add(&format!("{}_opening", fig.region), fig.opening);
            figures.add(&format!("{}_gross", fig.region), fig.gross);
        }
        for (key, amount) in self.parser.extract_summary(&html).entries() {
            figures.set(key, amount);
        }

        tracing::debug!(imdb_id, columns = figures.len(), "Aggregated box office figures");
        figures
    }

    /// Add box-office columns to `table` in place.
    ///
    /// Columns are created the first time any row produces them; rows that
    /// never produce a column keep the absent-marker there.
    pub async fn update(&self, table: &mut Table) -> Result<UpdateReport, AppError> {
        let id_col = table
            .column_index(IMDB_ID_COLUMN)
            .ok_or_else(|| AppError::MissingRequiredColumn(IMDB_ID_COLUMN.into()))?;

        let mut report = UpdateReport {
            total: table.len(),
            ..UpdateReport::default()
        };

        for row in 0..table.len() {
            let Some(imdb_id) = table.get(row, id_col).map(|s| s.trim().to_string()) else {
                tracing::warn!(row, "Skipping row without an IMDb ID");
                report.skipped += 1;
                continue;
            };
            if imdb_id.is_empty() {
                tracing::warn!(row, "Skipping row with a blank IMDb ID");
                report.skipped += 1;
                continue;
            }

            tracing::info!(imdb_id = %imdb_id, "Processing IMDb ID");
            let figures = self.aggregate(&imdb_id).await;
            if figures.is_empty() {
                continue;
            }

            for (key, amount) in figures.iter() {
                let col = table.ensure_column(key);
                table.set(row, col, Some(amount.to_string()));
            }
            report.updated += 1;
        }

        tracing::info!(
            total = report.total,
            updated = report.updated,
            skipped = report.skipped,
            "Box office update complete"
        );
        Ok(report)
    }

    /// Read `input`, add box-office columns, and write to `output`.
    ///
    /// `output` may be the same path as `input`.
    pub async fn update_table(&self, input: &Path, output: &Path) -> Result<UpdateReport, AppError> {
        let mut table = Table::read_csv(input)?;
        let report = self.update(&mut table).await?;
        table.write_csv(output)?;
        tracing::info!(path = %output.display(), "Updated data saved");
        Ok(report)
    }

    /// Write a single-row table of one title's figures to `path`.
    pub async fn aggregate_to_csv(&self, imdb_id: &str, path: &Path) -> Result<Table, AppError> {
        let figures = self.aggregate(imdb_id).await;

        let mut table = Table::new(vec![IMDB_ID_COLUMN.to_string()]);
        table.push_row(vec![Some(imdb_id.to_string())]);
        for (key, amount) in figures.iter() {
            let col = table.ensure_column(key);
            table.set(0, col, Some(amount.to_string()));
        }

        table.write_csv(path)?;
        tracing::info!(imdb_id, path = %path.display(), "Aggregated box office data saved");
        Ok(table)
    }
}
