use std::future::Future;

use crate::error::AppError;
use crate::models::{RegionFigure, SummaryFigures};

/// Fetches a document body from a URL.
///
/// A non-success status must surface as [`AppError::HttpStatus`] so callers
/// can tell a rejected request from a transport failure.
pub trait Fetcher: Send + Sync + Clone {
    /// GET `url`, attaching `Authorization: Bearer <token>` when `bearer` is set.
    fn fetch(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Extracts box-office figures from a title page.
///
/// Implementations never fail: unreadable markup yields empty results.
pub trait PageParser: Send + Sync + Clone {
    /// Per-region opening/gross rows, in page order.
    fn parse_regions(&self, html: &str) -> Vec<RegionFigure>;

    /// Domestic/international/worldwide totals from the summary panel.
    fn extract_summary(&self, html: &str) -> SummaryFigures;
}
