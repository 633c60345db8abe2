//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{RegionFigure, SummaryFigures};
use crate::traits::{Fetcher, PageParser};

pub fn test_api_config() -> ApiConfig {
    ApiConfig::new("https://api.example.com/3", "test-token").unwrap()
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// A request seen by [`MockFetcher`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub bearer: Option<String>,
}

/// Mock fetcher that replays a scripted queue of responses.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns an HTTP 404.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockFetcher {
    pub fn new(body: &str) -> Self {
        Self::with_responses(vec![Ok(body.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, bearer: Option<&str>) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            bearer: bearer.map(str::to_string),
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(AppError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockParser
// ---------------------------------------------------------------------------

/// Mock parser that returns fixed figures for any page it is given.
#[derive(Clone, Default)]
pub struct MockParser {
    regions: Arc<Mutex<Vec<RegionFigure>>>,
    summary: Arc<Mutex<SummaryFigures>>,
    parsed: Arc<Mutex<Vec<String>>>,
}

impl MockParser {
    pub fn new(regions: Vec<RegionFigure>, summary: SummaryFigures) -> Self {
        Self {
            regions: Arc::new(Mutex::new(regions)),
            summary: Arc::new(Mutex::new(summary)),
            parsed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Documents handed to `parse_regions`, in call order.
    pub fn parsed(&self) -> Vec<String> {
        self.parsed.lock().unwrap().clone()
    }
}

impl PageParser for MockParser {
    fn parse_regions(&self, html: &str) -> Vec<RegionFigure> {
        self.parsed.lock().unwrap().push(html.to_string());
        self.regions.lock().unwrap().clone()
    }

    fn extract_summary(&self, _html: &str) -> SummaryFigures {
        *self.summary.lock().unwrap()
    }
}

pub fn region(name: &str, opening: i64, gross: i64) -> RegionFigure {
    RegionFigure {
        region: name.to_string(),
        opening,
        gross,
    }
}
