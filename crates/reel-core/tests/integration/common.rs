use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reel_core::error::AppError;
use reel_core::models::{RegionFigure, SummaryFigures};
use reel_core::traits::{Fetcher, PageParser};
use reel_core::util::{clean_currency, clean_region_name};

/// Fetcher that answers by URL substring, each route replaying its own queue.
///
/// Unrouted URLs and drained routes get an HTTP 404.
#[derive(Clone, Default)]
pub struct RoutedFetcher {
    routes: Arc<Mutex<Vec<(String, VecDeque<Result<String, AppError>>)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RoutedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern` with `responses`, in order.
    pub fn route(self, pattern: &str, responses: Vec<Result<String, AppError>>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((pattern.to_string(), responses.into()));
        self
    }

    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(pattern))
            .count()
    }
}

impl Fetcher for RoutedFetcher {
    async fn fetch(&self, url: &str, _bearer: Option<&str>) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());

        let mut routes = self.routes.lock().unwrap();
        routes
            .iter_mut()
            .find(|(p, _)| url.contains(p.as_str()))
            .and_then(|(_, queue)| queue.pop_front())
            .unwrap_or_else(|| {
                Err(AppError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                })
            })
    }
}

/// Parser for a plain-text page format used by these tests:
/// `region|opening|gross` lines, plus `summary|domestic|international|worldwide`.
#[derive(Clone, Default)]
pub struct LineParser;

impl PageParser for LineParser {
    fn parse_regions(&self, html: &str) -> Vec<RegionFigure> {
        html.lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.trim().split('|').collect();
                (parts.len() == 3 && parts[0] != "summary").then(|| RegionFigure {
                    region: clean_region_name(parts[0]),
                    opening: clean_currency(Some(parts[1])),
                    gross: clean_currency(Some(parts[2])),
                })
            })
            .collect()
    }

    fn extract_summary(&self, html: &str) -> SummaryFigures {
        html.lines()
            .map(|line| line.trim().split('|').collect::<Vec<_>>())
            .find(|parts| parts.len() == 4 && parts[0] == "summary")
            .map(|parts| SummaryFigures {
                domestic: Some(clean_currency(Some(parts[1]))),
                international: Some(clean_currency(Some(parts[2]))),
                worldwide: Some(clean_currency(Some(parts[3]))),
            })
            .unwrap_or_default()
    }
}

pub fn api_config() -> reel_core::ApiConfig {
    reel_core::ApiConfig::new("https://api.example.com/3", "integration-token").unwrap()
}

pub fn box_office_config() -> reel_core::BoxOfficeConfig {
    reel_core::BoxOfficeConfig::new("https://mojo.example.com").unwrap()
}
