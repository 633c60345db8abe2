pub mod box_office;
pub mod config;
pub mod details;
pub mod discovery;
pub mod error;
pub mod models;
pub mod table;
pub mod traits;
pub mod util;

#[cfg(test)]
pub mod testutil;

pub use box_office::{BoxOfficeService, UpdateReport};
pub use config::{ApiConfig, BoxOfficeConfig};
pub use details::{DetailService, EnrichReport};
pub use discovery::DiscoveryService;
pub use error::AppError;
pub use models::{BoxOfficeFigures, MovieDetails, RegionFigure, SummaryFigures};
pub use table::Table;
pub use traits::{Fetcher, PageParser};
pub use util::{clean_currency, clean_region_name};
