use url::Url;

use crate::error::AppError;

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_BOX_OFFICE_URL: &str = "https://www.boxofficemojo.com";

/// Connection settings for the movie-database API.
///
/// Built once and passed by reference to every API fetch.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: String,
    /// Recorded for completeness; requests authenticate with the bearer token.
    pub api_key: Option<String>,
    pub language: String,
}

impl ApiConfig {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, AppError> {
        Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid API base URL '{base_url}': {e}")))?;
        if access_token.trim().is_empty() {
            return Err(AppError::Config("API access token is empty".into()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            api_key: None,
            language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read configuration from environment variables.
    ///
    /// - `THE_MOVIE_DB_BASE_URL` (required)
    /// - `THE_MOVIE_DB_ACCESS_TOKEN` (required)
    /// - `THE_MOVIE_DB_API_KEY` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = lookup("THE_MOVIE_DB_BASE_URL")
            .ok_or_else(|| AppError::Config("THE_MOVIE_DB_BASE_URL not set".into()))?;
        let access_token = lookup("THE_MOVIE_DB_ACCESS_TOKEN")
            .ok_or_else(|| AppError::Config("THE_MOVIE_DB_ACCESS_TOKEN not set".into()))?;

        let config = Self::new(&base_url, &access_token)?;
        Ok(match lookup("THE_MOVIE_DB_API_KEY") {
            Some(key) => config.with_api_key(key),
            None => config,
        })
    }

    /// Popularity-ranked listing URL for a 1-indexed page.
    pub fn discover_url(&self, page: u32) -> String {
        format!(
            "{}/discover/movie?include_adult=false&include_video=false&language={}&page={}&sort_by=popularity.desc",
            self.base_url, self.language, page
        )
    }

    pub fn detail_url(&self, id: u64) -> String {
        format!("{}/movie/{}?language={}", self.base_url, id, self.language)
    }
}

/// Location of the box-office site.
#[derive(Debug, Clone)]
pub struct BoxOfficeConfig {
    pub base_url: String,
}

impl BoxOfficeConfig {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Url::parse(base_url).map_err(|e| {
            AppError::Config(format!("Invalid box office base URL '{base_url}': {e}"))
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn title_url(&self, imdb_id: &str) -> String {
        format!("{}/title/{}/?ref_=bo_tt_tab#tabs", self.base_url, imdb_id)
    }
}

impl Default for BoxOfficeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BOX_OFFICE_URL.to_string(),
        }
    }
}
