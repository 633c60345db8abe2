use std::time::Duration;

use reel_core::error::AppError;
use reel_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; Reel/0.1; +https://github.com/AndreaBozzo/Reel)";

/// HTTP fetcher using reqwest.
///
/// Downloads documents with a configurable User-Agent and timeout. A bearer
/// token, when given, is sent as `Authorization: Bearer <token>` together
/// with `Accept: application/json`.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let timeout_secs = timeout.as_secs();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, bearer: Option<&str>) -> Result<String, AppError> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request
                .header(ACCEPT, "application/json")
                .header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}
