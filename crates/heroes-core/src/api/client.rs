//! HTTP client for the public superhero dataset.
//!
//! The whole catalog lives in one `all.json` document, so the client only
//! ever issues a single GET.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, info, warn};

use crate::models::Hero;

use super::{ApiError, CatalogSource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public superhero API
pub const DEFAULT_API_BASE_URL: &str = "https://akabab.github.io/superhero-api/api";

/// Document holding the full dataset, relative to the base URL
const ALL_HEROES_PATH: &str = "all.json";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the superhero dataset.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the public API with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn all_heroes_url(&self) -> String {
        format!("{}/{}", self.base_url, ALL_HEROES_PATH)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, url, &body))
        }
    }

    /// Fetch every hero in the dataset
    pub async fn fetch_heroes(&self) -> Result<Vec<Hero>> {
        let url = self.all_heroes_url();
        debug!(url = %url, "Fetching hero catalog");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response, &url).await?;

        let body = response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read response body from {}", url))?;

        let heroes = decode_catalog(&body)
            .with_context(|| format!("Failed to parse hero catalog from {}", url))?;

        info!(count = heroes.len(), "Fetched hero catalog");
        Ok(heroes)
    }
}

/// Decode the dataset record by record. The payload must be a JSON array;
/// entries that don't describe a hero (no id, no name) are skipped.
pub(crate) fn decode_catalog(body: &str) -> Result<Vec<Hero>, ApiError> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

    let total = records.len();
    let heroes: Vec<Hero> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Hero>(record) {
            Ok(hero) => Some(hero),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed hero record");
                None
            }
        })
        .collect();

    if heroes.len() < total {
        warn!(kept = heroes.len(), skipped = total - heroes.len(), "Hero catalog had bad records");
    }
    Ok(heroes)
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_all(&self) -> Result<Vec<Hero>> {
        self.fetch_heroes().await
    }
}
