//! Movie API adapters.
//!
//! Each provider describes how to build request URLs and how to decode the
//! provider's JSON into the shared [`MovieSummary`] / [`MovieDetail`] shapes.
//! The network itself sits behind [`Transport`] so the fetch pipeline can be
//! driven by canned responses in tests.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};

use crate::config::{Config, ProviderKind};
use crate::error::{AppError, AppResult};
use crate::model::{MovieDetail, MovieSummary};
use crate::query::{Listing, Request, SearchQuery};

pub mod omdb;
pub mod tmdb;

pub use omdb::OmdbProvider;
pub use tmdb::TmdbProvider;

/// Shown in the detail modal when a movie has no usable poster.
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Request builder and response decoder for one movie API.
pub trait MovieProvider: Send + Sync {
    /// Provider name for logging and the header bar
    fn name(&self) -> &'static str;

    /// Request for a curated navigation listing.
    fn listing(&self, listing: Listing) -> AppResult<Request>;

    /// Title search request.
    fn search(&self, query: &SearchQuery) -> AppResult<Request>;

    /// Request for movies related to `seed`, the top search match.
    fn recommendations(&self, seed: &MovieSummary) -> AppResult<Request>;

    /// Extended record request for a single movie.
    fn detail(&self, id: &str) -> AppResult<Request>;

    /// Decode a listing, search or recommendations body. A well-formed
    /// response with no matches decodes to an empty list.
    fn decode_list(&self, body: &[u8]) -> AppResult<Vec<MovieSummary>>;

    /// Decode a detail body. A provider-level "not found" answer is
    /// [`AppError::NotFound`].
    fn decode_detail(&self, body: &[u8]) -> AppResult<MovieDetail>;

    /// Web page for a movie, opened from the grid.
    fn page_url(&self, id: &str) -> String;
}

/// One HTTP GET returning the raw body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &Request) -> AppResult<Vec<u8>>;
}

/// reqwest-backed transport. No timeout and no retry are applied.
#[derive(Clone, Default)]
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &Request) -> AppResult<Vec<u8>> {
        tracing::debug!(url = %request.redacted(), "GET");

        let response = self.http_client.get(request.url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(request.redacted()));
        }
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: request.redacted(),
            });
        }

        let body = response.bytes().await?;
        tracing::debug!(url = %request.redacted(), bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

/// Build the provider selected in the configuration.
pub fn from_config(config: &Config) -> AppResult<Arc<dyn MovieProvider>> {
    let key = config.api_key().ok_or_else(|| {
        AppError::Config(format!(
            "no API key configured for {}; set {} or pass --api-key",
            config.provider.label(),
            config.provider.key_env_var()
        ))
    })?;

    let provider: Arc<dyn MovieProvider> = match config.provider {
        ProviderKind::Tmdb => Arc::new(TmdbProvider::new(
            key,
            config.tmdb_base_url.clone(),
            config.tmdb_image_base_url.clone(),
        )),
        ProviderKind::Omdb => Arc::new(OmdbProvider::new(key, config.omdb_base_url.clone())),
    };
    Ok(provider)
}

/// Treat empty strings and OMDB's `"N/A"` as missing.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "N/A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(" x ".to_string())).as_deref(), Some("x"));
        assert_eq!(non_empty(Some("N/A".to_string())), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = Config {
            tmdb_api_key: None,
            ..Config::default()
        };
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_from_config_selects_provider() {
        let config = Config {
            provider: ProviderKind::Omdb,
            omdb_api_key: Some("k".to_string()),
            ..Config::default()
        };
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "OMDb");
    }
}
