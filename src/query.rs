use crate::error::{AppError, AppResult};
use reqwest::Url;

/// Curated listings reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    TrendingWeek,
    TopRated,
    TrendingDay,
}

/// Free-text search input, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` for empty or whitespace-only input, which callers
    /// treat as a no-op submission.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fully built GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
}

impl Request {
    /// Join `path` onto `base` and append the URL-encoded query parameters.
    pub fn build(base: &str, path: &str, params: &[(&str, &str)]) -> AppResult<Self> {
        let raw = format!("{}{}", base.trim_end_matches('/'), path);
        let url = Url::parse_with_params(&raw, params)
            .map_err(|e| AppError::Config(format!("invalid endpoint {}: {}", raw, e)))?;
        Ok(Self { url })
    }

    /// Value of a query parameter.
    #[cfg(test)]
    pub fn param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// URL with the API key masked, safe for log files.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "api_key" || k == "apikey" {
                    "***".to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), v)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }
}
