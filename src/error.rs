use thiserror::Error;

/// Errors raised while talking to a movie API, decoding its answers or
/// touching local storage.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Could not decode API response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(e) => format!("Network error: {}", e),
            AppError::Status { status, .. } => format!("Movie API error (HTTP {})", status),
            AppError::Decode(msg) => format!("Unexpected response from movie API: {}", msg),
            AppError::NotFound(what) => format!("Nothing found for {}", what),
            AppError::Storage(msg) => format!("Could not access saved data: {}", msg),
            AppError::Io(e) => format!("File system error: {}", e),
            AppError::Serialization(e) => format!("Data format error: {}", e),
            AppError::Config(msg) => format!("Configuration error: {}", msg),
        }
    }

    /// Whether the failure came from the network rather than from the data.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Http(_) | AppError::Status { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_user_message() {
        let error = AppError::Status {
            status: 401,
            url: "https://api.themoviedb.org/3/movie/top_rated".to_string(),
        };
        assert_eq!(error.user_message(), "Movie API error (HTTP 401)");
        assert!(error.is_transport());
    }

    #[test]
    fn test_decode_error_is_not_transport() {
        let error = AppError::Decode("missing field `results`".to_string());
        assert!(!error.is_transport());
        assert!(error.user_message().contains("missing field"));
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let error: AppError = parse.unwrap_err().into();
        assert!(matches!(error, AppError::Serialization(_)));
    }
}
