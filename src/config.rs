use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Which movie API backs the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Tmdb,
    Omdb,
}

impl ProviderKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tmdb => "TMDB",
            Self::Omdb => "OMDb",
        }
    }

    pub fn key_env_var(self) -> &'static str {
        match self {
            Self::Tmdb => "TMDB_API_KEY",
            Self::Omdb => "OMDB_API_KEY",
        }
    }
}

/// User configuration, read from `config.json` in the platform config
/// directory. Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub omdb_base_url: String,
    /// Maximum number of cards rendered for API results
    pub grid_limit: usize,
    /// Where the watchlist and logs live; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Tmdb,
            tmdb_api_key: None,
            omdb_api_key: None,
            tmdb_base_url: "https://api.themoviedb.org/3".to_string(),
            tmdb_image_base_url: "https://image.tmdb.org/t/p/w1280".to_string(),
            omdb_base_url: "https://www.omdbapi.com/".to_string(),
            grid_limit: 12,
            data_dir: None,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "movie-explorer", "movie-explorer")
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|d| d.config_dir().join("config.json"))
    }

    /// Load the configuration file, then apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(ref p) if p.exists() => {
                let text = std::fs::read_to_string(p)?;
                serde_json::from_str(&text).map_err(|e| {
                    AppError::Config(format!("{}: {}", p.display(), e))
                })?
            }
            _ => Config::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Overlay API keys from the environment. `lookup` is injected so tests
    /// do not depend on the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("TMDB_API_KEY").filter(|k| !k.is_empty()) {
            self.tmdb_api_key = Some(key);
        }
        if let Some(key) = lookup("OMDB_API_KEY").filter(|k| !k.is_empty()) {
            self.omdb_api_key = Some(key);
        }
    }

    /// API key for the selected provider.
    pub fn api_key(&self) -> Option<String> {
        match self.provider {
            ProviderKind::Tmdb => self.tmdb_api_key.clone(),
            ProviderKind::Omdb => self.omdb_api_key.clone(),
        }
    }

    /// Set the key of the selected provider (from `--api-key`).
    pub fn set_api_key(&mut self, key: String) {
        match self.provider {
            ProviderKind::Tmdb => self.tmdb_api_key = Some(key),
            ProviderKind::Omdb => self.omdb_api_key = Some(key),
        }
    }

    /// Directory holding the watchlist store and log files.
    pub fn data_dir(&self) -> AppResult<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.provider, ProviderKind::Tmdb);
        assert_eq!(config.grid_limit, 12);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"provider":"omdb","omdb_api_key":"xyz"}"#).unwrap();
        assert_eq!(config.provider, ProviderKind::Omdb);
        assert_eq!(config.api_key().as_deref(), Some("xyz"));
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config {
            tmdb_api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        config.apply_env(|name| match name {
            "TMDB_API_KEY" => Some("from-env".to_string()),
            "OMDB_API_KEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.tmdb_api_key.as_deref(), Some("from-env"));
        assert!(config.omdb_api_key.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"grid_limit": 6, "data_dir": "/tmp/movies"}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.grid_limit, 6);
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/movies"));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ grid_limit: ").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(AppError::Config(_))));
    }

    #[test]
    fn test_set_api_key_targets_selected_provider() {
        let mut config = Config {
            provider: ProviderKind::Omdb,
            ..Config::default()
        };
        config.set_api_key("cli".to_string());
        assert_eq!(config.omdb_api_key.as_deref(), Some("cli"));
        assert!(config.tmdb_api_key.is_none());
    }
}
