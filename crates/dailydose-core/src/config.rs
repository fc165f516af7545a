//! Configuration types for Daily Dose components.
//!
//! Every value has a default, so an absent configuration file is fine. A
//! TOML file may override any subset of the fields:
//!
//! ```toml
//! [http]
//! timeout_secs = 5
//!
//! [endpoints]
//! quotes = "https://example.org/quotes/random"
//!
//! [storage]
//! data_dir = "/var/lib/dailydose"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::models::Category;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client configuration for the content endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("dailydose/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Upstream URL for each category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub advice: String,
    pub books: String,
    pub quotes: String,
    pub dogs: String,
}

impl EndpointConfig {
    pub fn url_for(&self, category: Category) -> &str {
        match category {
            Category::Advice => &self.advice,
            Category::Book => &self.books,
            Category::Quote => &self.quotes,
            Category::Dog => &self.dogs,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            advice: "https://api.adviceslip.com/advice".to_string(),
            books: "https://potterapi-fedeperin.vercel.app/en/books".to_string(),
            quotes: "https://hindi-quotes.vercel.app/random".to_string(),
            dogs: "https://dog.ceo/api/breeds/image/random".to_string(),
        }
    }
}

/// Where the stores and the error log live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageConfig {
    pub fn store_path(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.file_name())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join("app.log")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("log"),
        }
    }
}

/// Complete configuration, passed explicitly into the client and the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub http: HttpConfig,
    pub endpoints: EndpointConfig,
    pub storage: StorageConfig,
}

impl HubConfig {
    /// Parses a TOML document; omitted keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        let config: Self =
            toml::from_str(content).map_err(|e| AppError::ConfigError(e.to_string()))?;
        if config.http.timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "http.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Default location of the configuration file, e.g. `~/.config/dailydose/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dailydose").join("config.toml"))
}

/// Loads the configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and silently skipped when absent.
pub fn load_config(path: Option<&Path>) -> Result<HubConfig, AppError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("No configuration file found, using defaults");
                return Ok(HubConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        AppError::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "Loaded configuration file");
    HubConfig::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.user_agent.starts_with("dailydose/"));
    }

    #[test]
    fn test_storage_paths() {
        let config = StorageConfig::default();
        assert_eq!(
            config.store_path(Category::Book),
            PathBuf::from("data/books_data.csv")
        );
        assert_eq!(config.log_path(), PathBuf::from("log/app.log"));
    }

    #[test]
    fn test_endpoint_lookup() {
        let config = EndpointConfig::default();
        assert_eq!(
            config.url_for(Category::Dog),
            "https://dog.ceo/api/breeds/image/random"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HubConfig::from_toml_str(
            r#"
            [http]
            timeout_secs = 3

            [endpoints]
            quotes = "http://localhost:9999/q"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 3);
        assert!(config.http.user_agent.starts_with("dailydose/"));
        assert_eq!(config.endpoints.quotes, "http://localhost:9999/q");
        assert_eq!(config.endpoints.advice, EndpointConfig::default().advice);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = HubConfig::from_toml_str("[http\ntimeout_secs = ");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = HubConfig::from_toml_str("[http]\ntimeout_secs = 0\n");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\ndata_dir = \"/tmp/dd\"\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/dd"));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(dir.path().join("nope.toml").as_path()));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
