use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storage::rest::RestConfig;
use thiserror::Error;

use crate::cli::GlobalArgs;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid backend url {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("backend url must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("anon key is not configured (set SHELF_ANON_KEY or anon_key in the config file)")]
    MissingAnonKey,
}

/// Settings of the `shelf` binary.
///
/// Precedence: command-line flags, then `SHELF_*` environment variables
/// (both resolved by clap), then the TOML file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub anon_key: String,
    pub session_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            session_file: PathBuf::from(".shelf-session.json"),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with `path` when given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns the TOML error for malformed input.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    #[must_use]
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(url) = &args.backend_url {
            self.backend_url.clone_from(url);
        }
        if let Some(key) = &args.anon_key {
            self.anon_key.clone_from(key);
        }
        if let Some(file) = &args.session_file {
            self.session_file.clone_from(file);
        }
        if let Some(level) = &args.log_level {
            self.log_level.clone_from(level);
        }
        self
    }

    /// Validated connection settings for the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a malformed or non-http(s) url, or a missing anon key.
    pub fn rest_config(&self) -> Result<RestConfig, ConfigError> {
        let raw = self.backend_url.trim();
        let parsed = url::Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            raw: raw.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingAnonKey);
        }
        Ok(RestConfig {
            base_url: raw.trim_end_matches('/').to_string(),
            anon_key: self.anon_key.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml("anon_key = \"anon\"\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.backend_url, AppConfig::default().backend_url);
    }

    #[test]
    fn flags_override_file_values() {
        let config = AppConfig::from_toml("backend_url = \"https://file.example.co\"\n")
            .unwrap()
            .with_overrides(&GlobalArgs {
                backend_url: Some("https://flag.example.co/".to_string()),
                anon_key: Some("key".to_string()),
                ..GlobalArgs::default()
            });
        let rest = config.rest_config().unwrap();
        assert_eq!(rest.base_url, "https://flag.example.co");
        assert_eq!(rest.anon_key, "key");
    }

    #[test]
    fn rejects_bad_urls_and_missing_key() {
        let mut config = AppConfig {
            anon_key: "key".to_string(),
            ..AppConfig::default()
        };
        config.backend_url = "not a url".to_string();
        assert!(matches!(
            config.rest_config(),
            Err(ConfigError::InvalidUrl { .. })
        ));

        config.backend_url = "ftp://files.example.co".to_string();
        assert!(matches!(
            config.rest_config(),
            Err(ConfigError::UnsupportedScheme(_))
        ));

        let config = AppConfig::default();
        assert!(matches!(
            config.rest_config(),
            Err(ConfigError::MissingAnonKey)
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/shelf.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
