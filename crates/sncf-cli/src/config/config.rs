//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Navitia API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Navitia API configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// API token, used when no other credential source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Coverage base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds, applied to every command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl ApiConfig {
    /// Parsed base URL override, if any.
    ///
    /// A missing trailing `/` is added so relative paths extend the coverage.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is set but is not a valid URL.
    pub fn base_url(&self) -> Result<Option<Url>> {
        let Some(ref raw) = self.base_url else {
            return Ok(None);
        };
        let normalized = if raw.ends_with('/') {
            raw.clone()
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&normalized)
            .with_context(|| format!("invalid api.base_url in config: {raw}"))?;
        Ok(Some(url))
    }

    /// Request timeout: the configured value, or `fallback` when unset.
    #[must_use]
    pub fn timeout_or(&self, fallback: Duration) -> Duration {
        self.timeout_secs.map_or(fallback, Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.api.token.is_none());
        assert!(config.api.base_url().unwrap().is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_empty_file_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\ntoken = \"abc\"\nbase_url = \"http://localhost:8080/v1/coverage/sncf\"\ntimeout_secs = 30\n",
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(
            config.api.base_url().unwrap().unwrap().as_str(),
            "http://localhost:8080/v1/coverage/sncf/"
        );
        assert_eq!(
            config.api.timeout_or(Duration::from_secs(10)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\ntoken = ").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn test_invalid_base_url_fails() {
        // Arrange
        let api = ApiConfig {
            base_url: Some(String::from("not a url")),
            ..ApiConfig::default()
        };

        // Act & Assert
        assert!(api.base_url().is_err());
    }

    #[test]
    fn test_timeout_fallback() {
        // Arrange
        let api = ApiConfig::default();

        // Act & Assert
        assert_eq!(
            api.timeout_or(Duration::from_secs(15)),
            Duration::from_secs(15)
        );
    }
}
