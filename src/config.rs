//! Libri Configuration Module
//!
//! Manages persistent configuration for service endpoints and credentials.
//! Config is stored in `~/.config/libri/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (applied by the caller)
//! 2. Environment variables (`LIBRI_CATALOG_URL`, `LIBRI_SESSION_URL`,
//!    `LIBRI_AGENT_URL`, `LIBRI_API_KEY`)
//! 3. Config file (`~/.config/libri/config.toml`)
//! 4. Defaults (localhost)

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LibriError, Result};

/// Default base URL used when nothing is configured
const DEFAULT_ENDPOINT: &str = "http://localhost:4000";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibriConfig {
    /// Service endpoint URLs
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Credentials forwarded to the session/agent services
    #[serde(default)]
    pub auth: Auth,
}

/// Endpoint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Endpoints {
    /// Base URL of the catalog service (serves /books and /books/search)
    pub catalog_url: Option<String>,

    /// Base URL of the session service (serves /session)
    pub session_url: Option<String>,

    /// Base URL of the agent service (serves /agent/invoke)
    pub agent_url: Option<String>,
}

/// Credential configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Auth {
    /// API key sent as a bearer token to the session and agent services
    pub api_key: Option<String>,
}

impl LibriConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/libri/` on Unix, `%APPDATA%/libri/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("libri")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| LibriError::Config {
            reason: format!("Failed to read config file: {}", e),
        })?;

        toml::from_str(&content).map_err(|e| LibriError::Config {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Save configuration to file
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir();
        let path = Self::config_path();

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| LibriError::Config {
                reason: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| LibriError::Config {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| LibriError::Config {
            reason: format!("Failed to write config file: {}", e),
        })?;

        Ok(())
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    /// Empty values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(v) = std::env::var("LIBRI_CATALOG_URL") {
            if !v.is_empty() {
                self.endpoints.catalog_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("LIBRI_SESSION_URL") {
            if !v.is_empty() {
                self.endpoints.session_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("LIBRI_AGENT_URL") {
            if !v.is_empty() {
                self.endpoints.agent_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("LIBRI_API_KEY") {
            if !v.is_empty() {
                self.auth.api_key = Some(v);
            }
        }
        self
    }

    /// Effective catalog base URL
    pub fn catalog_url(&self) -> &str {
        self.endpoints.catalog_url.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Effective session base URL
    pub fn session_url(&self) -> &str {
        self.endpoints.session_url.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Effective agent base URL
    pub fn agent_url(&self) -> &str {
        self.endpoints.agent_url.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// API key, if configured
    pub fn api_key(&self) -> Option<&str> {
        self.auth.api_key.as_deref()
    }

    /// Validate that every effective endpoint parses as an absolute URL
    pub fn validate(&self) -> Result<()> {
        for raw in [self.catalog_url(), self.session_url(), self.agent_url()] {
            Url::parse(raw).map_err(|e| LibriError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Mask an API key for display
///
/// Shows first N chars + asterisks, e.g. "lk-prod-***"
pub fn mask_api_key(key: &str, visible_chars: usize) -> String {
    if key.is_empty() {
        return String::new();
    }

    let visible = key.len().min(visible_chars);
    format!("{}***", &key[..visible])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_contains_libri() {
        let path = LibriConfig::config_path();
        assert!(path.to_string_lossy().contains("libri"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_default_config_uses_localhost() {
        let config = LibriConfig::default();
        assert_eq!(config.catalog_url(), DEFAULT_ENDPOINT);
        assert_eq!(config.session_url(), DEFAULT_ENDPOINT);
        assert_eq!(config.agent_url(), DEFAULT_ENDPOINT);
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = LibriConfig {
            endpoints: Endpoints {
                catalog_url: Some("http://books.internal:8080".into()),
                session_url: Some("http://auth.internal:8081".into()),
                agent_url: Some("http://agent.internal:8082".into()),
            },
            auth: Auth {
                api_key: Some("lk-test-key".into()),
            },
        };

        let content = toml::to_string_pretty(&config).unwrap();
        fs::write(&config_path, &content).unwrap();

        let loaded: LibriConfig = toml::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_env_overrides_config() {
        env::set_var("LIBRI_CATALOG_URL", "http://from-env:9000");

        let config = LibriConfig {
            endpoints: Endpoints {
                catalog_url: Some("http://from-config:9001".into()),
                ..Default::default()
            },
            ..Default::default()
        }
        .with_env();

        assert_eq!(config.catalog_url(), "http://from-env:9000");

        env::remove_var("LIBRI_CATALOG_URL");
    }

    #[test]
    fn test_env_does_not_override_with_empty() {
        env::set_var("LIBRI_API_KEY", "");

        let config = LibriConfig {
            auth: Auth {
                api_key: Some("lk-from-config".into()),
            },
            ..Default::default()
        }
        .with_env();

        assert_eq!(config.api_key(), Some("lk-from-config"));

        env::remove_var("LIBRI_API_KEY");
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let config = LibriConfig {
            endpoints: Endpoints {
                catalog_url: Some("not a url".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LibriError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_toml_format() {
        let config = LibriConfig {
            endpoints: Endpoints {
                catalog_url: Some("http://localhost:4000".into()),
                ..Default::default()
            },
            auth: Auth {
                api_key: Some("lk-test".into()),
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();

        assert!(toml_str.contains("[endpoints]"));
        assert!(toml_str.contains("catalog_url = \"http://localhost:4000\""));
        assert!(toml_str.contains("[auth]"));
        assert!(toml_str.contains("api_key = \"lk-test\""));
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("lk-prod-abcdefghij", 8), "lk-prod-***");
        assert_eq!(mask_api_key("short", 10), "short***");
        assert_eq!(mask_api_key("", 10), "");
    }
}
