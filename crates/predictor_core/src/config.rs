//! Runtime configuration read from `config.toml`.

use crate::catalog::DEFAULT_MODEL_ID;
use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV: &str = "VISION_PREDICTOR_ENDPOINT";

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Full URL of the prediction route.
    pub endpoint: String,
    /// Catalog id selected at startup.
    pub default_model: String,
    /// Absent means requests never time out.
    pub request_timeout_secs: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_model: DEFAULT_MODEL_ID.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl PredictorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config and apply the endpoint override. Never fails: every
    /// problem is logged and the affected value falls back to its default.
    pub fn resolve(path: Option<&Path>, endpoint_override: Option<String>) -> Self {
        let mut config = match path.map(Self::load_from) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        if let Err(e) = config.endpoint_url() {
            tracing::warn!("{e}; using {DEFAULT_ENDPOINT}");
            config.endpoint = DEFAULT_ENDPOINT.to_string();
        }

        if let Some(endpoint) = endpoint_override.filter(|e| !e.trim().is_empty()) {
            let candidate = endpoint.trim().to_string();
            match parse_endpoint(&candidate) {
                Ok(_) => {
                    tracing::info!("Endpoint overridden by {ENDPOINT_ENV}: {candidate}");
                    config.endpoint = candidate;
                }
                Err(e) => tracing::warn!("Ignoring {ENDPOINT_ENV}: {e}"),
            }
        }

        config
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        parse_endpoint(&self.endpoint)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_point_at_local_service() {
        let config = PredictorConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000/predict");
        assert_eq!(config.default_model, "resnet");
        assert_eq!(config.request_timeout(), None);
        assert!(config.endpoint_url().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = PredictorConfig::from_toml_str("request_timeout_secs = 5\n").unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_file_is_default() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let config = PredictorConfig::load_from(&dir.path().join(CONFIG_FILE_NAME))?;
        assert_eq!(config, PredictorConfig::default());
        Ok(())
    }

    #[test]
    fn loads_file_values() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "endpoint = \"https://vision.example/predict\"\ndefault_model = \"unet\"\n",
        )?;
        let config = PredictorConfig::load_from(&path)?;
        assert_eq!(config.endpoint, "https://vision.example/predict");
        assert_eq!(config.default_model, "unet");
        Ok(())
    }

    #[test]
    fn broken_file_resolves_to_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "endpoint = [")?;
        assert!(matches!(
            PredictorConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(
            PredictorConfig::resolve(Some(path.as_path()), None),
            PredictorConfig::default()
        );
        Ok(())
    }

    #[test]
    fn invalid_endpoint_in_file_falls_back() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "endpoint = \"localhost:8000\"\ndefault_model = \"unet\"\n")?;
        let config = PredictorConfig::resolve(Some(path.as_path()), None);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.default_model, "unet");
        Ok(())
    }

    #[test]
    fn endpoint_override_wins_when_valid() {
        let config =
            PredictorConfig::resolve(None, Some("http://10.0.0.2:9000/predict".to_string()));
        assert_eq!(config.endpoint, "http://10.0.0.2:9000/predict");

        let config = PredictorConfig::resolve(None, Some("not a url".to_string()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }
}
