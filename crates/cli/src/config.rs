//! CLI configuration
//!
//! Layered as built-in defaults, then an optional TOML/YAML/JSON file, then
//! `ELLP_`-prefixed environment variables (`ELLP_API__BASE_URL=...`).

use anyhow::{Context, Result};
use ellp_core::listing::DEFAULT_PER_PAGE;
use ellp_http::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub api: ApiSettings,
    pub output: OutputSettings,
    pub listing: ListingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    /// Request timeout in seconds; unset or 0 disables it
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory generated documents are written to
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSettings {
    pub per_page: usize,
}

impl CliConfig {
    /// Load configuration, reading `file` when it exists
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, None)
    }

    /// Load configuration with `env` standing in for the process environment
    fn load_with_env(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("output.dir", ".")?
            .set_default("listing.per_page", DEFAULT_PER_PAGE as u64)?;

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("ELLP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("failed to read configuration")?;

        settings
            .try_deserialize()
            .context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(Some(&dir.path().join("missing.toml"))).unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), None);
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert_eq!(config.listing.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://ellp.example.org/api"
timeout_secs = 30

[listing]
per_page = 10
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "https://ellp.example.org/api");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.listing.per_page, 10);
        assert_eq!(config.output.dir, PathBuf::from("."));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://file.example.org/api\"\n").unwrap();

        let env = [
            ("ELLP_API__BASE_URL", "https://env.example.org/api"),
            ("ELLP_API__TIMEOUT_SECS", "15"),
            ("ELLP_LISTING__PER_PAGE", "20"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let config = CliConfig::load_with_env(Some(&path), Some(env)).unwrap();
        assert_eq!(config.api.base_url, "https://env.example.org/api");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.listing.per_page, 20);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let settings = ApiSettings {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: Some(0),
            user_agent: None,
        };
        assert_eq!(settings.timeout(), None);
    }
}
