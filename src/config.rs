//! Configuration management for the jobfoyu client

use crate::error::{JobfoyuError, Result};
use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the service base URL.
pub const API_BASE_ENV: &str = "JOBFOYU_API_BASE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the matching service, e.g. `https://api.example.com`
    pub base_url: Option<String>,
    /// Optional request timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            locale: Locale::En,
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults on first run.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobfoyuError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobfoyuError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("jobfoyu")
            .join("config.toml")
    }

    /// Resolve the service base URL: explicit flag, then environment, then config file.
    pub fn resolve_base_url(&self, flag: Option<&str>) -> Result<String> {
        let from_env = std::env::var(API_BASE_ENV).ok();
        pick_base_url(flag, from_env.as_deref(), self.api.base_url.as_deref())
    }
}

fn pick_base_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> Result<String> {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or_else(|| {
            JobfoyuError::Configuration(format!(
                "No service base URL configured. Pass --api-base, set {} or add api.base_url to {}",
                API_BASE_ENV,
                Config::config_path().display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_url_precedence() {
        let url = pick_base_url(Some("http://flag"), Some("http://env"), Some("http://file")).unwrap();
        assert_eq!(url, "http://flag");

        let url = pick_base_url(None, Some("http://env/"), Some("http://file")).unwrap();
        assert_eq!(url, "http://env");

        let url = pick_base_url(None, Some("  "), Some("http://file//")).unwrap();
        assert_eq!(url, "http://file");
    }

    #[test]
    fn test_missing_base_url_is_configuration_error() {
        let err = pick_base_url(None, None, None).unwrap_err();
        assert!(matches!(err, JobfoyuError::Configuration(_)));
    }

    #[test]
    fn test_load_writes_defaults_then_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert!(config.api.base_url.is_none());
        assert_eq!(config.output.format, OutputFormat::Console);

        let mut edited = config.clone();
        edited.api.base_url = Some("http://localhost:8000".to_string());
        edited.output.locale = Locale::Id;
        edited.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(reloaded.output.locale, Locale::Id);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"http://svc\"\n").unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("http://svc"));
        assert!(config.output.color_output);
    }
}
