//! Client configuration.
//!
//! Configuration is stored in `<config dir>/sitework/config.yaml` (or the file
//! named by `SITEWORK_CONFIG`) and includes:
//! - Which backend serves requests (the REST API or the in-process mock)
//! - API base URL, bearer token, and timeouts
//! - The default project used when `--project` is omitted
//!
//! Environment variables take precedence over the file.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteworkError};

pub const CONFIG_PATH_ENV: &str = "SITEWORK_CONFIG";
pub const API_URL_ENV: &str = "SITEWORK_API_URL";
pub const API_TOKEN_ENV: &str = "SITEWORK_API_TOKEN";
pub const BACKEND_ENV: &str = "SITEWORK_BACKEND";
pub const LOG_ENV: &str = "SITEWORK_LOG";

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which backend serves service calls
    #[serde(default)]
    pub backend: Backend,

    /// REST API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Project used when a command does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// Log filter directive (trace, debug, info, warn, error)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Rest,
    /// Seeded in-process data, used until an endpoint is integrated
    Mock,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Rest => write!(f, "rest"),
            Backend::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = SiteworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(Backend::Rest),
            "mock" => Ok(Backend::Mock),
            _ => Err(SiteworkError::Config(format!(
                "unknown backend '{}', expected 'rest' or 'mock'",
                s
            ))),
        }
    }
}

/// REST API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        directories::ProjectDirs::from("", "", "sitework")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .ok_or_else(|| {
                SiteworkError::Config("could not determine a configuration directory".to_string())
            })
    }

    /// Load configuration from file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from file only, or return default if not found
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = non_empty_env(API_URL_ENV) {
            self.api.base_url = url;
        }
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api.token = Some(token);
        }
        if let Some(backend) = non_empty_env(BACKEND_ENV) {
            self.backend = backend.parse()?;
        }
        if let Some(level) = non_empty_env(LOG_ENV) {
            self.log_level = Some(level);
        }
        Ok(())
    }

    /// Effective log filter directive
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Set a value by dotted key, as used by `config set`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend" => self.backend = value.parse()?,
            "api.base_url" => self.api.base_url = value.to_string(),
            "api.token" => self.api.token = Some(value.to_string()),
            "api.timeout_secs" => self.api.timeout_secs = parse_secs(key, value)?,
            "api.connect_timeout_secs" => self.api.connect_timeout_secs = parse_secs(key, value)?,
            "default_project" => self.default_project = Some(value.to_string()),
            "log_level" => self.log_level = Some(value.to_string()),
            _ => {
                return Err(SiteworkError::Config(format!(
                    "unknown config key '{}'. Valid keys: {}",
                    key,
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub const KEYS: &'static [&'static str] = &[
        "backend",
        "api.base_url",
        "api.token",
        "api.timeout_secs",
        "api.connect_timeout_secs",
        "default_project",
        "log_level",
    ];
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        SiteworkError::Config(format!("'{}' expects a number of seconds, got '{}'", key, value))
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("rest".parse::<Backend>().unwrap(), Backend::Rest);
        assert_eq!("MOCK".parse::<Backend>().unwrap(), Backend::Mock);
        assert!("graphql".parse::<Backend>().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Rest);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.api.connect_timeout_secs, 30);
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml_ng::from_str("backend: mock\napi:\n  token: abc\n").unwrap();
        assert_eq!(config.backend, Backend::Mock);
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_set_known_and_unknown_keys() {
        let mut config = Config::default();
        config.set("api.timeout_secs", "5").unwrap();
        config.set("default_project", "p-7").unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.default_project.as_deref(), Some("p-7"));

        assert!(config.set("api.timeout_secs", "soon").is_err());
        assert!(config.set("colour", "blue").is_err());
    }

    #[test]
    #[serial]
    fn test_save_and_load_with_env_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        // SAFETY: serialized test, no other threads read the environment.
        unsafe {
            env::set_var(CONFIG_PATH_ENV, &path);
            env::remove_var(API_URL_ENV);
            env::remove_var(BACKEND_ENV);
        }

        let mut config = Config::default();
        config.set("api.base_url", "https://pm.example.com/api").unwrap();
        config.save().unwrap();
        assert!(path.exists());

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.api.base_url, "https://pm.example.com/api");

        unsafe {
            env::set_var(BACKEND_ENV, "mock");
        }
        let loaded = Config::load().unwrap();
        assert_eq!(loaded.backend, Backend::Mock);

        unsafe {
            env::remove_var(BACKEND_ENV);
            env::remove_var(CONFIG_PATH_ENV);
        }
    }
}
