//! Configuration for the generative-language client
//!
//! Values resolve in layers: built-in defaults, then an optional YAML file,
//! then `LURE_*` environment variables, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ENV_API_KEY: &str = "LURE_API_KEY";
pub const ENV_API_BASE: &str = "LURE_API_BASE";
pub const ENV_MODEL: &str = "LURE_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "LURE_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Read { path: PathBuf, source: std::io::Error },

  #[error("Failed to parse config file {path}: {source}")]
  Parse { path: PathBuf, source: serde_yaml::Error },

  #[error("Invalid value for {name}: {value}")]
  InvalidValue { name: String, value: String },

  #[error("Invalid service endpoint: {0}")]
  Endpoint(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// API key sent as the `key` query parameter; empty is allowed for trusted previews
  pub api_key: String,
  /// Service root, e.g. "https://generativelanguage.googleapis.com/v1beta"
  pub base_url: String,
  pub model: String,
  pub timeout_secs: u64,
  /// First backoff delay; each later one doubles
  pub base_delay_ms: u64,
  /// Total attempts per request; values above 3 are capped
  pub max_attempts: u32,
  /// Link appended to shared research reports; empty leaves the link out
  pub share_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      api_key: String::new(),
      base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
      model: "gemini-2.5-flash-preview-09-2025".to_string(),
      timeout_secs: 30,
      base_delay_ms: 1000,
      max_attempts: 3,
      share_url: String::new(),
    }
  }
}

impl ApiConfig {
  /// Resolve configuration from file and environment.
  ///
  /// An explicit `path` must exist; the default location is only read when present.
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    let config = match path {
      Some(path) => Self::load_from_file(path)?,
      None => match default_config_path() {
        Some(default) if default.exists() => Self::load_from_file(&default)?,
        _ => Self::default(),
      },
    };

    config.with_env_overrides()
  }

  pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&content)
      .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
  }

  fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
    if let Ok(key) = std::env::var(ENV_API_KEY) {
      self.api_key = key;
    }
    if let Ok(base) = std::env::var(ENV_API_BASE) {
      self.base_url = base;
    }
    if let Ok(model) = std::env::var(ENV_MODEL) {
      self.model = model;
    }
    if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
      self.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidValue {
        name: ENV_TIMEOUT_SECS.to_string(),
        value: raw,
      })?;
    }
    Ok(self)
  }

  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = api_key.into();
    self
  }

  /// The `generateContent` URL for the configured model, key attached
  pub fn endpoint(&self) -> Result<Url, ConfigError> {
    let mut url = Url::parse(&format!(
      "{}/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      self.model
    ))?;
    url.query_pairs_mut().append_pair("key", &self.api_key);
    Ok(url)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }

  pub fn base_delay(&self) -> Duration {
    Duration::from_millis(self.base_delay_ms)
  }
}

/// `<config_dir>/lure/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("lure").join("config.yaml"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::env;
  use tempfile::TempDir;

  fn clear_env() {
    for name in [ENV_API_KEY, ENV_API_BASE, ENV_MODEL, ENV_TIMEOUT_SECS] {
      env::remove_var(name);
    }
  }

  #[test]
  fn test_defaults_match_service_contract() {
    let config = ApiConfig::default();
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.base_delay(), Duration::from_secs(1));
    assert!(config.api_key.is_empty());
    assert!(config.share_url.is_empty());
  }

  #[test]
  fn test_endpoint_carries_key_query() {
    let config = ApiConfig::default().with_api_key("abc123");
    let url = config.endpoint().unwrap();
    assert_eq!(
      url.as_str(),
      "https://generativelanguage.googleapis.com/v1beta/models/\
       gemini-2.5-flash-preview-09-2025:generateContent?key=abc123"
    );
  }

  #[test]
  fn test_endpoint_allows_empty_key_and_trailing_slash() {
    let config =
      ApiConfig { base_url: "http://127.0.0.1:9/v1/".to_string(), ..Default::default() };
    let url = config.endpoint().unwrap();
    assert!(url.as_str().starts_with("http://127.0.0.1:9/v1/models/"));
    assert!(url.as_str().ends_with("?key="));
  }

  #[test]
  fn test_endpoint_rejects_garbage_base() {
    let config = ApiConfig { base_url: "not a url".to_string(), ..Default::default() };
    assert!(matches!(config.endpoint(), Err(ConfigError::Endpoint(_))));
  }

  #[test]
  #[serial]
  fn test_load_from_yaml_file_with_partial_fields() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    std::fs::write(&path, "api_key: from-file\nmodel: gemini-test\n").unwrap();

    let config = ApiConfig::load(Some(&path)).unwrap();
    assert_eq!(config.api_key, "from-file");
    assert_eq!(config.model, "gemini-test");
    assert_eq!(config.timeout_secs, 30);
  }

  #[test]
  #[serial]
  fn test_env_overrides_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    std::fs::write(&path, "api_key: from-file\n").unwrap();

    env::set_var(ENV_API_KEY, "from-env");
    env::set_var(ENV_TIMEOUT_SECS, "5");
    let config = ApiConfig::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(config.api_key, "from-env");
    assert_eq!(config.timeout(), Duration::from_secs(5));
  }

  #[test]
  #[serial]
  fn test_invalid_timeout_env_is_reported() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    std::fs::write(&path, "{}\n").unwrap();

    env::set_var(ENV_TIMEOUT_SECS, "soon");
    let result = ApiConfig::load(Some(&path));
    clear_env();

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
  }

  #[test]
  #[serial]
  fn test_missing_explicit_file_is_an_error() {
    clear_env();
    let result = ApiConfig::load(Some(Path::new("/definitely/not/here.yaml")));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
  }

  #[test]
  fn test_malformed_yaml_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    std::fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();

    assert!(matches!(ApiConfig::load_from_file(&path), Err(ConfigError::Parse { .. })));
  }
}
