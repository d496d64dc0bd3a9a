//! Service configuration.
//!
//! Configuration is an explicit [`AppConfig`] value built once at startup and
//! handed to the components that need it. It is assembled in three layers:
//!
//! ```text
//! stock defaults  →  <config-dir>/larisin.toml  →  environment variables
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! body_limit_mb = 10        # Max JSON request body
//!
//! [paths]
//! public_dir = "public"     # Served at "/"; generated files go to public/outputs
//!
//! [llm]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! timeout_secs = 60
//! # api_key = "sk-..."      # Usually supplied as LLM_API_KEY instead
//!
//! [render]
//! # executable_path = "/usr/bin/chromium"
//! timeout_secs = 30
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |---|---|
//! | `LLM_BASE_URL` | `llm.base_url` |
//! | `LLM_API_KEY` | `llm.api_key` |
//! | `LLM_MODEL` | `llm.model` |
//! | `CHROME_EXECUTABLE_PATH` | `render.executable_path` |
//! | `PORT` | `server.port` |
//!
//! An absent or blank API key is not an error: it switches the text
//! generator to its offline echo. Unknown keys in the file are rejected to
//! catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up inside the config directory.
pub const CONFIG_FILENAME: &str = "larisin.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub llm: LlmConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.body_limit_mb == 0 {
            return Err(ConfigError::Validation(
                "server.body_limit_mb must be non-zero".into(),
            ));
        }
        if self.llm.timeout_secs == 0 || self.render.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs values must be non-zero".into(),
            ));
        }
        if !(self.llm.base_url.starts_with("http://") || self.llm.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "llm.base_url must be an http(s) URL, got {:?}",
                self.llm.base_url
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".into()));
        }
        Ok(())
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Taking a lookup function instead of reading the process environment
    /// keeps this testable without mutating global state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(key) = lookup("LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(path) = lookup("CHROME_EXECUTABLE_PATH")
            && !path.trim().is_empty()
        {
            self.render.executable_path = Some(PathBuf::from(path));
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT is not a port: {port:?}")))?;
        }
        Ok(())
    }

    /// Directory generated files are written to.
    pub fn outputs_dir(&self) -> PathBuf {
        self.paths.public_dir.join(crate::naming::OUTPUTS_SEGMENT)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum JSON request body in megabytes.
    pub body_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_mb: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Root of everything served over HTTP. Generated files live in `outputs/` below it.
    pub public_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Text-generation endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// The API key, `None` when absent or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Chrome/Chromium binary. When absent the browser is auto-detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<PathBuf>,
    /// Upper bound for each page load and capture.
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            executable_path: None,
            timeout_secs: 30,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `larisin.toml` from `dir` as a raw TOML value, `Ok(None)` if absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the file layer and environment layer on top of stock defaults, then validate.
pub fn load_config<F>(dir: &Path, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let mut config: AppConfig = merged.try_into()?;
    config.apply_env(env)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `larisin.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# larisin configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Environment variables override this file:
#   LLM_BASE_URL, LLM_API_KEY, LLM_MODEL, CHROME_EXECUTABLE_PATH, PORT
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 3000

# Maximum JSON request body, in megabytes.
body_limit_mb = 10

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# Served at "/". Generated posters and zip bundles are written to
# <public_dir>/outputs and returned as /outputs/<file>.
public_dir = "public"

# ---------------------------------------------------------------------------
# Text generation (OpenAI-compatible chat completions)
# ---------------------------------------------------------------------------
[llm]
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
timeout_secs = 60

# Without a key, captions are an offline echo of the prompt ("MOCK: ...").
# api_key = "sk-..."

# ---------------------------------------------------------------------------
# Poster rendering (headless Chrome)
# ---------------------------------------------------------------------------
[render]
# Omit to auto-detect an installed Chrome/Chromium.
# executable_path = "/usr/bin/chromium"
timeout_secs = 30
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key(), None);
        assert_eq!(config.render.executable_path, None);
        assert_eq!(config.outputs_dir(), PathBuf::from("public/outputs"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), no_env).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_reads_partial_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[llm]
model = "llama3"

[paths]
public_dir = "/srv/larisin"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), no_env).unwrap();
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.paths.public_dir, PathBuf::from("/srv/larisin"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[llm]\nmodel = \"from-file\"\n",
        )
        .unwrap();

        let env = env_of(&[
            ("LLM_MODEL", "from-env"),
            ("LLM_API_KEY", "sk-live"),
            ("LLM_BASE_URL", "http://localhost:11434/v1"),
            ("CHROME_EXECUTABLE_PATH", "/opt/chrome"),
            ("PORT", "8080"),
        ]);
        let config = load_config(tmp.path(), env).unwrap();
        assert_eq!(config.llm.model, "from-env");
        assert_eq!(config.llm.api_key(), Some("sk-live"));
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(
            config.render.executable_path,
            Some(PathBuf::from("/opt/chrome"))
        );
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn blank_env_key_stays_offline() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[("LLM_API_KEY", "")])).unwrap();
        assert_eq!(config.llm.api_key(), None);
    }

    #[test]
    fn bad_port_is_validation_error() {
        let mut config = AppConfig::default();
        let result = config.apply_env(env_of(&[("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path(), no_env);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[llm]\nmodle = \"x\"\n").unwrap();
        let err = load_config(tmp.path(), no_env).unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = AppConfig::default();
        config.llm.base_url = "ftp://example.com".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[llm]\nmodel = \"a\"\ntimeout_secs = 60\n").unwrap();
        let overlay: toml::Value = toml::from_str("[llm]\nmodel = \"b\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let llm = merged.get("llm").unwrap();
        assert_eq!(llm.get("model").unwrap().as_str(), Some("b"));
        assert_eq!(llm.get("timeout_secs").unwrap().as_integer(), Some(60));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for section in ["server", "paths", "llm", "render"] {
            assert!(val.get(section).is_some(), "{section}");
        }
    }
}
