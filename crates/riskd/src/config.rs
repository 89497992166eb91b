//! Configuration management for riskd.
//!
//! Loads settings from an explicit path, /etc/riskd/config.toml or
//! ./riskd.toml, falling back to defaults. Environment variables are applied
//! on top of whatever was loaded.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// System-wide config file path
pub const CONFIG_PATH: &str = "/etc/riskd/config.toml";

/// Working-directory config file path
pub const LOCAL_CONFIG_PATH: &str = "riskd.toml";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "RISKD_ACCESS_TOKEN";
pub const ENV_BIND_ADDR: &str = "RISKD_BIND_ADDR";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Shared secret expected in `X-ACCESS-TOKEN`; gate is off when unset
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Browser game assets served at `/`
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            access_token: None,
            max_body_bytes: default_max_body_bytes(),
            static_dir: None,
        }
    }
}

/// Narrative collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_enabled")]
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound for one narrative round-trip
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_llm_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing filter; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Load config and apply environment overrides.
    ///
    /// An explicit path must exist and parse. Without one, the standard
    /// locations are tried and defaults are used if neither is readable.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_from_path(Path::new(CONFIG_PATH))
                .or_else(|_| Self::load_from_path(Path::new(LOCAL_CONFIG_PATH)))
                .unwrap_or_else(|e| {
                    warn!("Config not found, using defaults: {}", e);
                    Config::default()
                }),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.server.access_token = Some(token);
        }
        if let Some(addr) = get(ENV_BIND_ADDR) {
            self.server.bind_addr = addr;
        }
    }
}

/// Mask a secret for logging (show first 4 chars only)
pub fn mask_secret(secret: &str) -> String {
    if secret.len() > 8 {
        format!("{}...", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.bind_addr, "0.0.0.0:5000");
        assert!(config.server.access_token.is_none());
        assert_eq!(config.server.max_body_bytes, 65536);
        assert!(config.llm.enabled);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.endpoint, "https://api.openai.com");
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[llm]
model = "gpt-4o-mini"
timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 5);
        assert_eq!(config.llm.endpoint, "https://api.openai.com");
        assert_eq!(config.server.bind_addr, "0.0.0.0:5000");
    }

    #[test]
    fn test_full_toml() {
        let toml_str = r#"
log_level = "debug"

[server]
bind_addr = "127.0.0.1:8080"
access_token = "s3cret"
max_body_bytes = 1024
static_dir = "static"

[llm]
enabled = false
endpoint = "http://localhost:11434"
model = "llama3.2:3b"
api_key = "sk-test"
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.server.access_token.as_deref(), Some("s3cret"));
        assert_eq!(config.server.max_body_bytes, 1024);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("static")));
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind_addr = \"127.0.0.1:9000\"").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind_addr = ").unwrap();
        assert!(Config::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "sk-from-env"),
            (ENV_ACCESS_TOKEN, "token-from-env"),
            (ENV_BIND_ADDR, "127.0.0.1:7000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.server.access_token.as_deref(), Some("token-from-env"));
        assert_eq!(config.server.bind_addr, "127.0.0.1:7000");
    }

    #[test]
    fn test_empty_override_ignored() {
        let mut config = Config::default();
        config.server.access_token = Some("kept".to_string());
        config.apply_overrides(|k| (k == ENV_ACCESS_TOKEN).then(|| "  ".to_string()));
        assert_eq!(config.server.access_token.as_deref(), Some("kept"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret("12345678"), "***");
        assert_eq!(mask_secret("sk-1234567890"), "sk-1...");
    }
}
