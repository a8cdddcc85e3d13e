//! Process configuration, read once from the environment at startup.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Field names are the lowercased environment variable names.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// `None` when `ANTHROPIC_API_KEY` is unset; diagnosis requests then fail upstream.
    #[serde(rename = "anthropic_api_key", default)]
    pub api_key: Option<SecretString>,
    #[serde(rename = "anthropic_base_url", default = "default_base_url")]
    pub base_url: String,
    #[serde(rename = "anthropic_model", default = "default_model")]
    pub model: String,
    #[serde(rename = "anthropic_max_tokens", default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_DIR)
}

impl Config {
    pub fn from_env() -> Result<Self, ::config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(::config::Environment::default())
    }

    /// Loads from the given `KEY=value` pairs instead of the process
    /// environment.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, ::config::ConfigError> {
        let source: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::load(::config::Environment::default().source(Some(source)))
    }

    fn load(env: ::config::Environment) -> Result<Self, ::config::ConfigError> {
        let mut config: Config = ::config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if config
            .api_key
            .as_ref()
            .is_some_and(|key| key.expose_secret().trim().is_empty())
        {
            config.api_key = None;
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_pairs(&[]).unwrap();

        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_pairs(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_BASE_URL", "http://127.0.0.1:9999/"),
            ("ANTHROPIC_MAX_TOKENS", "512"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();

        assert_eq!(config.api_key.unwrap().expose_secret(), "sk-test");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::from_pairs(&[("ANTHROPIC_API_KEY", "  ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn bad_number_is_rejected() {
        assert!(Config::from_pairs(&[("MAX_UPLOAD_BYTES", "lots")]).is_err());
    }

    #[test]
    fn secret_stays_out_of_debug_output() {
        let config = Config::from_pairs(&[("ANTHROPIC_API_KEY", "sk-very-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("sk-very-secret"));
    }
}
