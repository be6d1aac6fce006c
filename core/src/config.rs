/// Shared configuration
///
/// Every tool layers its settings the same way:
///   1. built-in defaults
///   2. optional TOML file (`--config`)
///   3. `KSS_*` environment variables
///   4. command-line flags
///
/// This module holds the node section shared by both tools plus the helpers
/// for steps 2 and 3.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

use crate::crypto::KSS_CHAIN_ID;
use crate::error::ConfigError;

pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:6869";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct NodeConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Single ASCII character, e.g. "N" for KrossChain.
    pub chain_id: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NODE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chain_id: (KSS_CHAIN_ID as char).to_string(),
        }
    }
}

impl NodeConfig {
    pub fn apply_env(&mut self) {
        if let Some(v) = env_nonempty("KSS_NODE_URL") {
            self.url = v;
        }
        if let Some(v) = env_nonempty("KSS_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = env_nonempty("KSS_NODE_TIMEOUT") {
            match v.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid KSS_NODE_TIMEOUT={}", v),
            }
        }
        if let Some(v) = env_nonempty("KSS_CHAIN_ID") {
            self.chain_id = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::NodeUrl(self.url.clone()));
        }
        self.chain_id_byte()?;
        Ok(())
    }

    pub fn chain_id_byte(&self) -> Result<u8, ConfigError> {
        parse_chain_id(&self.chain_id)
    }
}

pub fn parse_chain_id(s: &str) -> Result<u8, ConfigError> {
    match s.trim().as_bytes() {
        [b] if b.is_ascii_graphic() => Ok(*b),
        _ => Err(ConfigError::ChainId(s.to_string())),
    }
}

/// Read an environment variable, treating blank values as unset.
pub fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load a TOML config file, or the type's defaults when no path is given.
pub fn load_toml<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, ConfigError> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
