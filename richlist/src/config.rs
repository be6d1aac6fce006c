use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kss_core::config::{env_nonempty, load_toml};
use kss_core::{ConfigError, NodeConfig};

use crate::artifact::DEFAULT_OUTPUT;
use crate::publisher::Schedule;
use crate::ranking::DEFAULT_ADDRESS_LENGTH;

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct RichListConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_address_length")]
    pub address_length: usize,
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: u64,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}
fn default_address_length() -> usize {
    DEFAULT_ADDRESS_LENGTH
}
fn default_update_interval() -> u64 {
    3600
}
fn default_retry_delay() -> u64 {
    60
}

impl Default for RichListConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            output: default_output(),
            address_length: default_address_length(),
            update_interval_secs: default_update_interval(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

impl RichListConfig {
    /// Defaults, then the TOML file (if any), then `KSS_*` environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg: Self = load_toml(path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        self.node.apply_env();
        if let Some(v) = env_nonempty("KSS_RICHLIST_OUTPUT") {
            self.output = PathBuf::from(v);
        }
        if let Some(v) = env_nonempty("KSS_RICHLIST_INTERVAL") {
            match v.parse() {
                Ok(secs) => self.update_interval_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid KSS_RICHLIST_INTERVAL={}", v),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node.validate()?;
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::Missing("output"));
        }
        if self.address_length == 0 {
            return Err(ConfigError::Invalid {
                name: "address_length",
                reason: "must be greater than zero".into(),
            });
        }
        if self.update_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "update_interval_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.retry_delay_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "retry_delay_secs",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            update_interval: Duration::from_secs(self.update_interval_secs),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}
