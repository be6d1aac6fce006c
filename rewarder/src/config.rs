use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use kss_core::config::{env_nonempty, load_toml};
use kss_core::tx::{DEFAULT_TRANSFER_FEE, MAX_ATTACHMENT_BYTES};
use kss_core::{ConfigError, NodeConfig};

pub const DEFAULT_REWARD_AMOUNT: u64 = 500_000;
pub const DEFAULT_ATTACHMENT: &str = "Thanks for running a node";

#[derive(Deserialize, Clone, PartialEq)]
pub struct RewarderConfig {
    #[serde(default)]
    pub node: NodeConfig,
    /// Sender seed phrase. Prefer `KSS_SEED` over putting it in a file.
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub nonce: u32,
    #[serde(default = "default_amount")]
    pub amount: u64,
    #[serde(default = "default_fee")]
    pub fee: u64,
    #[serde(default = "default_attachment")]
    pub attachment: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_amount() -> u64 {
    DEFAULT_REWARD_AMOUNT
}
fn default_fee() -> u64 {
    DEFAULT_TRANSFER_FEE
}
fn default_attachment() -> String {
    DEFAULT_ATTACHMENT.to_string()
}
fn default_poll_interval() -> u64 {
    2
}

impl Default for RewarderConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            seed: None,
            nonce: 0,
            amount: default_amount(),
            fee: default_fee(),
            attachment: default_attachment(),
            poll_interval_secs: default_poll_interval(),
            dry_run: false,
        }
    }
}

// seed must never reach the logs
impl fmt::Debug for RewarderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewarderConfig")
            .field("node", &self.node)
            .field("seed", &self.seed.as_ref().map(|_| "<redacted>"))
            .field("nonce", &self.nonce)
            .field("amount", &self.amount)
            .field("fee", &self.fee)
            .field("attachment", &self.attachment)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RewarderConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg: Self = load_toml(path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        self.node.apply_env();
        if let Some(v) = env_nonempty("KSS_SEED") {
            self.seed = Some(v);
        }
        if let Some(v) = env_nonempty("KSS_REWARD_AMOUNT") {
            match v.parse() {
                Ok(amount) => self.amount = amount,
                Err(_) => tracing::warn!("Ignoring invalid KSS_REWARD_AMOUNT={}", v),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node.validate()?;
        self.seed()?;
        if self.amount == 0 {
            return Err(ConfigError::Invalid {
                name: "amount",
                reason: "must be greater than zero".into(),
            });
        }
        if self.amount.checked_add(self.fee).is_none() {
            return Err(ConfigError::Invalid {
                name: "fee",
                reason: "amount plus fee overflows".into(),
            });
        }
        if self.attachment.len() > MAX_ATTACHMENT_BYTES {
            return Err(ConfigError::Invalid {
                name: "attachment",
                reason: format!("{} bytes, maximum is {}", self.attachment.len(), MAX_ATTACHMENT_BYTES),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "poll_interval_secs",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// The configured seed; blank counts as missing.
    pub fn seed(&self) -> Result<&str, ConfigError> {
        self.seed
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("seed (set KSS_SEED or --seed)"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_seed() -> RewarderConfig {
        RewarderConfig {
            seed: Some("reward sender seed".into()),
            ..RewarderConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = RewarderConfig::default();
        assert_eq!(cfg.amount, 500_000);
        assert_eq!(cfg.fee, 100_000);
        assert_eq!(cfg.attachment, "Thanks for running a node");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(2));
        assert!(!cfg.dry_run);
    }

    #[test]
    fn test_missing_seed_rejected() {
        let cfg = RewarderConfig::default();
        assert!(matches!(cfg.validate(), Err(ConfigError::Missing(_))));

        let blank = RewarderConfig {
            seed: Some("   ".into()),
            ..RewarderConfig::default()
        };
        assert!(matches!(blank.validate(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_valid_with_seed() {
        assert!(with_seed().validate().is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let cfg = RewarderConfig {
            amount: 0,
            ..with_seed()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { name: "amount", .. })));
    }

    #[test]
    fn test_long_attachment_rejected() {
        let cfg = RewarderConfig {
            attachment: "x".repeat(141),
            ..with_seed()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { name: "attachment", .. })
        ));
    }

    #[test]
    fn test_debug_hides_seed() {
        let dbg = format!("{:?}", with_seed());
        assert!(!dbg.contains("reward sender seed"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn test_toml_overrides() {
        let cfg: RewarderConfig = toml::from_str(
            r#"
            amount = 1000000
            attachment = "gm"

            [node]
            chain_id = "T"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.amount, 1_000_000);
        assert_eq!(cfg.attachment, "gm");
        assert_eq!(cfg.fee, 100_000);
        assert_eq!(cfg.node.chain_id, "T");
    }
}
