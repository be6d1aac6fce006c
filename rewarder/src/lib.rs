//! KSS block reward sender.

pub mod config;
pub mod sender;

pub use config::RewarderConfig;
pub use sender::{Payout, RewardError, RewardSender, RewardSettings};
