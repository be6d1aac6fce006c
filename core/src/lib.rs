//! Shared building blocks for the KSS node tools: node HTTP client,
//! accounts and addresses, transfer transactions, configuration and logging.

pub mod config;
pub mod crypto;
pub mod error;
pub mod node;
pub mod telemetry;
pub mod tx;
pub mod units;

pub use config::NodeConfig;
pub use error::{ConfigError, NodeError};
pub use node::{BalanceSnapshot, BalanceSource, BlockRef, BroadcastReceipt, ChainApi, NodeClient};
