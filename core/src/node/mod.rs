/// Node HTTP API: the client and the traits the tools are written against.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::crypto::Address;
use crate::error::NodeError;
use crate::tx::SignedTransfer;

pub use client::NodeClient;
pub use types::{BalanceSnapshot, BlockRef, BroadcastReceipt};

/// Source of full account-balance snapshots (`/debug/state`).
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn balance_snapshot(&self) -> Result<BalanceSnapshot, NodeError>;
}

/// Block and transaction access needed to pay block generators.
#[async_trait]
pub trait ChainApi: Send + Sync {
    async fn last_block(&self) -> Result<BlockRef, NodeError>;

    async fn balance(&self, address: &Address) -> Result<i64, NodeError>;

    async fn broadcast(&self, tx: &SignedTransfer) -> Result<BroadcastReceipt, NodeError>;
}
