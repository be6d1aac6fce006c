/// Block reward sender
///
/// Watches `/blocks/last` and pays a fixed reward to the generator of every
/// new block. The height is recorded before the transfer goes out, so a
/// failed broadcast is never retried for the same block.

use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use kss_core::crypto::{Account, Address, AddressError};
use kss_core::tx::{Transfer, TxError};
use kss_core::{BlockRef, ChainApi, NodeError};

#[derive(Debug, Error)]
pub enum RewardError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("insufficient balance: need {needed} units, have {available}")]
    InsufficientBalance { needed: u64, available: i64 },

    #[error("invalid generator address {generator:?}: {source}")]
    InvalidGenerator {
        generator: String,
        #[source]
        source: AddressError,
    },

    #[error("cannot build transfer: {0}")]
    Tx(#[from] TxError),
}

impl RewardError {
    /// A non-recoverable error means the reward settings themselves are
    /// unusable and the loop must stop.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RewardError::Node(e) => e.is_recoverable(),
            RewardError::InsufficientBalance { .. } => true,
            RewardError::InvalidGenerator { .. } => true,
            RewardError::Tx(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RewardError::Node(e) => e.kind(),
            RewardError::InsufficientBalance { .. } => "balance",
            RewardError::InvalidGenerator { .. } => "generator",
            RewardError::Tx(_) => "tx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSettings {
    pub amount: u64,
    pub fee: u64,
    pub attachment: Vec<u8>,
    pub poll_interval: Duration,
    pub dry_run: bool,
}

/// A reward that was signed (and, unless dry-run, broadcast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub height: u64,
    pub generator: Address,
    pub amount: u64,
    pub tx_id: String,
    pub broadcast: bool,
}

pub struct RewardSender<C> {
    chain: C,
    account: Account,
    settings: RewardSettings,
    last_height: Option<u64>,
}

impl<C: ChainApi> RewardSender<C> {
    pub fn new(chain: C, account: Account, settings: RewardSettings) -> Self {
        Self {
            chain,
            account,
            settings,
            last_height: None,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Most recently observed block height.
    pub fn last_height(&self) -> Option<u64> {
        self.last_height
    }

    /// Remember the current height without paying for it.
    pub async fn prime(&mut self) -> Result<u64, RewardError> {
        let block = self.chain.last_block().await?;
        tracing::info!("Starting at block {} (generator {})", block.height, block.generator);
        self.last_height = Some(block.height);
        Ok(block.height)
    }

    pub async fn poll_once(&mut self) -> Result<Option<Payout>, RewardError> {
        let block = self.chain.last_block().await?;

        let Some(last) = self.last_height else {
            tracing::info!("Starting at block {} (generator {})", block.height, block.generator);
            self.last_height = Some(block.height);
            return Ok(None);
        };

        if block.height == last {
            return Ok(None);
        }

        // always track the latest observed height so the next increase pays
        self.last_height = Some(block.height);
        if block.height < last {
            tracing::warn!(
                "Block height went back from {} to {}, waiting for a new block",
                last,
                block.height
            );
            return Ok(None);
        }

        tracing::info!("New block {} by {}", block.height, block.generator);
        self.pay(&block).await.map(Some)
    }

    async fn pay(&self, block: &BlockRef) -> Result<Payout, RewardError> {
        let generator = Address::parse(&block.generator, self.account.address().chain_id())
            .map_err(|source| RewardError::InvalidGenerator {
                generator: block.generator.clone(),
                source,
            })?;

        let needed = self.settings.amount.saturating_add(self.settings.fee);
        let available = self.chain.balance(self.account.address()).await?;
        if u64::try_from(available).unwrap_or(0) < needed {
            return Err(RewardError::InsufficientBalance { needed, available });
        }

        let timestamp_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let signed = Transfer::new(
            &self.account,
            generator.clone(),
            self.settings.amount,
            self.settings.fee,
            timestamp_ms,
            self.settings.attachment.clone(),
        )?
        .sign(&self.account);

        if self.settings.dry_run {
            tracing::info!(
                "[dry-run] Would send {} units to {} for block {} (tx {})",
                self.settings.amount,
                generator,
                block.height,
                signed.id
            );
            return Ok(Payout {
                height: block.height,
                generator,
                amount: self.settings.amount,
                tx_id: signed.id,
                broadcast: false,
            });
        }

        let receipt = self.chain.broadcast(&signed).await?;
        tracing::info!(
            "Sent {} units to {} for block {}: {}",
            self.settings.amount,
            generator,
            block.height,
            receipt.id
        );

        Ok(Payout {
            height: block.height,
            generator,
            amount: self.settings.amount,
            tx_id: receipt.id,
            broadcast: true,
        })
    }

    /// Poll until `shutdown` resolves or a non-recoverable error occurs.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<(), RewardError> {
        tokio::pin!(shutdown);
        let delay = self.settings.poll_interval;

        loop {
            let outcome = tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.poll_once() => outcome,
            };

            if let Err(e) = outcome {
                if !e.is_recoverable() {
                    return Err(e);
                }
                tracing::error!(kind = e.kind(), "{}", e);
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::info!("Stopped by user");
        Ok(())
    }
}
