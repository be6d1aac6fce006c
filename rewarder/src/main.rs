// KSS block reward sender
//
// Polls /blocks/last and sends a fixed thank-you transfer to the generator of
// every new block, signed locally with the configured seed.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use kss_core::crypto::Account;
use kss_core::{telemetry, NodeClient};
use kss_rewarder::{RewardSender, RewardSettings, RewarderConfig};

#[derive(Parser, Debug)]
#[command(name = "kss-rewarder", version, about = "Reward KSS block generators")]
struct Args {
    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node REST endpoint (overrides KSS_NODE_URL)
    #[arg(long)]
    node: Option<String>,

    /// Node API key (overrides KSS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Sender seed phrase (prefer KSS_SEED)
    #[arg(long)]
    seed: Option<String>,

    /// Account nonce for the seed
    #[arg(long)]
    nonce: Option<u32>,

    /// Reward amount in units (1 KSS = 100000000)
    #[arg(long)]
    amount: Option<u64>,

    /// Transfer fee in units
    #[arg(long)]
    fee: Option<u64>,

    /// Attachment text sent with each reward
    #[arg(long)]
    attachment: Option<String>,

    /// Seconds between polls
    #[arg(long)]
    interval: Option<u64>,

    /// Sign transfers but do not broadcast them
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn apply(self, cfg: &mut RewarderConfig) {
        if let Some(v) = self.node {
            cfg.node.url = v;
        }
        if let Some(v) = self.api_key {
            cfg.node.api_key = Some(v);
        }
        if let Some(v) = self.seed {
            cfg.seed = Some(v);
        }
        if let Some(v) = self.nonce {
            cfg.nonce = v;
        }
        if let Some(v) = self.amount {
            cfg.amount = v;
        }
        if let Some(v) = self.fee {
            cfg.fee = v;
        }
        if let Some(v) = self.attachment {
            cfg.attachment = v;
        }
        if let Some(v) = self.interval {
            cfg.poll_interval_secs = v;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init(args.verbose);

    let mut cfg = RewarderConfig::load(args.config.as_deref()).context("loading config")?;
    args.apply(&mut cfg);
    cfg.validate().context("invalid configuration")?;

    let chain_id = cfg.node.chain_id_byte()?;
    let account = Account::from_seed(cfg.seed()?, cfg.nonce, chain_id).context("deriving sender account")?;
    let client = NodeClient::new(&cfg.node).context("building node client")?;

    tracing::info!(
        "KSS reward sender starting: {} pays {} units per block (node {})",
        account.address(),
        cfg.amount,
        client.base_url()
    );
    if cfg.dry_run {
        tracing::warn!("Dry run: transfers are signed but not broadcast");
    }

    let settings = RewardSettings {
        amount: cfg.amount,
        fee: cfg.fee,
        attachment: cfg.attachment.clone().into_bytes(),
        poll_interval: cfg.poll_interval(),
        dry_run: cfg.dry_run,
    };
    let mut sender = RewardSender::new(client, account, settings);

    // if the node is down the first successful poll primes instead
    if let Err(e) = sender.prime().await {
        tracing::warn!("Could not read the current block yet: {}", e);
    }

    sender
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
