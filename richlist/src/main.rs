// KSS rich list publisher
//
// Fetches /debug/state from a KSS node every update interval, prints the
// ranked holder table and writes data/kss_richlist.json for a static server.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use kss_core::{telemetry, NodeClient};
use kss_richlist::{Publisher, RichListConfig};

#[derive(Parser, Debug)]
#[command(name = "kss-richlist", version, about = "Publish the KSS rich list as JSON")]
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

    /// Output JSON path (overrides KSS_RICHLIST_OUTPUT)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds between successful updates
    #[arg(long)]
    interval: Option<u64>,

    /// Seconds to wait after a failed update
    #[arg(long)]
    retry_delay: Option<u64>,

    /// Only addresses of exactly this many characters are ranked
    #[arg(long)]
    address_length: Option<usize>,

    /// Publish once and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn apply(self, cfg: &mut RichListConfig) {
        if let Some(v) = self.node {
            cfg.node.url = v;
        }
        if let Some(v) = self.api_key {
            cfg.node.api_key = Some(v);
        }
        if let Some(v) = self.output {
            cfg.output = v;
        }
        if let Some(v) = self.interval {
            cfg.update_interval_secs = v;
        }
        if let Some(v) = self.retry_delay {
            cfg.retry_delay_secs = v;
        }
        if let Some(v) = self.address_length {
            cfg.address_length = v;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init(args.verbose);

    let once = args.once;
    let mut cfg = RichListConfig::load(args.config.as_deref()).context("loading config")?;
    args.apply(&mut cfg);
    cfg.validate().context("invalid configuration")?;

    let client = NodeClient::new(&cfg.node).context("building node client")?;
    tracing::info!("KSS rich list publisher starting (node {})", client.base_url());

    let publisher = Publisher::new(client, cfg.output.clone(), cfg.address_length);

    if once {
        let report = publisher.run_cycle().await?;
        tracing::info!("Published {} holders", report.holder_count);
        return Ok(());
    }

    publisher
        .run(cfg.schedule(), async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}
