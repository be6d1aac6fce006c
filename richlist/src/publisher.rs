/// Rich list publishing loop
///
/// One cycle = fetch snapshot → rank → print table → write artifact.
/// A failed cycle (including an empty snapshot) writes nothing and is
/// retried after a short delay; a successful one waits for the regular
/// update interval.

use chrono::Utc;
use rust_decimal::Decimal;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use kss_core::units::format_kss;
use kss_core::{BalanceSource, NodeError};

use crate::artifact::write_artifact;
use crate::ranking::build_rich_list;
use crate::report::render_table;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("error fetching rich list: {0}")]
    Fetch(#[from] NodeError),

    #[error("node returned an empty balance snapshot")]
    EmptySnapshot,

    #[error("error writing {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    /// Every failure is retried on the next cycle.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PublishError::Fetch(e) => e.is_recoverable(),
            PublishError::EmptySnapshot | PublishError::Write { .. } => true,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PublishError::Fetch(e) => e.kind(),
            PublishError::EmptySnapshot => "empty",
            PublishError::Write { .. } => "io",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub holder_count: usize,
    pub total_balance: Decimal,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub update_interval: Duration,
    pub retry_delay: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(3600),
            retry_delay: Duration::from_secs(60),
        }
    }
}

impl Schedule {
    pub fn delay_after<T>(&self, outcome: &Result<T, PublishError>) -> Duration {
        match outcome {
            Ok(_) => self.update_interval,
            Err(_) => self.retry_delay,
        }
    }
}

pub struct Publisher<S> {
    source: S,
    output: PathBuf,
    address_length: usize,
    print_table: bool,
}

impl<S: BalanceSource> Publisher<S> {
    pub fn new(source: S, output: PathBuf, address_length: usize) -> Self {
        Self {
            source,
            output,
            address_length,
            print_table: true,
        }
    }

    /// Disable the stdout table (tests, quiet runs).
    pub fn quiet(mut self) -> Self {
        self.print_table = false;
        self
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    pub async fn run_cycle(&self) -> Result<CycleReport, PublishError> {
        let snapshot = self.source.balance_snapshot().await?;
        // a node that has not loaded its state answers with `{}`
        if snapshot.is_empty() {
            return Err(PublishError::EmptySnapshot);
        }
        tracing::debug!("Fetched {} state entries", snapshot.len());

        let list = build_rich_list(&snapshot, self.address_length, Utc::now());
        if self.print_table {
            print!("{}", render_table(&list));
        }

        write_artifact(&self.output, &list).map_err(|source| PublishError::Write {
            path: self.output.display().to_string(),
            source,
        })?;

        tracing::info!(
            "Rich list saved to {} ({} holders, total {} KSS)",
            self.output.display(),
            list.holder_count,
            format_kss(list.total_balance)
        );
        if let Some(dir) = self.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            tracing::info!(
                "Serve {} with any static file server to publish the list",
                dir.display()
            );
        }

        Ok(CycleReport {
            holder_count: list.holder_count,
            total_balance: list.total_balance,
            path: self.output.clone(),
        })
    }

    /// Run cycles until `shutdown` resolves.
    pub async fn run(&self, schedule: Schedule, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        loop {
            let outcome = tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.run_cycle() => outcome,
            };

            let delay = schedule.delay_after(&outcome);
            match &outcome {
                Ok(_) => tracing::info!("Waiting {} seconds until next update...", delay.as_secs()),
                Err(e) => {
                    tracing::error!(kind = e.kind(), "{}", e);
                    tracing::info!("Retrying in {} seconds...", delay.as_secs());
                }
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::info!("Stopped by user");
    }
}
