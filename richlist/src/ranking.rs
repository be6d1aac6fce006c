/// Rich list ranking, a pure transformation of a balance snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kss_core::units::to_decimal;
use kss_core::BalanceSnapshot;

/// Length of a base58 account address; anything else in `/debug/state`
/// (aliases, asset entries) is skipped.
pub const DEFAULT_ADDRESS_LENGTH: usize = 35;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    pub address: String,
    pub balance: Decimal,
}

/// The published artifact. Field order is the JSON field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichList {
    pub last_updated: String,
    pub holders: Vec<Holder>,
    pub total_balance: Decimal,
    pub holder_count: usize,
}

/// Filter, scale and rank a snapshot.
///
/// Keeps addresses of exactly `address_length` characters with a strictly
/// positive balance, ordered by descending raw balance. Equal balances are
/// ordered by address so the same snapshot always yields the same list.
pub fn build_rich_list(
    snapshot: &BalanceSnapshot,
    address_length: usize,
    now: DateTime<Utc>,
) -> RichList {
    let mut ranked: Vec<(&String, i64)> = snapshot
        .iter()
        .filter(|(address, balance)| address.len() == address_length && **balance > 0)
        .map(|(address, balance)| (address, *balance))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let holders: Vec<Holder> = ranked
        .into_iter()
        .map(|(address, raw)| Holder {
            address: address.clone(),
            balance: to_decimal(raw),
        })
        .collect();
    let total_balance: Decimal = holders.iter().map(|h| h.balance).sum();

    RichList {
        last_updated: now.format(TIMESTAMP_FORMAT).to_string(),
        holder_count: holders.len(),
        holders,
        total_balance,
    }
}
