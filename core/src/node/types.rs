use serde::Deserialize;
use std::collections::BTreeMap;

/// Address → raw unit balance, as returned by `/debug/state`.
///
/// Ordered so that iteration, and anything derived from it, is deterministic.
pub type BalanceSnapshot = BTreeMap<String, i64>;

/// The two fields of a block the tools care about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockRef {
    pub height: u64,
    pub generator: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AddressBalance {
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastReceipt {
    pub id: String,
}

/// Error body the node returns alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub(crate) fn describe(raw: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(raw) {
            Ok(ApiErrorBody {
                message: Some(m),
                error,
            }) => match error {
                Some(code) => format!("{m} (code {code})"),
                None => m,
            },
            _ => raw.chars().take(200).collect(),
        }
    }
}
