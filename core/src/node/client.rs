/// KSS node REST client
///
/// Thin wrapper over `reqwest` that maps every failure onto [`NodeError`]
/// and attaches the optional `api_key` header to every request.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::{AddressBalance, ApiErrorBody, BalanceSnapshot, BlockRef, BroadcastReceipt};
use super::{BalanceSource, ChainApi};
use crate::config::NodeConfig;
use crate::crypto::Address;
use crate::error::{ConfigError, NodeError};
use crate::tx::SignedTransfer;

const API_KEY_HEADER: &str = "api_key";

pub struct NodeClient {
    base_url: String,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(config: &NodeConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key).map_err(|e| ConfigError::Invalid {
                name: "api_key",
                reason: e.to_string(),
            })?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("kss-node-tools/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let base_url = config.url.trim_end_matches('/').to_string();
        tracing::debug!("NodeClient initialized: {}", base_url);

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, NodeError> {
        let response = request
            .send()
            .await
            .map_err(|e| NodeError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NodeError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: ApiErrorBody::describe(&body),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, NodeError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| NodeError::from_reqwest(url, e))?;
        serde_json::from_slice(&body).map_err(|e| NodeError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NodeError> {
        let url = self.url(path);
        let response = self.send(&url, self.http.get(&url)).await?;
        Self::decode(&url, response).await
    }

    /// Full balance snapshot. Requires the node's debug API (and usually the
    /// API key).
    pub async fn debug_state(&self) -> Result<BalanceSnapshot, NodeError> {
        self.get_json("/debug/state").await
    }

    pub async fn get_last_block(&self) -> Result<BlockRef, NodeError> {
        self.get_json("/blocks/last").await
    }

    pub async fn get_balance(&self, address: &Address) -> Result<i64, NodeError> {
        let b: AddressBalance = self
            .get_json(&format!("/addresses/balance/{}", address))
            .await?;
        Ok(b.balance)
    }

    pub async fn broadcast_transfer(
        &self,
        tx: &SignedTransfer,
    ) -> Result<BroadcastReceipt, NodeError> {
        let url = self.url("/transactions/broadcast");
        let request = self.http.post(&url).json(&tx.to_json());
        let response = match self.send(&url, request).await {
            Ok(r) => r,
            // 400 from broadcast means the node validated and refused the tx
            Err(NodeError::Http {
                status: 400,
                message,
                ..
            }) => return Err(NodeError::Rejected(message)),
            Err(e) => return Err(e),
        };
        Self::decode(&url, response).await
    }
}

#[async_trait]
impl BalanceSource for NodeClient {
    async fn balance_snapshot(&self) -> Result<BalanceSnapshot, NodeError> {
        self.debug_state().await
    }
}

#[async_trait]
impl ChainApi for NodeClient {
    async fn last_block(&self) -> Result<BlockRef, NodeError> {
        self.get_last_block().await
    }

    async fn balance(&self, address: &Address) -> Result<i64, NodeError> {
        self.get_balance(address).await
    }

    async fn broadcast(&self, tx: &SignedTransfer) -> Result<BroadcastReceipt, NodeError> {
        self.broadcast_transfer(tx).await
    }
}
