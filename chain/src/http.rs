use async_trait::async_trait;
use lodestone_core::{Address, BlockIndex};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::service::{StateError, StateService};

/// State-fetch capability over the node's HTTP state API.
///
/// `GET {base}/state/{address}` reads the legacy top-level account,
/// `GET {base}/state/{account}/{address}` reads a current-layout account and
/// `GET {base}/tip` returns the ledger tip. A 404 is the node's way of
/// saying the address or account does not exist.
#[derive(Clone)]
pub struct HttpStateService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TipResponse {
    index: BlockIndex,
}

impl HttpStateService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<Option<Value>, StateError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(url = %url, "fetching state");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StateError::NotFound);
        }
        if !status.is_success() {
            return Err(StateError::Node(status.as_u16()));
        }

        let value = response.json::<Value>().await?;
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }
}

#[async_trait]
impl StateService for HttpStateService {
    async fn get_state(&self, address: Address) -> Result<Option<Value>, StateError> {
        self.get_json(&format!("state/{}", address.to_hex())).await
    }

    async fn get_account_state(
        &self,
        address: Address,
        account: Address,
    ) -> Result<Option<Value>, StateError> {
        self.get_json(&format!("state/{}/{}", account.to_hex(), address.to_hex()))
            .await
    }

    async fn get_tip(&self) -> Result<BlockIndex, StateError> {
        let url = format!("{}/tip", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StateError::Node(status.as_u16()));
        }
        let tip = response.json::<TipResponse>().await?;
        Ok(tip.index)
    }
}
