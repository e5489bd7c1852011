use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::address::Address;
use crate::store::ContentRef;

use super::{CapsuleRecord, Ledger, LedgerError, TxReceipt};

/// HTTP client for a ledger node.
///
/// The node fronts the capsule contract: reads are plain `GET`s against the
/// public mapping, writes are `POST`ed transactions submitted as the
/// session account. The contract address and account travel with every
/// call; how the node authenticates the account is its business.
#[derive(Debug, Clone)]
pub struct RpcLedger {
    client: Client,
    base_url: Url,
    contract: Address,
    account: Address,
}

#[derive(Debug, Serialize)]
struct CreateTx<'a> {
    from: &'a Address,
    content_ref: &'a ContentRef,
    unlock_time: i64,
}

#[derive(Debug, Serialize)]
struct OpenTx<'a> {
    from: &'a Address,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    tx_hash: String,
}

impl RpcLedger {
    pub fn new(
        base_url: impl AsRef<str>,
        contract: Address,
        account: Address,
    ) -> Result<Self, LedgerError> {
        let raw = base_url.as_ref();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            contract,
            account,
        })
    }

    /// Derive a handle submitting as another account against the same node
    /// and contract.
    pub fn session(&self, account: Address) -> Self {
        Self {
            account,
            ..self.clone()
        }
    }

    fn url(&self, path: &str) -> Result<Url, LedgerError> {
        self.base_url
            .join(&format!("contracts/{}/{}", self.contract, path))
            .map_err(|e| LedgerError::Transport(e.to_string()))
    }

    async fn submit(&self, request: reqwest::RequestBuilder) -> Result<TxReceipt, LedgerError> {
        let response = request
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(LedgerError::AlreadyOpened);
        }
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected(format!("{}: {}", status, reason)));
        }
        let tx: TxResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(TxReceipt::new(tx.tx_hash))
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    fn account(&self) -> &Address {
        &self.account
    }

    async fn record(&self, owner: &Address) -> Result<Option<CapsuleRecord>, LedgerError> {
        let url = self.url(&format!("capsules/{}", owner))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected(format!("{}: {}", status, reason)));
        }

        let record: CapsuleRecord = response
            .json()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        // some nodes answer the mapping's zero value instead of 404
        if record.content_ref.is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn create(
        &self,
        content_ref: &ContentRef,
        unlock_time: i64,
    ) -> Result<TxReceipt, LedgerError> {
        let url = self.url("capsules")?;
        let tx = CreateTx {
            from: &self.account,
            content_ref,
            unlock_time,
        };
        tracing::debug!(account = %self.account, %content_ref, unlock_time, "submitting create");
        self.submit(self.client.post(url).json(&tx)).await
    }

    async fn open(&self) -> Result<TxReceipt, LedgerError> {
        let url = self.url(&format!("capsules/{}/open", self.account))?;
        let tx = OpenTx {
            from: &self.account,
        };
        tracing::debug!(account = %self.account, "submitting open");
        self.submit(self.client.post(url).json(&tx)).await
    }

    async fn open_on_behalf(&self, owner: &Address) -> Result<TxReceipt, LedgerError> {
        let url = self.url(&format!("capsules/{}/open", owner))?;
        let tx = OpenTx {
            from: &self.account,
        };
        tracing::debug!(account = %self.account, %owner, "submitting open on behalf");
        self.submit(self.client.post(url).json(&tx)).await
    }
}
