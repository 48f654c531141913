use async_trait::async_trait;
use chrono::{SecondsFormat, TimeZone, Utc};
use reqwest::Client;
use std::fmt;

use crate::error::FetchError;
use crate::model::{ExplorerResponse, RawTransaction, Transaction, DEFAULT_FUNCTION_NAME};

pub const TRANSACTION_PAGE_SIZE: u32 = 10;
pub const START_BLOCK: u64 = 0;
pub const END_BLOCK: u64 = 99_999_999;
/// Shared low-rate-limit key used when the caller has none
pub const DEFAULT_FALLBACK_API_KEY: &str = "demo";

const STATUS_OK: &str = "1";

/// Source of the most recent transactions of an address.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(
        &self,
        address: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<Transaction>, FetchError>;
}

/// Client of an Etherscan compatible `account/txlist` endpoint.
#[derive(Clone)]
pub struct ExplorerClient {
    http: Client,
    endpoint: String,
    fallback_api_key: String,
}

// keys stay out of logs
impl fmt::Debug for ExplorerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ExplorerClient {
    pub fn new(
        endpoint: impl Into<String>,
        fallback_api_key: Option<String>,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .build()
            .map_err(|e| FetchError::ClientBuildError(e.to_string()))?;
        Ok(Self::with_http(endpoint, fallback_api_key, http))
    }

    pub fn with_http(
        endpoint: impl Into<String>,
        fallback_api_key: Option<String>,
        http: Client,
    ) -> Self {
        ExplorerClient {
            http,
            endpoint: endpoint.into(),
            fallback_api_key: fallback_api_key
                .unwrap_or_else(|| DEFAULT_FALLBACK_API_KEY.to_string()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn query_params(&self, address: &str, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => self.fallback_api_key.as_str(),
        };
        vec![
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
            ("startblock", START_BLOCK.to_string()),
            ("endblock", END_BLOCK.to_string()),
            ("page", "1".to_string()),
            ("offset", TRANSACTION_PAGE_SIZE.to_string()),
            ("sort", "desc".to_string()),
            ("apikey", api_key.to_string()),
        ]
    }

    /// Fetches up to [`TRANSACTION_PAGE_SIZE`] most recent transactions of
    /// `address`, newest first as ordered by the provider.
    ///
    /// Issues exactly one request. Nothing is retried or cached.
    pub async fn fetch_transactions(
        &self,
        address: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<Transaction>, FetchError> {
        if address.trim().is_empty() {
            return Err(FetchError::EmptyAddress);
        }
        log::debug!(
            "Fetching transactions of {} from {}",
            address,
            self.endpoint
        );
        let body = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(address, api_key))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match decode_transactions(&body) {
            Ok(txs) => {
                log::debug!("Received {} transactions for {}", txs.len(), address);
                Ok(txs)
            }
            Err(err) => {
                log::warn!("Fetching transactions of {} failed: {}", address, err);
                Err(err)
            }
        }
    }
}

#[async_trait]
impl TransactionSource for ExplorerClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<Transaction>, FetchError> {
        ExplorerClient::fetch_transactions(self, address, api_key).await
    }
}

/// Decodes a `txlist` response body and normalizes every record, keeping the
/// provider order.
pub fn decode_transactions(body: &str) -> Result<Vec<Transaction>, FetchError> {
    let response: ExplorerResponse = serde_json::from_str(body)?;
    if response.status != STATUS_OK {
        return Err(FetchError::provider(response.message.as_deref()));
    }
    let raw: Vec<RawTransaction> = serde_json::from_value(response.result)?;
    raw.into_iter().map(normalize_transaction).collect()
}

pub fn normalize_transaction(raw: RawTransaction) -> Result<Transaction, FetchError> {
    let timestamp = unix_seconds_to_iso(&raw.time_stamp).ok_or_else(|| FetchError::Timestamp {
        hash: raw.hash.clone(),
        value: raw.time_stamp.clone(),
    })?;
    Ok(Transaction {
        hash: raw.hash,
        from: raw.from,
        to: non_empty(raw.to),
        value: raw.value,
        gas_price: raw.gas_price,
        gas_used: raw.gas_used,
        timestamp,
        block_number: raw.block_number,
        method_id: raw.method_id,
        function_name: non_empty(raw.function_name)
            .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string()),
        contract_address: non_empty(raw.contract_address),
    })
}

fn unix_seconds_to_iso(seconds: &str) -> Option<String> {
    let seconds = seconds.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
