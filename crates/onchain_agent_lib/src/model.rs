use serde::{Deserialize, Serialize};

pub const DEFAULT_FUNCTION_NAME: &str = "Transfer";

/// Response envelope of the explorer `account/txlist` call.
///
/// `result` stays untyped because a failed call carries an error string in
/// place of the record list.
#[derive(Deserialize, Debug, Clone)]
pub struct ExplorerResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    pub value: String,
    pub gas_price: String,
    pub gas_used: String,
    pub time_stamp: String,
    pub block_number: String,
    #[serde(default)]
    pub method_id: Option<String>,
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation
    pub to: Option<String>,
    pub value: String,
    pub gas_price: String,
    pub gas_used: String,
    /// ISO-8601, UTC, millisecond precision
    pub timestamp: String,
    pub block_number: String,
    /// As sent by the provider, `None` only when the field is absent
    pub method_id: Option<String>,
    pub function_name: String,
    pub contract_address: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub tx_hash: String,
    pub summary: String,
    pub analysis: String,
    pub timestamp: String,
}
