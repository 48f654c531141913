use onchain_agent_lib::error::AgentError;
use onchain_agent_lib::wallet::{SecretKeyConnector, WalletConnector, WatchOnlyConnector};
use std::env;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct TransactionsOptions {
    #[structopt(long = "chain-name", default_value = "mainnet")]
    pub chain_name: String,

    #[structopt(
        long = "connector",
        help = "Wallet connector to use: watch-only or secret-key (ETH_PRIVATE_KEY)"
    )]
    pub connector: Option<String>,

    #[structopt(long = "address", help = "Address for the watch-only connector")]
    pub address: Option<String>,

    #[structopt(
        long = "api-key",
        help = "Explorer API key, ETHERSCAN_API_KEY or the chain fallback key is used when not set"
    )]
    pub api_key: Option<String>,
}

#[derive(Debug, StructOpt)]
pub struct AnalyzeOptions {
    #[structopt(long = "tx-hash")]
    pub tx_hash: String,

    #[structopt(long = "llm-api-key", help = "Key of the text generation service")]
    pub llm_api_key: String,

    #[structopt(long = "chain-name", help = "Chain used for the explorer link")]
    pub chain_name: Option<String>,
}

#[derive(Debug, StructOpt)]
pub struct UnitsOptions {
    #[structopt(long = "wei", help = "Amount in wei")]
    pub wei: String,
}

#[derive(Debug, StructOpt)]
pub struct ServeOptions {
    #[structopt(long = "http-addr", default_value = "127.0.0.1")]
    pub http_addr: String,

    #[structopt(long = "http-port", default_value = "8080")]
    pub http_port: u16,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// List recent transactions of the connected wallet
    #[structopt(name = "transactions")]
    Transactions(TransactionsOptions),
    /// Summarize a transaction
    #[structopt(name = "analyze")]
    Analyze(AnalyzeOptions),
    /// Convert a wei amount to ether and gwei
    #[structopt(name = "units")]
    Units(UnitsOptions),
    /// Serve the JSON API
    #[structopt(name = "serve")]
    Serve(ServeOptions),
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "onchain-agent",
    about = "Fetch and summarize recent wallet transactions"
)]
pub struct CliOptions {
    #[structopt(long = "config", default_value = "config-agent.toml", parse(from_os_str))]
    pub config: PathBuf,

    #[structopt(subcommand)]
    pub command: Command,
}

/// Connectors available for this invocation: a watch-only one when an
/// address was given, a secret key one when `ETH_PRIVATE_KEY` is set.
pub fn available_connectors(
    opts: &TransactionsOptions,
) -> Result<Vec<Box<dyn WalletConnector>>, AgentError> {
    let mut connectors: Vec<Box<dyn WalletConnector>> = Vec::new();
    if let Some(address) = &opts.address {
        connectors.push(Box::new(WatchOnlyConnector::from_str_address(address)?));
    }
    if let Ok(secret) = env::var("ETH_PRIVATE_KEY") {
        if !secret.trim().is_empty() {
            connectors.push(Box::new(SecretKeyConnector::from_hex(&secret)?));
        }
    }
    Ok(connectors)
}

pub fn explorer_api_key(opts: &TransactionsOptions) -> Option<String> {
    opts.api_key
        .clone()
        .or_else(|| env::var("ETHERSCAN_API_KEY").ok())
        .filter(|key| !key.is_empty())
}
