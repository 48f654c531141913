use crate::config::Config;
use crate::{err_custom_create, err_from};
use crate::error::{AgentError, FetchError};
use crate::explorer::{ExplorerClient, TransactionSource};
use crate::model::Transaction;
use async_trait::async_trait;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ChainSetup {
    pub network_id: u64,
    pub currency_symbol: String,
    pub explorers: Vec<ExplorerClient>,
    pub explorer_tx_url: Option<String>,
}

impl ChainSetup {
    pub fn tx_link(&self, tx_hash: &str) -> Option<String> {
        self.explorer_tx_url
            .as_ref()
            .map(|prefix| format!("{}{}", prefix, tx_hash))
    }

    pub fn random_explorer(&self) -> Option<&ExplorerClient> {
        if self.explorers.is_empty() {
            return None;
        }
        let mut rng = rand::thread_rng();
        self.explorers.get(rng.gen_range(0..self.explorers.len()))
    }
}

#[async_trait]
impl TransactionSource for ChainSetup {
    async fn fetch_transactions(
        &self,
        address: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<Transaction>, FetchError> {
        let explorer = self.random_explorer().ok_or(FetchError::NoEndpoints)?;
        explorer.fetch_transactions(address, api_key).await
    }
}

#[derive(Clone, Debug)]
pub struct AgentSetup {
    pub chain_setup: BTreeMap<String, ChainSetup>,
    pub analysis_delay: Duration,
}

impl AgentSetup {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let mut setup = AgentSetup {
            chain_setup: BTreeMap::new(),
            analysis_delay: Duration::from_millis(config.analysis.delay_ms),
        };
        for (chain_name, chain_config) in &config.chain {
            if chain_config.explorer_endpoints.is_empty() {
                return Err(err_custom_create!(
                    "No explorer endpoints configured for chain: {}",
                    chain_name
                ));
            }
            let mut explorers = Vec::new();
            for endp in &chain_config.explorer_endpoints {
                let explorer = ExplorerClient::new(endp, chain_config.fallback_api_key.clone())
                    .map_err(err_from!())?;
                explorers.push(explorer);
            }
            setup.chain_setup.insert(
                chain_name.clone(),
                ChainSetup {
                    network_id: chain_config.network_id,
                    currency_symbol: chain_config
                        .currency_symbol
                        .clone()
                        .unwrap_or_else(|| "ETH".to_string()),
                    explorers,
                    explorer_tx_url: chain_config.explorer_tx_url.clone(),
                },
            );
        }
        Ok(setup)
    }

    pub fn get_chain_setup(&self, chain_name: &str) -> Result<&ChainSetup, AgentError> {
        self.chain_setup
            .get(chain_name)
            .ok_or_else(|| err_custom_create!("No chain setup for chain: {}", chain_name))
    }

    /// Random endpoint of the chain, spreading requests over mirrors.
    pub fn get_explorer(&self, chain_name: &str) -> Result<&ExplorerClient, AgentError> {
        self.get_chain_setup(chain_name)?
            .random_explorer()
            .ok_or_else(|| err_custom_create!("No explorers found for chain: {}", chain_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBag;

    const CONFIG: &str = r#"
[analysis]
delay-ms = 10

[chain.mainnet]
network-id = 1
currency-symbol = "ETH"
explorer-endpoints = ["https://api.etherscan.io/api", "https://mirror.example/api"]
explorer-tx-url = "https://etherscan.io/tx/"

[chain.devnet]
network-id = 987789
explorer-endpoints = ["http://127.0.0.1:8545/api"]
"#;

    #[test]
    fn test_setup_from_config() {
        let setup = AgentSetup::new(&Config::from_toml_str(CONFIG).unwrap()).unwrap();
        assert_eq!(setup.analysis_delay, Duration::from_millis(10));

        let mainnet = setup.get_chain_setup("mainnet").unwrap();
        assert_eq!(mainnet.explorers.len(), 2);
        assert_eq!(
            mainnet.tx_link("0xabc").as_deref(),
            Some("https://etherscan.io/tx/0xabc")
        );

        let devnet = setup.get_chain_setup("devnet").unwrap();
        assert_eq!(devnet.currency_symbol, "ETH");
        assert_eq!(devnet.tx_link("0xabc"), None);

        assert!(setup.get_chain_setup("goerli").is_err());
    }

    #[test]
    fn test_get_explorer_picks_configured_endpoint() {
        let setup = AgentSetup::new(&Config::from_toml_str(CONFIG).unwrap()).unwrap();
        for _ in 0..10 {
            let endpoint = setup.get_explorer("mainnet").unwrap().endpoint().to_string();
            assert!(endpoint == "https://api.etherscan.io/api" || endpoint == "https://mirror.example/api");
        }
        assert!(setup.get_explorer("goerli").is_err());
    }

    #[test]
    fn test_chain_without_endpoints_is_rejected() {
        let config = Config::from_toml_str(
            "[chain.empty]\nnetwork-id = 5\nexplorer-endpoints = []\n",
        )
        .unwrap();
        assert!(AgentSetup::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_chain_setup_without_explorers_fails_fetch() {
        let chain_setup = ChainSetup {
            network_id: 1,
            currency_symbol: "ETH".to_string(),
            explorers: vec![],
            explorer_tx_url: None,
        };
        let err = chain_setup
            .fetch_transactions("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf", None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NoEndpoints));
        assert_eq!(err.to_string(), "No explorer endpoints configured");
    }

    #[test]
    fn test_client_errors_keep_their_cause() {
        let cause = FetchError::ClientBuildError("tls backend".to_string());
        let err: AgentError = Err::<(), _>(cause).map_err(err_from!()).unwrap_err();
        assert!(matches!(err.inner, ErrorBag::FetchError(FetchError::ClientBuildError(_))));
        assert_eq!(err.to_string(), "Failed to build HTTP client: tls backend");
    }
}
