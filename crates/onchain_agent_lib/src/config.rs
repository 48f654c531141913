use serde::Deserialize;
use std::collections::btree_map::BTreeMap as Map;

use std::fs;
use std::path::Path;

use crate::err_from;
use crate::error::AgentError;

pub const DEFAULT_CONFIG_FILE: &str = "config-agent.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    pub chain: Map<String, Chain>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct AnalysisSettings {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    2000
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Chain {
    pub network_id: u64,
    pub currency_symbol: Option<String>,
    pub explorer_endpoints: Vec<String>,
    /// Prefix of a transaction page, the hash is appended
    pub explorer_tx_url: Option<String>,
    pub fallback_api_key: Option<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AgentError> {
        let contents = fs::read_to_string(path).map_err(err_from!())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, AgentError> {
        toml::from_str(contents).map_err(err_from!())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml_str(
            r#"
[chain.mainnet]
network-id = 1
currency-symbol = "ETH"
explorer-endpoints = ["https://api.etherscan.io/api"]
explorer-tx-url = "https://etherscan.io/tx/"
"#,
        )
        .unwrap();
        assert_eq!(config.analysis.delay_ms, 2000);
        let mainnet = &config.chain["mainnet"];
        assert_eq!(mainnet.network_id, 1);
        assert_eq!(mainnet.explorer_endpoints.len(), 1);
        assert_eq!(mainnet.fallback_api_key, None);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = Config::from_toml_str(include_str!("../../../config-agent.toml")).unwrap();
        assert!(config.chain.contains_key("mainnet"));
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(Config::from_toml_str("[chain.mainnet]\nnetwork-id = \"one\"").is_err());
        assert!(Config::load("does-not-exist.toml").is_err());
    }
}
