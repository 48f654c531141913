use secp256k1::SecretKey;
use web3::types::Address;

use crate::error::AgentError;
use crate::eth::{format_address, get_eth_addr_from_secret, parse_address};
use crate::{err_custom_create, err_from};

pub const WATCH_ONLY_CONNECTOR_ID: &str = "watch-only";
pub const SECRET_KEY_CONNECTOR_ID: &str = "secret-key";

/// A way of obtaining the account the session acts for.
pub trait WalletConnector: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn account(&self) -> Result<Address, AgentError>;
}

/// Public address only, nothing can be signed.
pub struct WatchOnlyConnector {
    address: Address,
}

impl WatchOnlyConnector {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn from_str_address(addr: &str) -> Result<Self, AgentError> {
        Ok(Self::new(parse_address(addr)?))
    }
}

impl WalletConnector for WatchOnlyConnector {
    fn id(&self) -> &str {
        WATCH_ONLY_CONNECTOR_ID
    }

    fn name(&self) -> &str {
        "Watch-only address"
    }

    fn account(&self) -> Result<Address, AgentError> {
        Ok(self.address)
    }
}

pub struct SecretKeyConnector {
    secret_key: SecretKey,
}

impl SecretKeyConnector {
    pub fn new(secret_key: SecretKey) -> Self {
        Self { secret_key }
    }

    pub fn from_hex(secret: &str) -> Result<Self, AgentError> {
        let secret = secret.trim();
        let secret = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes = hex::decode(secret).map_err(err_from!())?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(err_from!())?;
        Ok(Self::new(secret_key))
    }
}

impl WalletConnector for SecretKeyConnector {
    fn id(&self) -> &str {
        SECRET_KEY_CONNECTOR_ID
    }

    fn name(&self) -> &str {
        "Local secret key"
    }

    fn account(&self) -> Result<Address, AgentError> {
        Ok(get_eth_addr_from_secret(&self.secret_key))
    }
}

/// Picks a connector by id, or the first one when no id is given.
pub fn select_connector<'a>(
    connectors: &'a [Box<dyn WalletConnector>],
    id: Option<&str>,
) -> Result<&'a dyn WalletConnector, AgentError> {
    let connector = match id {
        Some(id) => connectors.iter().find(|c| c.id() == id),
        None => connectors.first(),
    };
    match (connector, id) {
        (Some(connector), _) => Ok(connector.as_ref()),
        (None, Some(id)) => {
            let available = connectors.iter().map(|c| c.id()).collect::<Vec<_>>();
            Err(err_custom_create!(
                "Unknown wallet connector {}, available: {:?}",
                id,
                available
            ))
        }
        (None, None) => Err(err_custom_create!("No wallet connectors available")),
    }
}

/// Account the user is currently connected with.
#[derive(Debug, Clone, Default)]
pub struct WalletSession {
    address: Option<Address>,
    connector_id: Option<String>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, connector: &dyn WalletConnector) -> Result<Address, AgentError> {
        let address = connector.account()?;
        log::info!(
            "Wallet connected with {}: {}",
            connector.name(),
            format_address(&address)
        );
        self.address = Some(address);
        self.connector_id = Some(connector.id().to_string());
        Ok(address)
    }

    pub fn disconnect(&mut self) {
        if let Some(address) = self.address.take() {
            log::info!("Wallet disconnected: {}", format_address(&address));
        }
        self.connector_id = None;
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn address_string(&self) -> Option<String> {
        self.address.as_ref().map(format_address)
    }

    pub fn connector_id(&self) -> Option<&str> {
        self.connector_id.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}
