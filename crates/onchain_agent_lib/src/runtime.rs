use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::err_custom_create;
use crate::error::{AgentError, FetchError};
use crate::explorer::TransactionSource;
use crate::model::Transaction;
use crate::wallet::WalletSession;

pub const EMPTY_MESSAGE: &str = "No transactions found for this address.";

/// What the user currently sees for the transaction list.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TransactionsView {
    Idle,
    Loading {
        address: String,
    },
    Loaded {
        address: String,
        transactions: Vec<Transaction>,
    },
    /// Valid response without records, reported differently from a failure
    Empty {
        address: String,
    },
    Failed {
        address: String,
        message: String,
    },
}

impl TransactionsView {
    pub fn user_message(&self) -> String {
        match self {
            TransactionsView::Idle => "Connect a wallet to load its transactions.".to_string(),
            TransactionsView::Loading { address } => {
                format!("Loading transactions of {address}...")
            }
            TransactionsView::Loaded { transactions, .. } => {
                format!("Loaded {} transactions.", transactions.len())
            }
            TransactionsView::Empty { .. } => EMPTY_MESSAGE.to_string(),
            TransactionsView::Failed { message, .. } => message.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SharedState {
    pub generation: u64,
    pub view: TransactionsView,
    pub completed: u64,
    pub discarded: u64,
}

impl Default for SharedState {
    fn default() -> Self {
        SharedState {
            generation: 0,
            view: TransactionsView::Idle,
            completed: 0,
            discarded: 0,
        }
    }
}

/// Handle of one fetch attempt. Only the latest ticket may update the view.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub address: String,
}

pub struct TransactionFeed {
    source: Arc<dyn TransactionSource>,
    shared_state: Arc<Mutex<SharedState>>,
}

impl TransactionFeed {
    pub fn new(source: Arc<dyn TransactionSource>) -> Self {
        TransactionFeed {
            source,
            shared_state: Arc::new(Mutex::new(SharedState::default())),
        }
    }

    pub async fn begin(&self, address: &str) -> FetchTicket {
        let mut state = self.shared_state.lock().await;
        state.generation += 1;
        state.view = TransactionsView::Loading {
            address: address.to_string(),
        };
        FetchTicket {
            generation: state.generation,
            address: address.to_string(),
        }
    }

    /// Applies the result of `ticket`. Returns `None` and leaves the view
    /// untouched when a newer attempt was started in the meantime.
    pub async fn complete(
        &self,
        ticket: &FetchTicket,
        result: Result<Vec<Transaction>, FetchError>,
    ) -> Option<TransactionsView> {
        let mut state = self.shared_state.lock().await;
        if ticket.generation != state.generation {
            state.discarded += 1;
            log::warn!(
                "Discarding stale response for {} (attempt {}, current {})",
                ticket.address,
                ticket.generation,
                state.generation
            );
            return None;
        }
        state.completed += 1;
        let address = ticket.address.clone();
        state.view = match result {
            Ok(transactions) if transactions.is_empty() => TransactionsView::Empty { address },
            Ok(transactions) => TransactionsView::Loaded {
                address,
                transactions,
            },
            Err(err) => TransactionsView::Failed {
                address,
                message: err.to_string(),
            },
        };
        Some(state.view.clone())
    }

    pub async fn fetch(&self, address: &str, api_key: Option<&str>) -> Option<TransactionsView> {
        let ticket = self.begin(address).await;
        let result = self.source.fetch_transactions(address, api_key).await;
        self.complete(&ticket, result).await
    }

    /// Fetches for the account connected in `session`.
    pub async fn refresh(
        &self,
        session: &WalletSession,
        api_key: Option<&str>,
    ) -> Result<Option<TransactionsView>, AgentError> {
        let address = session
            .address_string()
            .ok_or_else(|| err_custom_create!("Wallet is not connected"))?;
        Ok(self.fetch(&address, api_key).await)
    }

    pub async fn view(&self) -> TransactionsView {
        self.shared_state.lock().await.view.clone()
    }

    pub async fn shared_state(&self) -> SharedState {
        self.shared_state.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::WatchOnlyConnector;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    const SLOW: &str = "0x1111111111111111111111111111111111111111";
    const FAST: &str = "0x2222222222222222222222222222222222222222";
    const EMPTY: &str = "0x3333333333333333333333333333333333333333";
    const FAILING: &str = "0x4444444444444444444444444444444444444444";

    struct ScriptedSource {
        slow_gate: Mutex<Option<oneshot::Receiver<()>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(slow_gate: Option<oneshot::Receiver<()>>) -> Self {
            ScriptedSource {
                slow_gate: Mutex::new(slow_gate),
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn tx_for(address: &str) -> Transaction {
        Transaction {
            hash: format!("0xhash{}", &address[2..6]),
            from: address.to_string(),
            to: None,
            value: "0".to_string(),
            gas_price: "1".to_string(),
            gas_used: "1".to_string(),
            timestamp: "2023-11-14T22:13:20.000Z".to_string(),
            block_number: "1".to_string(),
            method_id: None,
            function_name: "Transfer".to_string(),
            contract_address: None,
        }
    }

    #[async_trait]
    impl TransactionSource for ScriptedSource {
        async fn fetch_transactions(
            &self,
            address: &str,
            _api_key: Option<&str>,
        ) -> Result<Vec<Transaction>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if address == SLOW {
                let gate = self.slow_gate.lock().await.take();
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
            }
            match address {
                EMPTY => Ok(vec![]),
                FAILING => Err(FetchError::provider(Some("NOTOK"))),
                other => Ok(vec![tx_for(other)]),
            }
        }
    }

    #[tokio::test]
    async fn test_views_for_each_outcome() {
        let feed = TransactionFeed::new(Arc::new(ScriptedSource::new(None)));
        assert_eq!(feed.view().await, TransactionsView::Idle);

        let view = feed.fetch(FAST, None).await.unwrap();
        assert!(matches!(view, TransactionsView::Loaded { ref transactions, .. } if transactions.len() == 1));

        let view = feed.fetch(EMPTY, None).await.unwrap();
        assert_eq!(view.user_message(), EMPTY_MESSAGE);

        let view = feed.fetch(FAILING, None).await.unwrap();
        assert_eq!(
            view,
            TransactionsView::Failed {
                address: FAILING.to_string(),
                message: "NOTOK".to_string()
            }
        );
        assert_eq!(view.user_message(), "NOTOK");
        assert_eq!(feed.shared_state().await.completed, 3);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let (release, gate) = oneshot::channel();
        let feed = Arc::new(TransactionFeed::new(Arc::new(ScriptedSource::new(Some(gate)))));

        let slow = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.fetch(SLOW, None).await })
        };
        while feed.shared_state().await.generation == 0 {
            tokio::task::yield_now().await;
        }

        let fresh = feed.fetch(FAST, None).await;
        assert!(matches!(fresh, Some(TransactionsView::Loaded { ref address, .. }) if address == FAST));

        release.send(()).unwrap();
        assert_eq!(slow.await.unwrap(), None);

        let state = feed.shared_state().await;
        assert_eq!(state.discarded, 1);
        assert_eq!(state.completed, 1);
        assert!(matches!(state.view, TransactionsView::Loaded { ref address, .. } if address == FAST));
    }

    #[tokio::test]
    async fn test_refresh_requires_connected_session() {
        let source = Arc::new(ScriptedSource::new(None));
        let feed = TransactionFeed::new(source.clone());
        let mut session = WalletSession::new();

        assert!(feed.refresh(&session, None).await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        session
            .connect(&WatchOnlyConnector::from_str_address(FAST).unwrap())
            .unwrap();
        let view = feed.refresh(&session, None).await.unwrap().unwrap();
        assert!(matches!(view, TransactionsView::Loaded { ref address, .. } if address == FAST));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
