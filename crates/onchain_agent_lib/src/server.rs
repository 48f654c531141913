use crate::analysis::{CannedSummarizer, SummaryRequest, TransactionSummarizer};
use crate::error::AgentError;
use crate::runtime::{TransactionFeed, TransactionsView};
use crate::setup::AgentSetup;
use crate::utils::{format_units_exact, wei_to_ether, wei_to_gwei, ETHER_DECIMALS};
use crate::wallet::{WalletSession, WatchOnlyConnector};
use crate::{err_custom_create, err_from};
use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{web, App, HttpRequest, HttpServer, Responder};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct ServerData {
    pub setup: AgentSetup,
    pub session: Arc<Mutex<WalletSession>>,
    pub feeds: BTreeMap<String, TransactionFeed>,
    pub summarizer: Arc<dyn TransactionSummarizer>,
}

impl ServerData {
    pub fn new(setup: AgentSetup) -> Self {
        let feeds = setup
            .chain_setup
            .iter()
            .map(|(name, chain_setup)| {
                (
                    name.clone(),
                    TransactionFeed::new(Arc::new(chain_setup.clone())),
                )
            })
            .collect();
        let summarizer = Arc::new(CannedSummarizer::new(setup.analysis_delay));
        ServerData {
            setup,
            session: Arc::new(Mutex::new(WalletSession::new())),
            feeds,
            summarizer,
        }
    }

    fn feed(&self, chain: &str) -> Result<&TransactionFeed, AgentError> {
        self.feeds
            .get(chain)
            .ok_or_else(|| err_custom_create!("No chain setup for chain: {}", chain))
    }
}

#[derive(Deserialize, Debug)]
pub struct KeyQuery {
    pub apikey: Option<String>,
    pub chain: Option<String>,
}

macro_rules! return_on_error {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(err) => {
                return web::Json(json!({
                    "error": err.to_string()
                }))
            },
        }
    }
}

async fn view_response(
    feed: &TransactionFeed,
    view: Option<TransactionsView>,
) -> web::Json<serde_json::Value> {
    match view {
        Some(view) => {
            let message = view.user_message();
            web::Json(json!({
                "message": message,
                "view": view,
            }))
        }
        None => {
            let current = feed.view().await;
            let message = current.user_message();
            web::Json(json!({
                "superseded": true,
                "message": message,
                "view": current,
            }))
        }
    }
}

pub async fn chains(data: Data<Box<ServerData>>) -> impl Responder {
    let chains = data
        .setup
        .chain_setup
        .iter()
        .map(|(name, chain_setup)| {
            let explorers = chain_setup
                .explorers
                .iter()
                .map(|e| e.endpoint())
                .collect::<Vec<_>>();
            json!({
                "name": name,
                "networkId": chain_setup.network_id,
                "currencySymbol": chain_setup.currency_symbol,
                "explorers": explorers,
            })
        })
        .collect::<Vec<_>>();
    web::Json(json!({
        "chains": chains,
    }))
}

fn session_json(session: &WalletSession) -> serde_json::Value {
    json!({
        "address": session.address_string(),
        "isConnected": session.is_connected(),
        "connector": session.connector_id(),
    })
}

pub async fn session(data: Data<Box<ServerData>>) -> impl Responder {
    let session = data.session.lock().await;
    web::Json(session_json(&session))
}

pub async fn session_connect(data: Data<Box<ServerData>>, req: HttpRequest) -> impl Responder {
    let address = return_on_error!(req.match_info().get("address").ok_or("No address provided"));
    let connector = return_on_error!(WatchOnlyConnector::from_str_address(address));
    let mut session = data.session.lock().await;
    return_on_error!(session.connect(&connector));
    web::Json(session_json(&session))
}

pub async fn session_disconnect(data: Data<Box<ServerData>>) -> impl Responder {
    let mut session = data.session.lock().await;
    session.disconnect();
    web::Json(session_json(&session))
}

pub async fn session_transactions(
    data: Data<Box<ServerData>>,
    req: HttpRequest,
    query: web::Query<KeyQuery>,
) -> impl Responder {
    let chain = return_on_error!(req.match_info().get("chain").ok_or("No chain provided"));
    let feed = return_on_error!(data.feed(chain));
    let session = data.session.lock().await.clone();
    let view = return_on_error!(feed.refresh(&session, query.apikey.as_deref()).await);
    view_response(feed, view).await
}

pub async fn address_transactions(
    data: Data<Box<ServerData>>,
    req: HttpRequest,
    query: web::Query<KeyQuery>,
) -> impl Responder {
    let chain = return_on_error!(req.match_info().get("chain").ok_or("No chain provided"));
    let address = return_on_error!(req.match_info().get("address").ok_or("No address provided"));
    let feed = return_on_error!(data.feed(chain));
    let view = feed.fetch(address, query.apikey.as_deref()).await;
    view_response(feed, view).await
}

pub async fn summary(
    data: Data<Box<ServerData>>,
    req: HttpRequest,
    query: web::Query<KeyQuery>,
) -> impl Responder {
    let tx_hash = return_on_error!(req.match_info().get("tx_hash").ok_or("No tx_hash provided"));
    let request = SummaryRequest::new(tx_hash, query.apikey.clone().unwrap_or_default());
    let summary = return_on_error!(data.summarizer.summarize(&request).await);
    let link = match &query.chain {
        Some(chain) => return_on_error!(data.setup.get_chain_setup(chain)).tx_link(tx_hash),
        None => None,
    };
    web::Json(json!({
        "summary": summary,
        "link": link,
    }))
}

pub async fn units(req: HttpRequest) -> impl Responder {
    let wei = return_on_error!(req.match_info().get("wei").ok_or("No amount provided"));
    let ether = return_on_error!(wei_to_ether(wei));
    let gwei = return_on_error!(wei_to_gwei(wei));
    let ether_exact = return_on_error!(format_units_exact(wei, ETHER_DECIMALS));
    web::Json(json!({
        "wei": wei,
        "ether": ether,
        "gwei": gwei,
        "etherExact": ether_exact,
    }))
}

pub async fn debug_endpoint(data: Data<Box<ServerData>>) -> impl Responder {
    let mut feeds = BTreeMap::new();
    for (name, feed) in &data.feeds {
        feeds.insert(name.clone(), feed.shared_state().await);
    }
    web::Json(json!({
        "sharedState": feeds,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/chains", web::get().to(chains))
        .route("/session", web::get().to(session))
        .route("/session/connect/{address}", web::post().to(session_connect))
        .route("/session/disconnect", web::post().to(session_disconnect))
        .route("/transactions/{chain}", web::get().to(session_transactions))
        .route(
            "/transactions/{chain}/{address}",
            web::get().to(address_transactions),
        )
        .route("/summary/{tx_hash}", web::get().to(summary))
        .route("/units/{wei}", web::get().to(units))
        .route("/debug", web::get().to(debug_endpoint));
}

pub async fn run_server(
    server_data: ServerData,
    http_addr: &str,
    http_port: u16,
) -> Result<(), AgentError> {
    let server_data = Data::new(Box::new(server_data));
    log::info!("Starting http server on {}:{}", http_addr, http_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(server_data.clone())
            .configure(configure_routes)
    })
    .bind((http_addr, http_port))
    .map_err(err_from!())?
    .run()
    .await
    .map_err(err_from!())
}
