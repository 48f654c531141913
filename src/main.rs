mod options;

use std::sync::Arc;

use onchain_agent_lib::analysis::{CannedSummarizer, SummaryRequest, TransactionSummarizer};
use onchain_agent_lib::config::Config;
use onchain_agent_lib::err_custom_create;
use onchain_agent_lib::error::AgentError;
use onchain_agent_lib::model::Transaction;
use onchain_agent_lib::runtime::{TransactionFeed, TransactionsView};
use onchain_agent_lib::server::{run_server, ServerData};
use onchain_agent_lib::setup::{AgentSetup, ChainSetup};
use onchain_agent_lib::utils::{
    format_units_exact, transaction_fee_wei, truncate_address, wei_to_ether, wei_to_gwei,
    ETHER_DECIMALS,
};
use onchain_agent_lib::wallet::{select_connector, WalletSession};
use structopt::StructOpt;

use crate::options::{
    available_connectors, explorer_api_key, CliOptions, Command, TransactionsOptions,
};

fn print_transaction(tx: &Transaction, chain_setup: &ChainSetup) -> Result<(), AgentError> {
    let symbol = &chain_setup.currency_symbol;
    let receiver = match (&tx.to, &tx.contract_address) {
        (Some(to), _) => truncate_address(to),
        (None, Some(created)) => format!("new contract {}", truncate_address(created)),
        (None, None) => "contract creation".to_string(),
    };
    let fee = transaction_fee_wei(&tx.gas_price, &tx.gas_used)?;
    println!("{}  block {}  {}", tx.hash, tx.block_number, tx.timestamp);
    println!(
        "  {} -> {}  {} {} ({} exact)  {}",
        truncate_address(&tx.from),
        receiver,
        wei_to_ether(&tx.value)?,
        symbol,
        format_units_exact(&tx.value, ETHER_DECIMALS)?,
        tx.function_name,
    );
    println!(
        "  gas price {} gwei  gas used {}  fee {} {}",
        wei_to_gwei(&tx.gas_price)?,
        tx.gas_used,
        format_units_exact(&fee, ETHER_DECIMALS)?,
        symbol,
    );
    if let Some(link) = chain_setup.tx_link(&tx.hash) {
        println!("  {}", link);
    }
    Ok(())
}

async fn list_transactions(setup: &AgentSetup, opts: &TransactionsOptions) -> Result<(), AgentError> {
    let chain_setup = setup.get_chain_setup(&opts.chain_name)?;
    let connectors = available_connectors(opts)?;
    let connector = select_connector(&connectors, opts.connector.as_deref())?;

    let mut session = WalletSession::new();
    session.connect(connector)?;

    let feed = TransactionFeed::new(Arc::new(chain_setup.clone()));
    let api_key = explorer_api_key(opts);
    let view = feed
        .refresh(&session, api_key.as_deref())
        .await?
        .ok_or_else(|| err_custom_create!("Fetch was superseded"))?;

    match &view {
        TransactionsView::Loaded { transactions, .. } => {
            for tx in transactions {
                print_transaction(tx, chain_setup)?;
            }
            println!("{}", view.user_message());
        }
        TransactionsView::Failed { message, .. } => {
            return Err(err_custom_create!("{}", message));
        }
        _ => println!("{}", view.user_message()),
    }
    Ok(())
}

fn print_units(wei: &str) -> Result<(), AgentError> {
    println!("ether:       {}", wei_to_ether(wei)?);
    println!("gwei:        {}", wei_to_gwei(wei)?);
    println!("ether exact: {}", format_units_exact(wei, ETHER_DECIMALS)?);
    Ok(())
}

async fn main_internal() -> Result<(), AgentError> {
    let dotenv_result = dotenv::dotenv();
    env_logger::init();
    if let Err(err) = dotenv_result {
        log::debug!("No .env file loaded: {}", err);
    }

    let cli = CliOptions::from_args();
    match cli.command {
        Command::Units(opts) => print_units(&opts.wei)?,
        Command::Transactions(opts) => {
            let config = Config::load(&cli.config)?;
            let setup = AgentSetup::new(&config)?;
            list_transactions(&setup, &opts).await?;
        }
        Command::Analyze(opts) => {
            let config = Config::load(&cli.config)?;
            let setup = AgentSetup::new(&config)?;
            let summarizer = CannedSummarizer::new(setup.analysis_delay);
            let summary = summarizer
                .summarize(&SummaryRequest::new(opts.tx_hash, opts.llm_api_key))
                .await?;
            println!("Transaction: {}", summary.tx_hash);
            println!("Summary:     {}", summary.summary);
            println!("Analysis:    {}", summary.analysis);
            println!("Analyzed at: {}", summary.timestamp);
            if let Some(chain_name) = &opts.chain_name {
                if let Some(link) = setup.get_chain_setup(chain_name)?.tx_link(&summary.tx_hash) {
                    println!("Explorer:    {}", link);
                }
            }
        }
        Command::Serve(opts) => {
            let config = Config::load(&cli.config)?;
            let setup = AgentSetup::new(&config)?;
            log::debug!("Starting agent: {:#?}", setup);
            run_server(ServerData::new(setup), &opts.http_addr, opts.http_port).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    match main_internal().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}
