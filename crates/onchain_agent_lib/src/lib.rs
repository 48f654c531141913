pub mod analysis;
pub mod config;
pub mod error;
pub mod eth;
pub mod explorer;
pub mod model;
pub mod runtime;
pub mod server;
pub mod setup;
pub mod utils;
pub mod wallet;
