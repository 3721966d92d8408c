#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone API server for the complaint dashboard.
//!
//! Loads the dataset named by `COMPLAINT_DASHBOARD_*` environment
//! variables and serves it on `BIND_ADDR:PORT`. Pass `-i` to be prompted
//! for the address and port instead.

use std::sync::Arc;

use complaint_dashboard_server::{ServerConfig, ServerError, interactive, load_store_from_env};

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading dataset...");
    let store = Arc::new(load_store_from_env()?);
    let config = ServerConfig::from_env();

    if std::env::args().skip(1).any(|a| a == "-i" || a == "--interactive") {
        interactive::run(store, config).await
    } else {
        complaint_dashboard_server::run_server(store, &config).await
    }
}
