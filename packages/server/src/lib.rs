#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web JSON API for the complaint dashboard.
//!
//! The record store is loaded once at startup and shared read-only by every
//! request. Each `/api/dashboard` request runs the filter-and-aggregate
//! pipeline from scratch against that snapshot, so handlers keep no state
//! of their own.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use complaint_dashboard_source::SourceError;
use complaint_dashboard_source::csv_file::load_records;
use complaint_dashboard_source::progress::null_progress;
use complaint_dashboard_source::registry::{DEFAULT_DATASET_ID, resolve_dataset};
use complaint_dashboard_source::store::RecordStore;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// The loaded complaint records.
    pub store: Arc<RecordStore>,
}

/// Errors that can stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The dataset could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The listen address could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// `host:port` that was requested.
        addr: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{raw}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        Self { bind_addr, port }
    }
}

/// Loads the record store named by the environment.
///
/// `COMPLAINT_DASHBOARD_DATASET` picks a built-in definition (default
/// [`DEFAULT_DATASET_ID`]), `COMPLAINT_DASHBOARD_DATASET_FILE` overrides it
/// with a TOML file, and `COMPLAINT_DASHBOARD_DATA` overrides the CSV path.
///
/// # Errors
///
/// Returns [`ServerError::Source`] if the definition or the CSV cannot be
/// loaded.
pub fn load_store_from_env() -> Result<RecordStore, ServerError> {
    let id = std::env::var("COMPLAINT_DASHBOARD_DATASET")
        .unwrap_or_else(|_| DEFAULT_DATASET_ID.to_string());
    let file = std::env::var_os("COMPLAINT_DASHBOARD_DATASET_FILE").map(PathBuf::from);
    let definition = resolve_dataset(&id, file.as_deref())?;

    let data = std::env::var_os("COMPLAINT_DASHBOARD_DATA")
        .map_or_else(|| definition.default_path.clone(), PathBuf::from);

    Ok(load_records(&data, &definition, &null_progress())?)
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dataset", web::get().to(handlers::dataset))
            .route("/categories", web::get().to(handlers::categories))
            .route("/dashboard", web::get().to(handlers::dashboard)),
    );
}

/// Starts the API server over `store`.
///
/// This is a regular async function. The caller provides the runtime (e.g.
/// via `#[actix_web::main]` or [`run_server_blocking`]).
///
/// # Errors
///
/// Returns [`ServerError`] if the address cannot be bound or the server
/// stops with an error.
#[allow(clippy::future_not_send)]
pub async fn run_server(store: Arc<RecordStore>, config: &ServerConfig) -> Result<(), ServerError> {
    log::info!(
        "Serving {} records from '{}'",
        store.len(),
        store.dataset_id()
    );

    let state = web::Data::new(AppState { store });
    let addr = format!("{}:{}", config.bind_addr, config.port);

    log::info!("Starting server on {addr}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))
    .map_err(|source| ServerError::Bind { addr, source })?
    .run()
    .await?;

    Ok(())
}

/// Runs [`run_server`] to completion on a fresh actix system.
///
/// # Errors
///
/// See [`run_server`].
pub fn run_server_blocking(
    store: Arc<RecordStore>,
    config: &ServerConfig,
) -> Result<(), ServerError> {
    actix_rt::System::new().block_on(run_server(store, config))
}
