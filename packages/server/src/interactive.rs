//! Interactive mode for the server.
//!
//! Prompts for the listen address and port before starting the server.

use std::sync::Arc;

use complaint_dashboard_source::store::RecordStore;
use dialoguer::{Confirm, Input};

use crate::{ServerConfig, ServerError};

/// Prompts for a [`ServerConfig`], then serves `store`.
///
/// The prompts are pre-filled with `defaults`. Declining the final
/// confirmation returns without starting anything.
///
/// # Errors
///
/// Returns [`ServerError`] if the server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(store: Arc<RecordStore>, defaults: ServerConfig) -> Result<(), ServerError> {
    println!("Complaint Dashboard Server");
    println!(
        "Dataset: {} ({} records)",
        store.dataset_name(),
        store.len()
    );
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or(defaults.bind_addr);

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(store, &ServerConfig { bind_addr, port }).await
}
