#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the complaint dashboard.
//!
//! Loads one complaint dataset, then either prints a one-shot report
//! (`summary`, `json`, `categories`), serves the JSON API (`serve`), or,
//! with no subcommand, runs the interactive dashboard.
//!
//! Uses `indicatif-log-bridge` (via
//! [`complaint_dashboard_cli_utils::init_logger`]) so log lines and the
//! loading spinner share the terminal cleanly.

mod interactive;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use complaint_dashboard_analytics::pipeline;
use complaint_dashboard_analytics_models::DashboardQuery;
use complaint_dashboard_cli_utils::{IndicatifProgress, MultiProgress};
use complaint_dashboard_server::{DEFAULT_BIND_ADDR, DEFAULT_PORT, ServerConfig};
use complaint_dashboard_server_models::DashboardQueryParams;
use complaint_dashboard_source::SourceError;
use complaint_dashboard_source::csv_file::load_records;
use complaint_dashboard_source::registry::{DEFAULT_DATASET_ID, all_datasets, resolve_dataset};
use complaint_dashboard_source::store::RecordStore;

use crate::render::{DashboardText, RenderOptions};

#[derive(Parser)]
#[command(
    name = "complaint_dashboard",
    about = "Filter and summarise complaint records by year and category"
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Which data to load.
#[derive(Args)]
struct SourceArgs {
    /// CSV file to load (defaults to the dataset's configured path)
    #[arg(long, global = true, env = "COMPLAINT_DASHBOARD_DATA")]
    data: Option<PathBuf>,
    /// Built-in dataset definition id
    #[arg(
        long,
        global = true,
        env = "COMPLAINT_DASHBOARD_DATASET",
        default_value = DEFAULT_DATASET_ID
    )]
    dataset: String,
    /// Dataset definition TOML file (overrides `--dataset`)
    #[arg(long, global = true)]
    dataset_file: Option<PathBuf>,
}

/// Year and category filters shared by the report commands.
#[derive(Args)]
struct FilterArgs {
    /// First year to include
    #[arg(long)]
    from: Option<i32>,
    /// Last year to include
    #[arg(long)]
    to: Option<i32>,
    /// Comma-separated categories. Omit for all; pass "" to select none.
    #[arg(long)]
    categories: Option<String>,
}

impl FilterArgs {
    fn to_query(&self, store: &RecordStore) -> DashboardQuery {
        DashboardQueryParams {
            from: self.from,
            to: self.to,
            categories: self.categories.clone(),
        }
        .to_query(store.year_bounds())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for the given filters
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Maximum number of filtered rows to print
        #[arg(long, default_value = "20")]
        rows: usize,
    },
    /// Print the dashboard data as JSON
    Json {
        #[command(flatten)]
        filters: FilterArgs,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// List categories with their record counts
    Categories,
    /// List built-in dataset definitions
    Datasets,
    /// Serve the JSON API
    Serve {
        /// Interface to bind
        #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
        bind: String,
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn load_store(args: &SourceArgs, multi: &MultiProgress) -> Result<RecordStore, SourceError> {
    let definition = resolve_dataset(&args.dataset, args.dataset_file.as_deref())?;
    let path: &Path = args.data.as_deref().unwrap_or(&definition.default_path);

    let progress = IndicatifProgress::rows_bar(multi, &format!("Loading {}", definition.name()));
    load_records(path, &definition, &progress)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = complaint_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Datasets)) {
        println!("{:<24} NAME", "ID");
        println!("{}", "-".repeat(60));
        for dataset in all_datasets() {
            println!("{:<24} {}", dataset.id(), dataset.name());
        }
        return Ok(());
    }

    let store = load_store(&cli.source, &multi)?;

    let Some(command) = cli.command else {
        return interactive::run(&store, RenderOptions::default());
    };

    match command {
        Commands::Summary { filters, rows } => {
            let query = filters.to_query(&store);
            let view = pipeline::run(store.records(), &query);
            print!(
                "{}",
                DashboardText::new(&store, &view, RenderOptions { row_limit: rows })
            );
        }
        Commands::Json { filters, pretty } => {
            let query = filters.to_query(&store);
            let view = pipeline::run(store.records(), &query);
            let json = if pretty {
                serde_json::to_string_pretty(&view)?
            } else {
                serde_json::to_string(&view)?
            };
            println!("{json}");
        }
        Commands::Categories => {
            println!("{:<30} COUNT", "CATEGORY");
            println!("{}", "-".repeat(40));
            for (category, count) in store.category_counts() {
                println!("{category:<30} {count}");
            }
            let undated = store.undated_count();
            if undated > 0 {
                log::info!("{undated} records have no usable date");
            }
        }
        Commands::Serve { bind, port } => {
            let config = ServerConfig {
                bind_addr: bind,
                port,
            };
            complaint_dashboard_server::run_server_blocking(Arc::new(store), &config)?;
        }
        Commands::Datasets => {}
    }

    Ok(())
}
