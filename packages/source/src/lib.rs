#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Complaint data loading.
//!
//! A [`dataset_def::DatasetDefinition`] says which columns hold the date and
//! category; [`csv_file::load_records`] turns a CSV export into a read-only
//! [`store::RecordStore`] that the analytics pipeline filters and aggregates.

pub mod csv_file;
pub mod dataset_def;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod store;

use std::path::PathBuf;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The data file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Dataset definition TOML is invalid.
    #[error("Invalid dataset definition: {0}")]
    Config(#[from] toml::de::Error),

    /// A column named by the dataset definition is not in the header row.
    #[error("Column '{column}' not found (available: {available})")]
    MissingColumn {
        /// Column the definition asked for.
        column: String,
        /// Header row, comma-joined.
        available: String,
    },

    /// No built-in dataset has the requested id.
    #[error("Unknown dataset: {id}")]
    UnknownDataset {
        /// Requested id.
        id: String,
    },
}
