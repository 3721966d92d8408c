//! CSV file loader.
//!
//! Reads a complaint export, resolves the date and category columns named
//! by a [`DatasetDefinition`], and decodes every row into a
//! [`ComplaintRecord`]. Rows with an unreadable date are kept with
//! `occurred_at = None`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use complaint_dashboard_complaint_models::ComplaintRecord;

use crate::SourceError;
use crate::dataset_def::DatasetDefinition;
use crate::progress::ProgressCallback;
use crate::store::RecordStore;

/// Rows between progress updates.
const PROGRESS_BATCH: u64 = 1_000;

/// Loads a CSV file into a [`RecordStore`].
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, the CSV is
/// malformed, or a mapped column is missing.
pub fn load_records(
    path: &Path,
    definition: &DatasetDefinition,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RecordStore, SourceError> {
    log::info!("[{}] Loading {}", definition.id, path.display());

    let file = File::open(path).map_err(|e| SourceError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Ok(meta) = file.metadata() {
        log::debug!("[{}] {} bytes on disk", definition.id, meta.len());
    }

    read_records(BufReader::new(file), definition, progress)
}

/// Reads CSV data from any reader into a [`RecordStore`].
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV is malformed or a mapped column is
/// missing.
pub fn read_records<R: Read>(
    reader: R,
    definition: &DatasetDefinition,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RecordStore, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(definition.delimiter_byte())
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    let date_field = definition.fields.occurred_at.field();
    let date_idx = column_index(&headers, date_field)?;
    let category_idx = column_index(&headers, &definition.fields.category)?;

    log::debug!(
        "[{}] date column '{date_field}' ({}) at {date_idx}, category column '{}' at {category_idx}",
        definition.id,
        definition.fields.occurred_at,
        definition.fields.category,
    );

    progress.set_message(format!("[{}] reading rows", definition.id));

    let mut records = Vec::new();
    let mut undated: u64 = 0;
    let mut pending: u64 = 0;

    for (row, result) in reader.records().enumerate() {
        let raw = result?;

        let values: Vec<String> = (0..headers.len())
            .map(|i| raw.get(i).unwrap_or("").trim().to_owned())
            .collect();

        let occurred_at = definition.fields.occurred_at.parse(&values[date_idx]);
        if occurred_at.is_none() {
            undated += 1;
            log::debug!(
                "[{}] row {row}: unparseable date '{}', keeping as undated",
                definition.id,
                values[date_idx]
            );
        }

        records.push(ComplaintRecord {
            row,
            occurred_at,
            category: values[category_idx].clone(),
            values,
        });

        pending += 1;
        if pending == PROGRESS_BATCH {
            progress.inc(pending);
            pending = 0;
        }
    }
    progress.inc(pending);

    if undated > 0 {
        log::warn!(
            "[{}] {undated} of {} rows have no usable date and are excluded from year-based views",
            definition.id,
            records.len()
        );
    }

    log::info!("[{}] Loaded {} records", definition.id, records.len());
    progress.finish(format!(
        "[{}] loaded {} records",
        definition.id,
        records.len()
    ));

    Ok(RecordStore::new(
        definition.id.clone(),
        definition.name.clone(),
        headers,
        records,
    ))
}

fn column_index(headers: &[String], column: &str) -> Result<usize, SourceError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| SourceError::MissingColumn {
            column: column.to_owned(),
            available: headers.join(", "),
        })
}
