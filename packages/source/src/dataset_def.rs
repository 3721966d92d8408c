//! Config-driven complaint dataset definition.
//!
//! [`DatasetDefinition`] captures everything that differs between complaint
//! exports (column names, date layout, delimiter) in a TOML document, so a
//! single loader handles every dataset.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use strum_macros::{AsRefStr, Display};

use crate::SourceError;
use crate::parsing::{parse_occurred_at, parse_with_formats};

/// A complete dataset definition.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"hospital_complaints"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// CSV path used when none is given on the command line.
    pub default_path: PathBuf,
    /// Field delimiter (default: comma).
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Column mappings.
    pub fields: FieldMapping,
}

/// Maps source column names to the typed record fields.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Column holding the department/ward.
    pub category: String,
    /// How to read the complaint date.
    pub occurred_at: DateExtractor,
}

/// How to read the `occurred_at` value from its column.
#[derive(Debug, Clone, Deserialize, Display, AsRefStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DateExtractor {
    /// Try the built-in layouts.
    Simple {
        /// Column name.
        field: String,
    },
    /// Try the listed chrono layouts first, then the built-in ones.
    Formats {
        /// Column name.
        field: String,
        /// chrono `strftime` layouts.
        formats: Vec<String>,
    },
}

impl DateExtractor {
    /// Column the date is read from.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Simple { field } | Self::Formats { field, .. } => field,
        }
    }

    /// Parses a raw column value. Unparseable input yields `None`.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        match self {
            Self::Simple { .. } => parse_occurred_at(raw),
            Self::Formats { formats, .. } => parse_with_formats(raw, formats),
        }
    }
}

impl DatasetDefinition {
    /// Returns the unique dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The delimiter byte to hand to the CSV reader.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
            .as_deref()
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(b',')
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, SourceError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Reads and parses a dataset definition from a TOML file.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_dataset_file(path: &Path) -> Result<DatasetDefinition, SourceError> {
    let contents = std::fs::read_to_string(path)?;
    let definition = parse_dataset_toml(&contents)?;
    log::debug!(
        "Loaded dataset definition '{}' from {}",
        definition.id,
        path.display()
    );
    Ok(definition)
}
