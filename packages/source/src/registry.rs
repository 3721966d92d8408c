//! Dataset registry. Loads the built-in dataset definitions from embedded
//! TOML configs.
//!
//! Each `.toml` file in `packages/source/datasets/` is baked into the binary
//! at compile time via [`include_str!`].

use std::path::Path;

use crate::SourceError;
use crate::dataset_def::{DatasetDefinition, load_dataset_file, parse_dataset_toml};

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[
    (
        "hospital_complaints",
        include_str!("../datasets/hospital_complaints.toml"),
    ),
    (
        "service_requests",
        include_str!("../datasets/service_requests.toml"),
    ),
];

/// Identifier of the dataset used when none is requested.
pub const DEFAULT_DATASET_ID: &str = "hospital_complaints";

/// Returns all built-in dataset definitions.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed.
#[must_use]
pub fn all_datasets() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a built-in dataset by id.
#[must_use]
pub fn find_dataset(id: &str) -> Option<DatasetDefinition> {
    all_datasets().into_iter().find(|d| d.id == id)
}

/// Picks the dataset definition for a session.
///
/// A definition file takes precedence over the built-in `id`.
///
/// # Errors
///
/// Returns [`SourceError::UnknownDataset`] if no built-in matches `id`, or
/// any error from reading `file`.
pub fn resolve_dataset(id: &str, file: Option<&Path>) -> Result<DatasetDefinition, SourceError> {
    if let Some(file) = file {
        return load_dataset_file(file);
    }
    find_dataset(id).ok_or_else(|| SourceError::UnknownDataset { id: id.to_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_datasets() {
        assert_eq!(all_datasets().len(), DATASET_TOMLS.len());
    }

    #[test]
    fn dataset_ids_are_unique_and_match_keys() {
        let datasets = all_datasets();
        for ((key, _), def) in DATASET_TOMLS.iter().zip(&datasets) {
            assert_eq!(*key, def.id);
        }
        let mut ids: Vec<&str> = datasets.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DATASET_TOMLS.len());
    }

    #[test]
    fn default_dataset_exists() {
        assert!(find_dataset(DEFAULT_DATASET_ID).is_some());
        assert!(find_dataset("nope").is_none());
    }

    #[test]
    fn resolve_reports_unknown_ids() {
        let def = resolve_dataset("service_requests", None).unwrap();
        assert_eq!(def.fields.category, "Agency");

        match resolve_dataset("nope", None) {
            Err(SourceError::UnknownDataset { id }) => assert_eq!(id, "nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn resolve_prefers_a_definition_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
id = "custom"
name = "Custom Complaints"
default_path = "data/custom.csv"
delimiter = ";"

[fields]
category = "Dept"

[fields.occurred_at]
type = "simple"
field = "Opened"
"#,
        )
        .unwrap();

        let def = resolve_dataset("hospital_complaints", Some(&path)).unwrap();
        assert_eq!(def.id, "custom");
        assert_eq!(def.fields.category, "Dept");
        assert_eq!(def.fields.occurred_at.field(), "Opened");
        assert_eq!(def.delimiter.as_deref(), Some(";"));
    }

    #[test]
    fn resolve_reports_missing_or_invalid_definition_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            resolve_dataset(DEFAULT_DATASET_ID, Some(&missing)),
            Err(SourceError::Io(_))
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "id = \"broken\"\n").unwrap();
        assert!(resolve_dataset(DEFAULT_DATASET_ID, Some(&broken)).is_err());
    }
}
