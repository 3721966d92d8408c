//! The in-memory record snapshot held for a session.

use complaint_dashboard_complaint_models::{
    ComplaintRecord, YearBounds, category_totals, distinct_categories,
};

/// An immutable, fully loaded set of complaint records.
///
/// Year bounds and the category list are derived once at construction.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dataset_id: String,
    dataset_name: String,
    headers: Vec<String>,
    records: Vec<ComplaintRecord>,
    year_bounds: Option<YearBounds>,
    categories: Vec<String>,
}

impl RecordStore {
    /// Builds a store from already-decoded records.
    #[must_use]
    pub fn new(
        dataset_id: impl Into<String>,
        dataset_name: impl Into<String>,
        headers: Vec<String>,
        records: Vec<ComplaintRecord>,
    ) -> Self {
        let year_bounds = YearBounds::from_records(&records);
        let categories = distinct_categories(&records);
        Self {
            dataset_id: dataset_id.into(),
            dataset_name: dataset_name.into(),
            headers,
            records,
            year_bounds,
            categories,
        }
    }

    /// Id of the dataset definition the records were loaded with.
    #[must_use]
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Human-readable dataset name.
    #[must_use]
    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    /// Column headers in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All records in file order.
    #[must_use]
    pub fn records(&self) -> &[ComplaintRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Year bounds over dated records, `None` if nothing is dated.
    #[must_use]
    pub const fn year_bounds(&self) -> Option<YearBounds> {
        self.year_bounds
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of records whose date could not be parsed.
    #[must_use]
    pub fn undated_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.occurred_at.is_none())
            .count()
    }

    /// Record count per category, in first-appearance order.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(String, u64)> {
        let totals = category_totals(&self.records);
        self.categories
            .iter()
            .map(|c| (c.clone(), totals.get(c.as_str()).copied().unwrap_or(0)))
            .collect()
    }
}
