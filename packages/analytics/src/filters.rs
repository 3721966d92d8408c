//! Year-range and category filters.
//!
//! Both filters borrow from the record store and return the passing
//! records in their original order.

use complaint_dashboard_analytics_models::DashboardWarning;
use complaint_dashboard_complaint_models::{CategorySelection, ComplaintRecord, YearRange};

/// Keeps records whose date falls within `range` (inclusive).
///
/// Undated records never pass.
pub fn filter_by_year<'a, I>(records: I, range: YearRange) -> Vec<&'a ComplaintRecord>
where
    I: IntoIterator<Item = &'a ComplaintRecord>,
{
    records
        .into_iter()
        .filter(|r| r.year().is_some_and(|y| range.contains(y)))
        .collect()
}

/// Result of [`filter_by_category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilterOutcome<'a> {
    /// Records that passed.
    pub records: Vec<&'a ComplaintRecord>,
    /// The selection actually applied, with unknown values removed.
    pub selection: CategorySelection,
    /// Set when the applied selection was empty and narrowing was skipped.
    pub warning: Option<DashboardWarning>,
}

/// Keeps records whose category is selected.
///
/// Selected values missing from `known` (the categories observed in the
/// whole data set) are ignored. If nothing is left, the selection counts as
/// empty, which means "no category filter": the input comes back unchanged
/// together with [`DashboardWarning::EmptySelection`].
///
/// `known` is the full category list rather than the categories in
/// `records`, so a real category with no records in the current year range
/// still narrows to an empty result.
pub fn filter_by_category<'a, I>(
    records: I,
    selection: &CategorySelection,
    known: &[String],
) -> CategoryFilterOutcome<'a>
where
    I: IntoIterator<Item = &'a ComplaintRecord>,
{
    let mut applied = selection.clone();
    let dropped = applied.retain_known(known);
    if !dropped.is_empty() {
        log::debug!("Ignoring unknown categories: {}", dropped.join(", "));
    }

    if applied.is_empty() {
        log::debug!("Empty category selection, skipping category filter");
        return CategoryFilterOutcome {
            records: records.into_iter().collect(),
            selection: applied,
            warning: Some(DashboardWarning::EmptySelection),
        };
    }

    CategoryFilterOutcome {
        records: records
            .into_iter()
            .filter(|r| applied.contains(&r.category))
            .collect(),
        selection: applied,
        warning: None,
    }
}
