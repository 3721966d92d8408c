//! Aggregates over a filtered record set.
//!
//! Counts per category and per year, plus the first-year/last-year
//! comparison for each selected category.

use std::collections::{BTreeMap, HashMap};

use complaint_dashboard_analytics_models::{
    AggregateResult, BoundaryMetric, CategoryCount, YearCount,
};
use complaint_dashboard_complaint_models::{CategorySelection, ComplaintRecord, YearRange};

/// Computes every aggregate over `filtered`.
///
/// `year_range` supplies the two boundary years; `selection` decides which
/// categories get a [`BoundaryMetric`] and in what order.
#[must_use]
pub fn aggregate(
    filtered: &[&ComplaintRecord],
    year_range: YearRange,
    selection: &CategorySelection,
) -> AggregateResult {
    AggregateResult {
        count_by_category: count_by_category(filtered),
        count_by_year: count_by_year(filtered),
        boundary_metrics: boundary_metrics(filtered, year_range, selection),
    }
}

/// Counts records per category, largest first, ties by name.
///
/// Categories with no records are omitted.
#[must_use]
pub fn count_by_category(filtered: &[&ComplaintRecord]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in filtered {
        *counts.entry(record.category.as_str()).or_insert(0) += 1;
    }

    let mut result: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    result
}

/// Counts dated records per year, ascending by year.
#[must_use]
pub fn count_by_year(filtered: &[&ComplaintRecord]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for year in filtered.iter().filter_map(|r| r.year()) {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// First-year and last-year counts for each selected category.
///
/// When the range covers a single year both counts read the same year and
/// are equal.
#[must_use]
pub fn boundary_metrics(
    filtered: &[&ComplaintRecord],
    year_range: YearRange,
    selection: &CategorySelection,
) -> Vec<BoundaryMetric> {
    let mut first: HashMap<&str, u64> = HashMap::new();
    let mut last: HashMap<&str, u64> = HashMap::new();

    for record in filtered {
        let Some(year) = record.year() else {
            continue;
        };
        if year == year_range.from_year {
            *first.entry(record.category.as_str()).or_insert(0) += 1;
        }
        if year == year_range.to_year {
            *last.entry(record.category.as_str()).or_insert(0) += 1;
        }
    }

    selection
        .iter()
        .map(|category| {
            BoundaryMetric::new(
                category,
                first.get(category).copied().unwrap_or(0),
                last.get(category).copied().unwrap_or(0),
            )
        })
        .collect()
}
