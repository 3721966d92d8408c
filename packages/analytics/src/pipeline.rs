//! Pipeline orchestrator.
//!
//! Resolves the user's [`DashboardQuery`] against the data (defaults,
//! clamping, unknown categories), then runs year filter → category filter →
//! aggregation. The order is fixed so that every aggregate, including the
//! per-year series, reflects only the selected categories.

use complaint_dashboard_analytics_models::{
    AggregateResult, BoundaryMetric, DashboardQuery, DashboardView, DashboardWarning,
};
use complaint_dashboard_complaint_models::{
    CategorySelection, ComplaintRecord, YearBounds, YearRange, distinct_categories,
};

use crate::aggregate::aggregate;
use crate::filters::{filter_by_category, filter_by_year};

/// Answers `query` over `records`.
///
/// * A missing year range defaults to the data's full bounds; a supplied
///   one is clamped into them.
/// * A missing selection defaults to every category in first-appearance
///   order; selected values absent from the data are dropped.
/// * With no dated records at all, the year filter has nothing to keep and
///   the view is empty with [`DashboardWarning::NoDatedRecords`].
#[must_use]
pub fn run<'a>(records: &'a [ComplaintRecord], query: &DashboardQuery) -> DashboardView<'a> {
    let known = distinct_categories(records);
    let selection = resolve_selection(query.selection.as_ref(), &known);

    let Some(bounds) = YearBounds::from_records(records) else {
        log::debug!("No dated records among {}", records.len());
        let mut warnings = vec![DashboardWarning::NoDatedRecords];
        if selection.is_empty() {
            warnings.push(DashboardWarning::EmptySelection);
        }
        let aggregate = AggregateResult {
            boundary_metrics: selection
                .iter()
                .map(|c| BoundaryMetric::new(c, 0, 0))
                .collect(),
            ..AggregateResult::default()
        };
        return DashboardView {
            year_range: None,
            selection,
            filtered: Vec::new(),
            aggregate,
            warnings,
        };
    };

    let requested = query.year_range.unwrap_or_else(|| bounds.full_range());
    let applied = requested.clamp_to(bounds);

    let mut view = run_with(records, applied, selection);
    if applied != requested {
        log::debug!("Clamped requested years {requested} to {applied}");
        view.warnings
            .insert(0, DashboardWarning::RangeClamped { requested, applied });
    }
    view
}

/// Runs the three stages with an explicit range and selection.
///
/// `year_range` is used as given (no clamping). Selected values absent from
/// `records` are dropped, and a selection left empty passes every category
/// with [`DashboardWarning::EmptySelection`], the same as [`run`].
#[must_use]
pub fn run_with(
    records: &[ComplaintRecord],
    year_range: YearRange,
    selection: CategorySelection,
) -> DashboardView<'_> {
    let known = distinct_categories(records);
    let by_year = filter_by_year(records, year_range);
    let outcome = filter_by_category(by_year, &selection, &known);
    let selection = outcome.selection;
    let aggregate = aggregate(&outcome.records, year_range, &selection);

    log::debug!(
        "Years {year_range}, {} categories selected: {} of {} records pass",
        selection.len(),
        outcome.records.len(),
        records.len()
    );

    DashboardView {
        year_range: Some(year_range),
        selection,
        filtered: outcome.records,
        aggregate,
        warnings: outcome.warning.into_iter().collect(),
    }
}

fn resolve_selection(requested: Option<&CategorySelection>, known: &[String]) -> CategorySelection {
    let Some(requested) = requested else {
        return known.iter().cloned().collect();
    };

    let mut selection = requested.clone();
    let dropped = selection.retain_known(known);
    if !dropped.is_empty() {
        log::debug!("Ignoring unknown categories: {}", dropped.join(", "));
    }
    selection
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test_support::{mixed, record, scenario};

    fn all_ranges() -> Vec<YearRange> {
        let mut ranges = Vec::new();
        for from in 2017..=2024 {
            for to in from..=2024 {
                ranges.push(YearRange::new(from, to));
            }
        }
        ranges
    }

    fn all_selections() -> Vec<CategorySelection> {
        vec![
            CategorySelection::empty(),
            ["ER"].into_iter().collect(),
            ["Ward 3", "Pharmacy"].into_iter().collect(),
            ["Pharmacy", "ER", "Ward 3"].into_iter().collect(),
            ["ghost"].into_iter().collect(),
        ]
    }

    #[test]
    fn scenario_end_to_end() {
        let records = scenario();
        let query = DashboardQuery::default()
            .with_year_range(YearRange::new(2020, 2023))
            .with_selection(["A", "B"].into_iter().collect());
        let view = run(&records, &query);

        assert!(view.warnings.is_empty());
        assert_eq!(view.year_range, Some(YearRange::new(2020, 2023)));
        assert_eq!(view.filtered.len(), 3);
        assert_eq!(view.aggregate.category_count("A"), 2);
        assert_eq!(view.aggregate.category_count("B"), 1);
        assert_eq!(view.aggregate.year_count(2020), 2);
        assert_eq!(view.aggregate.year_count(2023), 1);

        let a = view.aggregate.boundary_metric("A").unwrap();
        assert_eq!(a.format_growth(), "1.00x");
        let b = view.aggregate.boundary_metric("B").unwrap();
        assert_eq!((b.first_year_count, b.last_year_count), (1, 0));
        assert!(b.is_applicable);
    }

    #[test]
    fn defaults_to_full_range_and_all_categories() {
        let records = mixed();
        let view = run(&records, &DashboardQuery::default());
        assert_eq!(view.year_range, Some(YearRange::new(2019, 2022)));
        assert_eq!(
            view.selection.iter().collect::<Vec<_>>(),
            ["ER", "Ward 3", "Pharmacy"]
        );
        assert_eq!(view.filtered.len(), 8);
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn clamps_out_of_range_years() {
        let records = mixed();
        let query = DashboardQuery::default().with_year_range(YearRange::new(1990, 2021));
        let view = run(&records, &query);
        assert_eq!(view.year_range, Some(YearRange::new(2019, 2021)));
        assert_eq!(
            view.warnings,
            vec![DashboardWarning::RangeClamped {
                requested: YearRange::new(1990, 2021),
                applied: YearRange::new(2019, 2021),
            }]
        );
    }

    #[test]
    fn range_entirely_outside_data_collapses_to_nearest_year() {
        let records = mixed();
        let query = DashboardQuery::default().with_year_range(YearRange::new(2030, 2040));
        let view = run(&records, &query);
        assert_eq!(view.year_range, Some(YearRange::single(2022)));
        assert_eq!(view.filtered.len(), 2);
    }

    #[test]
    fn empty_selection_warns_and_skips_category_filter() {
        let records = mixed();
        let query = DashboardQuery::default().with_selection(CategorySelection::empty());
        let view = run(&records, &query);
        assert!(view.has_warning(&DashboardWarning::EmptySelection));
        assert_eq!(view.filtered.len(), 8);
        assert!(view.aggregate.boundary_metrics.is_empty());
    }

    #[test]
    fn unknown_categories_are_dropped_from_selection() {
        let records = mixed();
        let query = DashboardQuery::default()
            .with_selection(["ghost", "ER"].into_iter().collect());
        let view = run(&records, &query);
        assert_eq!(view.selection.iter().collect::<Vec<_>>(), ["ER"]);
        assert_eq!(view.aggregate.boundary_metrics.len(), 1);
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn year_series_reflects_selected_categories_only() {
        let records = mixed();
        let query = DashboardQuery::default().with_selection(["Ward 3"].into_iter().collect());
        let view = run(&records, &query);
        let years: Vec<(i32, u64)> = view
            .aggregate
            .count_by_year
            .iter()
            .map(|y| (y.year, y.count))
            .collect();
        assert_eq!(years, [(2019, 1), (2021, 1), (2022, 1)]);
    }

    #[test]
    fn no_dated_records_yields_empty_view() {
        let records = vec![record(0, None, "A"), record(1, None, "B")];
        let view = run(&records, &DashboardQuery::default());
        assert_eq!(view.year_range, None);
        assert!(view.filtered.is_empty());
        assert!(view.has_warning(&DashboardWarning::NoDatedRecords));
        assert_eq!(view.aggregate.boundary_metrics.len(), 2);
        assert!(view.aggregate.boundary_metrics.iter().all(|m| !m.is_applicable));
    }

    #[test]
    fn empty_store_yields_empty_view() {
        let view = run(&[], &DashboardQuery::default());
        assert!(view.filtered.is_empty());
        assert!(view.selection.is_empty());
        assert!(view.has_warning(&DashboardWarning::NoDatedRecords));
        assert!(view.has_warning(&DashboardWarning::EmptySelection));
    }

    #[test]
    fn filtered_is_subset_and_counts_are_conserved() {
        let records = mixed();
        let all_rows: BTreeSet<usize> = records.iter().map(|r| r.row).collect();

        for range in all_ranges() {
            for selection in all_selections() {
                let query = DashboardQuery::default()
                    .with_year_range(range)
                    .with_selection(selection);
                let view = run(&records, &query);

                let rows: BTreeSet<usize> = view.filtered.iter().map(|r| r.row).collect();
                assert_eq!(rows.len(), view.filtered.len(), "duplicate rows");
                assert!(rows.is_subset(&all_rows));
                assert_eq!(view.aggregate.total(), view.filtered.len() as u64);
            }
        }
    }

    #[test]
    fn undated_records_never_reach_year_scoped_output() {
        let records = mixed();
        for range in all_ranges() {
            for selection in all_selections() {
                let query = DashboardQuery::default()
                    .with_year_range(range)
                    .with_selection(selection);
                let view = run(&records, &query);
                assert!(view.filtered.iter().all(|r| r.occurred_at.is_some()));

                let dated: u64 = view.aggregate.count_by_year.iter().map(|y| y.count).sum();
                assert_eq!(dated, view.filtered.len() as u64);
            }
        }
    }

    #[test]
    fn growth_is_not_applicable_whenever_first_year_is_empty() {
        let records = mixed();
        for range in all_ranges() {
            let view = run_with(&records, range, all_selections().swap_remove(3));
            for metric in &view.aggregate.boundary_metrics {
                assert_eq!(metric.is_applicable, metric.first_year_count > 0);
                assert_eq!(metric.growth.is_none(), metric.first_year_count == 0);
            }
        }
    }

    #[test]
    fn run_with_treats_unknown_only_selection_like_run() {
        let records = mixed();
        let range = YearRange::new(2019, 2022);
        let ghost: CategorySelection = ["ghost"].into_iter().collect();

        let direct = run_with(&records, range, ghost.clone());
        let query = DashboardQuery::default()
            .with_year_range(range)
            .with_selection(ghost);
        let resolved = run(&records, &query);

        assert_eq!(direct.warnings, vec![DashboardWarning::EmptySelection]);
        assert!(direct.selection.is_empty());
        assert_eq!(direct.filtered.len(), 8);
        assert!(direct.aggregate.boundary_metrics.is_empty());
        assert_eq!(
            serde_json::to_string(&direct).unwrap(),
            serde_json::to_string(&resolved).unwrap()
        );
    }

    #[test]
    fn single_year_range_has_equal_boundaries() {
        let records = mixed();
        for year in 2019..=2022 {
            let query = DashboardQuery::default().with_year_range(YearRange::single(year));
            let view = run(&records, &query);
            for metric in &view.aggregate.boundary_metrics {
                assert_eq!(metric.first_year_count, metric.last_year_count);
            }
        }
    }

    #[test]
    fn repeated_runs_serialize_identically() {
        let records = mixed();
        let query = DashboardQuery::default()
            .with_year_range(YearRange::new(2019, 2021))
            .with_selection(["ER", "Ward 3"].into_iter().collect());
        let first = serde_json::to_string(&run(&records, &query)).unwrap();
        let second = serde_json::to_string(&run(&records, &query)).unwrap();
        assert_eq!(first, second);
    }
}
