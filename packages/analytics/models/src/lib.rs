#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query and result types for the complaint filter-and-aggregate pipeline.
//!
//! A [`DashboardQuery`] carries the user's filter state. The pipeline
//! answers it with a [`DashboardView`]: the filtered rows, an
//! [`AggregateResult`], and any [`DashboardWarning`]s the presentation
//! layer should surface.

use complaint_dashboard_complaint_models::{CategorySelection, ComplaintRecord, YearRange};
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

/// Number of complaints in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value as it appears in the data.
    pub category: String,
    /// Number of complaints.
    pub count: u64,
}

/// Number of dated complaints in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of complaints.
    pub count: u64,
}

/// First-year vs last-year comparison for one selected category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryMetric {
    /// Category being compared.
    pub category: String,
    /// Complaints in the first year of the active range.
    pub first_year_count: u64,
    /// Complaints in the last year of the active range.
    pub last_year_count: u64,
    /// `last / first`. `None` when `first_year_count` is zero.
    pub growth: Option<f64>,
    /// Whether `growth` is meaningful (`first_year_count > 0`).
    pub is_applicable: bool,
}

impl BoundaryMetric {
    /// Builds a metric, deriving the growth ratio from the two counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(category: impl Into<String>, first_year_count: u64, last_year_count: u64) -> Self {
        let is_applicable = first_year_count > 0;
        let growth = is_applicable.then(|| last_year_count as f64 / first_year_count as f64);
        Self {
            category: category.into(),
            first_year_count,
            last_year_count,
            growth,
            is_applicable,
        }
    }

    /// Growth formatted for display: `"1,234.50x"` or `"n/a"`.
    #[must_use]
    pub fn format_growth(&self) -> String {
        self.growth
            .map_or_else(|| "n/a".to_string(), |g| format!("{}x", format_ratio(g)))
    }
}

/// Formats a ratio with two decimals and comma thousands separators.
#[must_use]
pub fn format_ratio(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (sign, unsigned) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// Everything derived from one filtered record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Count per category present in the filtered set, largest first.
    pub count_by_category: Vec<CategoryCount>,
    /// Count per year among dated records, ascending by year.
    pub count_by_year: Vec<YearCount>,
    /// One entry per selected category, in selection order.
    pub boundary_metrics: Vec<BoundaryMetric>,
}

impl AggregateResult {
    /// Sum of all category counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.count_by_category.iter().map(|c| c.count).sum()
    }

    /// Count for one category, zero if absent.
    #[must_use]
    pub fn category_count(&self, category: &str) -> u64 {
        self.count_by_category
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    /// Count for one year, zero if absent.
    #[must_use]
    pub fn year_count(&self, year: i32) -> u64 {
        self.count_by_year
            .iter()
            .find(|y| y.year == year)
            .map_or(0, |y| y.count)
    }

    /// Boundary metric for one category, if it was selected.
    #[must_use]
    pub fn boundary_metric(&self, category: &str) -> Option<&BoundaryMetric> {
        self.boundary_metrics
            .iter()
            .find(|m| m.category == category)
    }
}

/// Filter state supplied by the user.
///
/// `None` fields fall back to the defaults: the full year range of the
/// data and every observed category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Requested year range.
    pub year_range: Option<YearRange>,
    /// Requested category selection. `Some` of an empty selection is an
    /// explicit "nothing selected".
    pub selection: Option<CategorySelection>,
}

impl DashboardQuery {
    /// Sets the requested year range.
    #[must_use]
    pub const fn with_year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }

    /// Sets the requested category selection.
    #[must_use]
    pub fn with_selection(mut self, selection: CategorySelection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// A non-fatal condition the presentation layer should show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(tag = "code", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DashboardWarning {
    /// No category selected; category narrowing was skipped.
    EmptySelection,
    /// The requested year range was clamped to the data's bounds.
    RangeClamped {
        /// What was asked for.
        requested: YearRange,
        /// What was applied.
        applied: YearRange,
    },
    /// No record has a usable date, so every year-scoped view is empty.
    NoDatedRecords,
}

impl std::fmt::Display for DashboardWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "Please select at least one category."),
            Self::RangeClamped { requested, applied } => write!(
                f,
                "Requested years {requested} are outside the data; showing {applied}."
            ),
            Self::NoDatedRecords => write!(f, "No complaint has a usable date."),
        }
    }
}

/// The pipeline's answer to a [`DashboardQuery`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    /// Year range actually applied. `None` when no record is dated.
    pub year_range: Option<YearRange>,
    /// Category selection actually applied.
    pub selection: CategorySelection,
    /// Records that passed both filters.
    pub filtered: Vec<&'a ComplaintRecord>,
    /// Aggregates over `filtered`.
    pub aggregate: AggregateResult,
    /// Conditions to surface to the user.
    pub warnings: Vec<DashboardWarning>,
}

impl DashboardView<'_> {
    /// Returns `true` if `warning` was raised.
    #[must_use]
    pub fn has_warning(&self, warning: &DashboardWarning) -> bool {
        self.warnings.contains(warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_applicable_when_first_year_has_entries() {
        let metric = BoundaryMetric::new("A", 4, 6);
        assert!(metric.is_applicable);
        assert!((metric.growth.unwrap() - 1.5).abs() < f64::EPSILON);
        assert_eq!(metric.format_growth(), "1.50x");
    }

    #[test]
    fn growth_not_applicable_when_first_year_empty() {
        let metric = BoundaryMetric::new("A", 0, 9);
        assert!(!metric.is_applicable);
        assert!(metric.growth.is_none());
        assert_eq!(metric.format_growth(), "n/a");
    }

    #[test]
    fn zero_last_year_is_still_applicable() {
        let metric = BoundaryMetric::new("B", 1, 0);
        assert!(metric.is_applicable);
        assert_eq!(metric.growth, Some(0.0));
        assert_eq!(metric.format_growth(), "0.00x");
    }

    #[test]
    fn ratio_formatting_groups_thousands() {
        assert_eq!(format_ratio(1234.5), "1,234.50");
        assert_eq!(format_ratio(1_000_000.0), "1,000,000.00");
        assert_eq!(format_ratio(999.999), "1,000.00");
        assert_eq!(format_ratio(0.333), "0.33");
        assert_eq!(format_ratio(-1234.0), "-1,234.00");
    }

    #[test]
    fn aggregate_lookups_default_to_zero() {
        let aggregate = AggregateResult {
            count_by_category: vec![CategoryCount {
                category: "A".to_string(),
                count: 3,
            }],
            count_by_year: vec![YearCount {
                year: 2020,
                count: 3,
            }],
            boundary_metrics: Vec::new(),
        };
        assert_eq!(aggregate.total(), 3);
        assert_eq!(aggregate.category_count("A"), 3);
        assert_eq!(aggregate.category_count("Z"), 0);
        assert_eq!(aggregate.year_count(2020), 3);
        assert_eq!(aggregate.year_count(1999), 0);
        assert!(aggregate.boundary_metric("A").is_none());
    }

    #[test]
    fn warning_codes_and_messages() {
        let warning = DashboardWarning::EmptySelection;
        assert_eq!(warning.as_ref(), "emptySelection");
        assert_eq!(warning.to_string(), "Please select at least one category.");

        let clamped = DashboardWarning::RangeClamped {
            requested: YearRange::new(1990, 2050),
            applied: YearRange::new(2020, 2023),
        };
        let json = serde_json::to_value(&clamped).unwrap();
        assert_eq!(json["code"], "rangeClamped");
        assert_eq!(json["applied"]["fromYear"], 2020);
        assert_eq!(
            clamped.to_string(),
            "Requested years 1990-2050 are outside the data; showing 2020-2023."
        );
    }

    #[test]
    fn not_applicable_growth_serializes_as_null() {
        let json = serde_json::to_value(BoundaryMetric::new("A", 0, 2)).unwrap();
        assert!(json["growth"].is_null());
        assert_eq!(json["isApplicable"], false);
        assert_eq!(json["lastYearCount"], 2);
    }
}
