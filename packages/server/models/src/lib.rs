#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the complaint dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are kept apart
//! from the record store so the API contract can evolve independently.

use complaint_dashboard_analytics_models::DashboardQuery;
use complaint_dashboard_complaint_models::{CategorySelection, YearBounds, YearRange};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Description of the loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDataset {
    /// Dataset definition id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Total records loaded.
    pub record_count: usize,
    /// Records without a usable date.
    pub undated_count: usize,
    /// Year bounds over dated records.
    pub year_bounds: Option<YearBounds>,
    /// Distinct categories in first-appearance order.
    pub categories: Vec<String>,
}

/// A category with its record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategoryCount {
    /// Category value.
    pub category: String,
    /// Number of records.
    pub count: u64,
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// First year of the range.
    pub from: Option<i32>,
    /// Last year of the range.
    pub to: Option<i32>,
    /// Comma-separated categories. Absent selects everything; present but
    /// empty is an explicit empty selection.
    pub categories: Option<String>,
}

impl DashboardQueryParams {
    /// Converts the raw parameters into a pipeline query.
    ///
    /// A missing end of the range is filled from `bounds`. Without bounds
    /// a lone end becomes a single-year range.
    #[must_use]
    pub fn to_query(&self, bounds: Option<YearBounds>) -> DashboardQuery {
        let year_range = match (self.from, self.to) {
            (None, None) => None,
            (Some(from), Some(to)) => Some(YearRange::new(from, to)),
            (Some(from), None) => Some(bounds.map_or_else(
                || YearRange::single(from),
                |b| YearRange::new(from, b.max_year),
            )),
            (None, Some(to)) => Some(bounds.map_or_else(
                || YearRange::single(to),
                |b| YearRange::new(b.min_year, to),
            )),
        };

        DashboardQuery {
            year_range,
            selection: self.categories.as_deref().map(parse_category_list),
        }
    }
}

/// Splits a comma-separated list, trimming and skipping blanks.
#[must_use]
pub fn parse_category_list(raw: &str) -> CategorySelection {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}
