#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Complaint record types shared across the dashboard toolchain.
//!
//! A [`ComplaintRecord`] is one row of the source file with its date and
//! category columns decoded at load time. [`YearRange`] and
//! [`CategorySelection`] are the two pieces of filter state a user controls.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One complaint entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    /// Zero-based data row index in the source file. Identifies the record.
    pub row: usize,
    /// When the complaint was received. `None` if the source value was
    /// missing or unparseable.
    pub occurred_at: Option<NaiveDateTime>,
    /// Department/ward the complaint concerns. Opaque string.
    pub category: String,
    /// Every raw column value, in header order.
    pub values: Vec<String>,
}

impl ComplaintRecord {
    /// Returns the calendar year of [`Self::occurred_at`], if known.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.occurred_at.map(|dt| dt.year())
    }
}

/// Inclusive year bounds used for date filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRange {
    /// First year included.
    pub from_year: i32,
    /// Last year included.
    pub to_year: i32,
}

impl YearRange {
    /// Creates a range from two years, swapping them if given out of order.
    #[must_use]
    pub const fn new(a: i32, b: i32) -> Self {
        if a <= b {
            Self {
                from_year: a,
                to_year: b,
            }
        } else {
            Self {
                from_year: b,
                to_year: a,
            }
        }
    }

    /// A range covering exactly one year.
    #[must_use]
    pub const fn single(year: i32) -> Self {
        Self {
            from_year: year,
            to_year: year,
        }
    }

    /// Returns `true` if `year` falls within the range (inclusive).
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.from_year <= year && year <= self.to_year
    }

    /// Clamps both ends into `bounds`.
    #[must_use]
    pub fn clamp_to(&self, bounds: YearBounds) -> Self {
        Self::new(
            self.from_year.clamp(bounds.min_year, bounds.max_year),
            self.to_year.clamp(bounds.min_year, bounds.max_year),
        )
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from_year == self.to_year {
            write!(f, "{}", self.from_year)
        } else {
            write!(f, "{}-{}", self.from_year, self.to_year)
        }
    }
}

/// The smallest and largest year observed among dated records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBounds {
    /// Earliest year with at least one dated record.
    pub min_year: i32,
    /// Latest year with at least one dated record.
    pub max_year: i32,
}

impl YearBounds {
    /// Derives the bounds from all records with a valid date.
    ///
    /// Returns `None` when no record has a date.
    #[must_use]
    pub fn from_records(records: &[ComplaintRecord]) -> Option<Self> {
        records
            .iter()
            .filter_map(ComplaintRecord::year)
            .fold(None, |acc, year| match acc {
                None => Some(Self {
                    min_year: year,
                    max_year: year,
                }),
                Some(b) => Some(Self {
                    min_year: b.min_year.min(year),
                    max_year: b.max_year.max(year),
                }),
            })
    }

    /// The range spanning the full bounds.
    #[must_use]
    pub const fn full_range(self) -> YearRange {
        YearRange {
            from_year: self.min_year,
            to_year: self.max_year,
        }
    }
}

/// The set of category values currently included.
///
/// Keeps first-seen order so that per-category output (metric tiles) lays
/// out in a stable order. Duplicates are dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySelection {
    categories: Vec<String>,
}

impl CategorySelection {
    /// An empty selection.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Adds a category unless it is already selected.
    pub fn insert(&mut self, category: impl Into<String>) {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }

    /// Returns `true` if `category` is selected.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of selected categories.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.categories.len()
    }

    /// Iterates the selected categories in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Drops selected values that are not in `known`.
    ///
    /// Returns the dropped values.
    pub fn retain_known(&mut self, known: &[String]) -> Vec<String> {
        let (kept, dropped): (Vec<String>, Vec<String>) = std::mem::take(&mut self.categories)
            .into_iter()
            .partition(|c| known.contains(c));
        self.categories = kept;
        dropped
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::empty();
        for category in iter {
            selection.insert(category);
        }
        selection
    }
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn distinct_categories(records: &[ComplaintRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in records {
        if !seen.contains(&record.category) {
            seen.push(record.category.clone());
        }
    }
    seen
}

/// Record count per category over the whole set, keyed by category.
#[must_use]
pub fn category_totals(records: &[ComplaintRecord]) -> BTreeMap<&str, u64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.category.as_str()).or_insert(0) += 1;
    }
    totals
}
