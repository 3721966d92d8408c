//! Terminal rendering of a [`DashboardView`].
//!
//! [`DashboardText`] implements [`fmt::Display`] so the same output can be
//! printed or captured as a string.

use std::fmt;

use complaint_dashboard_analytics_models::{BoundaryMetric, DashboardView};
use complaint_dashboard_source::store::RecordStore;
use console::{Alignment, measure_text_width, pad_str, style};

/// Width of the longest bar in the charts, in cells.
const BAR_WIDTH: u64 = 40;
/// Tiles per row in the metrics grid.
const TILE_COLUMNS: usize = 4;
/// Width of one metric tile, in cells.
const TILE_WIDTH: usize = 30;
/// Widest a table column or chart label may grow.
const MAX_COLUMN_WIDTH: usize = 24;

/// Knobs for [`DashboardText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum number of filtered rows printed in the table.
    pub row_limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { row_limit: 20 }
    }
}

/// How a metric tile's growth figure is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaTone {
    /// A real ratio.
    Normal,
    /// No ratio (first year had no complaints); greyed out.
    Off,
}

impl DeltaTone {
    /// Tone for `metric`.
    #[must_use]
    pub const fn for_metric(metric: &BoundaryMetric) -> Self {
        if metric.is_applicable {
            Self::Normal
        } else {
            Self::Off
        }
    }
}

/// One tile of the metrics grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTile {
    /// `"{category} Complaint Count"`.
    pub label: String,
    /// Complaints in the last year of the range.
    pub value: u64,
    /// Growth figure, e.g. `"1.50x"` or `"n/a"`.
    pub delta: String,
    /// How to colour `delta`.
    pub tone: DeltaTone,
}

impl From<&BoundaryMetric> for MetricTile {
    fn from(metric: &BoundaryMetric) -> Self {
        Self {
            label: format!("{} Complaint Count", metric.category),
            value: metric.last_year_count,
            delta: metric.format_growth(),
            tone: DeltaTone::for_metric(metric),
        }
    }
}

/// Title of the metrics section, `None` when no year range applies.
#[must_use]
pub fn metrics_title(view: &DashboardView<'_>) -> Option<String> {
    view.year_range
        .map(|range| format!("Complaint Count in {}", range.to_year))
}

/// Tiles in selection order.
#[must_use]
pub fn metric_tiles(view: &DashboardView<'_>) -> Vec<MetricTile> {
    view.aggregate
        .boundary_metrics
        .iter()
        .map(MetricTile::from)
        .collect()
}

/// A full dashboard, ready to print.
pub struct DashboardText<'a> {
    store: &'a RecordStore,
    view: &'a DashboardView<'a>,
    options: RenderOptions,
}

impl<'a> DashboardText<'a> {
    #[must_use]
    pub const fn new(
        store: &'a RecordStore,
        view: &'a DashboardView<'a>,
        options: RenderOptions,
    ) -> Self {
        Self {
            store,
            view,
            options,
        }
    }

    fn fmt_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} complaints)",
            style(self.store.dataset_name()).bold(),
            self.store.len()
        )?;

        let years = self
            .view
            .year_range
            .map_or_else(|| "no dated complaints".to_string(), |r| r.to_string());
        let categories = if self.view.selection.is_empty() {
            "(none)".to_string()
        } else {
            self.view.selection.iter().collect::<Vec<_>>().join(", ")
        };
        writeln!(f, "Years: {years}")?;
        writeln!(f, "Categories: {categories}")?;

        for warning in &self.view.warnings {
            writeln!(f, "{}", style(format!("! {warning}")).yellow())?;
        }
        writeln!(f)
    }

    fn fmt_rows(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filtered = &self.view.filtered;
        writeln!(
            f,
            "{}",
            style(format!("Filtered complaints ({})", filtered.len())).bold()
        )?;
        if filtered.is_empty() {
            writeln!(f, "  (no matching complaints)")?;
            return writeln!(f);
        }

        let headers = self.store.headers();
        let shown = &filtered[..filtered.len().min(self.options.row_limit)];

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                shown
                    .iter()
                    .filter_map(|r| r.values.get(i))
                    .map(|v| measure_text_width(v))
                    .chain(std::iter::once(measure_text_width(header)))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();

        write_row(f, headers.iter().map(String::as_str), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "  {}", rule.join("  "))?;
        for record in shown {
            write_row(f, record.values.iter().map(String::as_str), &widths)?;
        }

        let hidden = filtered.len() - shown.len();
        if hidden > 0 {
            writeln!(f, "  ... {hidden} more rows")?;
        }
        writeln!(f)
    }

    fn fmt_category_chart(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = &self.view.aggregate.count_by_category;
        writeln!(f, "{}", style("Complaints by category").bold())?;
        if counts.is_empty() {
            writeln!(f, "  (no data)")?;
            return writeln!(f);
        }

        let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
        let label_width = counts
            .iter()
            .map(|c| measure_text_width(&c.category))
            .max()
            .unwrap_or(0)
            .min(MAX_COLUMN_WIDTH);

        for entry in counts {
            writeln!(
                f,
                "  {} {} {}",
                pad_str(&entry.category, label_width, Alignment::Left, Some("…")),
                style(bar(entry.count, max)).cyan(),
                entry.count
            )?;
        }
        writeln!(f)
    }

    fn fmt_year_chart(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = &self.view.aggregate.count_by_year;
        writeln!(f, "{}", style("Complaints by year").bold())?;
        if counts.is_empty() {
            writeln!(f, "  (no data)")?;
            return writeln!(f);
        }

        let max = counts.iter().map(|y| y.count).max().unwrap_or(0);
        for entry in counts {
            writeln!(
                f,
                "  {} {} {}",
                entry.year,
                style(bar(entry.count, max)).blue(),
                entry.count
            )?;
        }
        writeln!(f)
    }

    fn fmt_metrics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(title) = metrics_title(self.view) else {
            return Ok(());
        };
        writeln!(f, "{}", style(title).bold())?;

        let tiles = metric_tiles(self.view);
        if tiles.is_empty() {
            return writeln!(f, "  (no categories selected)");
        }

        for row in tiles.chunks(TILE_COLUMNS) {
            let labels: Vec<String> = row.iter().map(|t| tile_cell(&t.label)).collect();
            writeln!(f, "  {}", labels.join("  ").trim_end())?;

            let values: Vec<String> = row
                .iter()
                .map(|t| {
                    style(tile_cell(&t.value.to_string()))
                        .bold()
                        .to_string()
                })
                .collect();
            writeln!(f, "  {}", values.join("  ").trim_end())?;

            let deltas: Vec<String> = row
                .iter()
                .map(|t| {
                    let cell = tile_cell(&t.delta);
                    match t.tone {
                        DeltaTone::Normal => style(cell).green().to_string(),
                        DeltaTone::Off => style(cell).dim().to_string(),
                    }
                })
                .collect();
            writeln!(f, "  {}", deltas.join("  ").trim_end())?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for DashboardText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_header(f)?;
        self.fmt_rows(f)?;
        self.fmt_category_chart(f)?;
        self.fmt_year_chart(f)?;
        self.fmt_metrics(f)
    }
}

fn write_row<'s>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'s str>,
    widths: &[usize],
) -> fmt::Result {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, Some("…")).into_owned())
        .collect();
    writeln!(f, "  {}", cells.join("  ").trim_end())
}

fn tile_cell(text: &str) -> String {
    pad_str(text, TILE_WIDTH, Alignment::Left, Some("…")).into_owned()
}

/// A bar proportional to `count / max`. Non-zero counts get at least one cell.
fn bar(count: u64, max: u64) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let cells = (count * BAR_WIDTH / max).max(1);
    "█".repeat(usize::try_from(cells).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use complaint_dashboard_analytics::pipeline;
    use complaint_dashboard_analytics_models::DashboardQuery;
    use complaint_dashboard_complaint_models::{CategorySelection, YearRange};
    use complaint_dashboard_source::csv_file::read_records;
    use complaint_dashboard_source::progress::null_progress;
    use complaint_dashboard_source::registry::find_dataset;

    use super::*;

    fn store(csv: &str) -> RecordStore {
        console::set_colors_enabled(false);
        let definition = find_dataset("hospital_complaints").unwrap();
        read_records(csv.as_bytes(), &definition, &null_progress()).unwrap()
    }

    fn scenario() -> RecordStore {
        store(
            "接件日期,涉及科室/病区\n\
             2020-03-01,A\n\
             2020-05-01,B\n\
             2023-01-01,A\n",
        )
    }

    fn render(store: &RecordStore, query: &DashboardQuery, row_limit: usize) -> String {
        let view = pipeline::run(store.records(), query);
        DashboardText::new(store, &view, RenderOptions { row_limit }).to_string()
    }

    #[test]
    fn tone_follows_applicability() {
        assert_eq!(
            DeltaTone::for_metric(&BoundaryMetric::new("A", 2, 3)),
            DeltaTone::Normal
        );
        assert_eq!(
            DeltaTone::for_metric(&BoundaryMetric::new("A", 0, 3)),
            DeltaTone::Off
        );
    }

    #[test]
    fn tiles_use_last_year_count_and_growth() {
        let store = scenario();
        let view = pipeline::run(store.records(), &DashboardQuery::default());
        assert_eq!(
            metrics_title(&view).as_deref(),
            Some("Complaint Count in 2023")
        );

        let tiles = metric_tiles(&view);
        assert_eq!(
            tiles,
            vec![
                MetricTile {
                    label: "A Complaint Count".to_string(),
                    value: 1,
                    delta: "1.00x".to_string(),
                    tone: DeltaTone::Normal,
                },
                MetricTile {
                    label: "B Complaint Count".to_string(),
                    value: 0,
                    delta: "0.00x".to_string(),
                    tone: DeltaTone::Normal,
                },
            ]
        );
    }

    #[test]
    fn not_applicable_tile_reads_na() {
        let store = scenario();
        let query = DashboardQuery::default()
            .with_year_range(YearRange::new(2021, 2023))
            .with_selection(["A"].into_iter().collect());
        let view = pipeline::run(store.records(), &query);
        let tiles = metric_tiles(&view);
        assert_eq!(tiles[0].delta, "n/a");
        assert_eq!(tiles[0].tone, DeltaTone::Off);
    }

    #[test]
    fn grid_wraps_after_four_tiles() {
        let store = store(
            "接件日期,涉及科室/病区\n\
             2020-01-01,c1\n\
             2020-01-01,c2\n\
             2020-01-01,c3\n\
             2020-01-01,c4\n\
             2020-01-01,c5\n",
        );
        let text = render(&store, &DashboardQuery::default(), 0);
        let label_lines: Vec<&str> = text
            .lines()
            .filter(|l| l.contains("Complaint Count") && !l.contains("Complaint Count in"))
            .collect();
        assert_eq!(label_lines.len(), 2);
        assert!(label_lines[0].contains("c1 Complaint Count"));
        assert!(label_lines[0].contains("c4 Complaint Count"));
        assert!(!label_lines[0].contains("c5"));
        assert!(label_lines[1].contains("c5 Complaint Count"));
    }

    #[test]
    fn row_table_is_truncated() {
        let store = scenario();
        let text = render(&store, &DashboardQuery::default(), 2);
        assert!(text.contains("Filtered complaints (3)"));
        assert!(text.contains("... 1 more rows"));
        assert!(text.contains("2020-03-01"));
        assert!(!text.contains("2023-01-01"));
    }

    #[test]
    fn empty_selection_shows_warning() {
        let store = scenario();
        let query = DashboardQuery::default().with_selection(CategorySelection::empty());
        let text = render(&store, &query, 5);
        assert!(text.contains("! Please select at least one category."));
        assert!(text.contains("Categories: (none)"));
        assert!(text.contains("(no categories selected)"));
    }

    #[test]
    fn undated_dataset_skips_metrics() {
        let store = store("接件日期,涉及科室/病区\n,A\nbad,B\n");
        let text = render(&store, &DashboardQuery::default(), 5);
        assert!(text.contains("Years: no dated complaints"));
        assert!(text.contains("(no matching complaints)"));
        assert!(!text.contains("Complaint Count in"));
    }

    #[test]
    fn bars_scale_to_the_largest_count() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).chars().count(), 40);
        assert_eq!(bar(5, 10).chars().count(), 20);
        assert_eq!(bar(1, 1000).chars().count(), 1);
    }
}
