//! Interactive dashboard.
//!
//! Shows the dashboard for the current filter state, then lets the user
//! narrow the years or categories and redraws until they quit.

use complaint_dashboard_analytics::pipeline;
use complaint_dashboard_analytics_models::DashboardQuery;
use complaint_dashboard_complaint_models::{CategorySelection, YearRange};
use complaint_dashboard_source::store::RecordStore;
use dialoguer::{Input, MultiSelect, Select};

use crate::render::{DashboardText, RenderOptions};

/// What to do after the dashboard is drawn.
enum DashboardAction {
    ChangeYears,
    ChangeCategories,
    Reset,
    Quit,
}

impl DashboardAction {
    const ALL: &[Self] = &[
        Self::ChangeYears,
        Self::ChangeCategories,
        Self::Reset,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChangeYears => "Change year range",
            Self::ChangeCategories => "Change categories",
            Self::Reset => "Reset filters",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the dashboard loop over `store`.
///
/// Starts from the default filter state (full year range, every category).
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is closed).
pub fn run(store: &RecordStore, options: RenderOptions) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = DashboardAction::ALL
        .iter()
        .map(DashboardAction::label)
        .collect();
    let mut query = DashboardQuery::default();

    loop {
        let view = pipeline::run(store.records(), &query);
        println!();
        print!("{}", DashboardText::new(store, &view, options));

        let idx = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match DashboardAction::ALL[idx] {
            DashboardAction::ChangeYears => {
                if let Some(range) = prompt_years(store, view.year_range)? {
                    query.year_range = Some(range);
                }
            }
            DashboardAction::ChangeCategories => {
                query.selection = Some(prompt_categories(store, &view.selection)?);
            }
            DashboardAction::Reset => query = DashboardQuery::default(),
            DashboardAction::Quit => break,
        }
    }

    Ok(())
}

/// Prompts for the first and last year, pre-filled with `current`.
///
/// Returns `None` when the data has no dated records.
fn prompt_years(
    store: &RecordStore,
    current: Option<YearRange>,
) -> Result<Option<YearRange>, Box<dyn std::error::Error>> {
    let Some(bounds) = store.year_bounds() else {
        println!("No complaint has a usable date; the year filter is unavailable.");
        return Ok(None);
    };
    let current = current.unwrap_or_else(|| bounds.full_range());

    println!(
        "Data covers {}-{}.",
        bounds.min_year, bounds.max_year
    );

    let from: i32 = Input::new()
        .with_prompt("From year")
        .default(current.from_year)
        .interact_text()?;
    let to: i32 = Input::new()
        .with_prompt("To year")
        .default(current.to_year)
        .interact_text()?;

    Ok(Some(YearRange::new(from, to)))
}

/// Prompts for categories via checkboxes, pre-checking `current`.
fn prompt_categories(
    store: &RecordStore,
    current: &CategorySelection,
) -> Result<CategorySelection, Box<dyn std::error::Error>> {
    let categories = store.categories();
    let checked: Vec<bool> = categories.iter().map(|c| current.contains(c)).collect();

    let picked = MultiSelect::new()
        .with_prompt("Categories (space=toggle, a=all, enter=confirm)")
        .items(categories)
        .defaults(&checked)
        .max_length(20)
        .interact()?;

    Ok(picked.into_iter().map(|i| categories[i].clone()).collect())
}
