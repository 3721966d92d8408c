//! HTTP handler functions for the complaint dashboard API.

use actix_web::{HttpResponse, web};
use complaint_dashboard_analytics::pipeline;
use complaint_dashboard_server_models::{
    ApiCategoryCount, ApiDataset, ApiHealth, DashboardQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dataset`
///
/// Describes the loaded dataset: headers, counts, year bounds, categories.
pub async fn dataset(state: web::Data<AppState>) -> HttpResponse {
    let store = &state.store;
    HttpResponse::Ok().json(ApiDataset {
        id: store.dataset_id().to_string(),
        name: store.dataset_name().to_string(),
        headers: store.headers().to_vec(),
        record_count: store.len(),
        undated_count: store.undated_count(),
        year_bounds: store.year_bounds(),
        categories: store.categories().to_vec(),
    })
}

/// `GET /api/categories`
///
/// Returns every category with its record count over the whole store.
pub async fn categories(state: web::Data<AppState>) -> HttpResponse {
    let counts: Vec<ApiCategoryCount> = state
        .store
        .category_counts()
        .into_iter()
        .map(|(category, count)| ApiCategoryCount { category, count })
        .collect();

    HttpResponse::Ok().json(counts)
}

/// `GET /api/dashboard`
///
/// Runs the filter-and-aggregate pipeline for the requested years and
/// categories and returns the resulting view.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let store = &state.store;
    let query = params.to_query(store.year_bounds());
    let view = pipeline::run(store.records(), &query);

    for warning in &view.warnings {
        log::debug!("Dashboard warning: {warning}");
    }

    HttpResponse::Ok().json(&view)
}
