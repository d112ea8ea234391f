use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .route("/inventory", get(get_inventory))
        .route("/inventory/export", get(export_inventory))
        .route("/deliveries", get(get_deliveries))
        .route("/deliveries/sets", get(list_delivery_sets))
        .route("/projects", get(list_projects))
        .route("/projects/:name/bom", get(get_project_bom))
        .route("/projects/:name/bom/export", get(export_project_bom))
        .route("/data/reload", post(reload_data))
}
