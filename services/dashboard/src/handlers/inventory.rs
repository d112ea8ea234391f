//! Inventory Handler
//!
//! Inventory cockpit over the Components sheet.

use axum::{
    extract::State,
    response::{Json, Response},
};
use axum_extra::extract::Query;
use mechbi_models::InventoryView;
use mechbi_utils::analytics::{inventory_details, inventory_view, InventoryQuery};
use mechbi_utils::export::table_to_csv;
use serde::Deserialize;

use super::{csv_response, current_snapshot, selection};
use crate::error::ApiResult;
use crate::AppState;

/// Repeat `status` or `category` once per selected option.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryParams {
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub category: Vec<String>,
    pub search: Option<String>,
}

impl InventoryParams {
    fn to_query(&self) -> InventoryQuery {
        InventoryQuery {
            status: selection(&self.status),
            category: selection(&self.category),
            search: self.search.clone(),
        }
    }
}

/// GET /api/v1/inventory
pub async fn get_inventory(
    State(state): State<AppState>,
    Query(params): Query<InventoryParams>,
) -> ApiResult<Json<InventoryView>> {
    let snapshot = current_snapshot(&state)?;
    let data = &snapshot.data;
    Ok(Json(inventory_view(
        &data.components,
        &data.schema.components,
        &params.to_query(),
    )))
}

/// GET /api/v1/inventory/export
pub async fn export_inventory(
    State(state): State<AppState>,
    Query(params): Query<InventoryParams>,
) -> ApiResult<Response> {
    let snapshot = current_snapshot(&state)?;
    let data = &snapshot.data;
    let details = inventory_details(&data.components, &data.schema.components, &params.to_query());
    let body = table_to_csv(&details)?;
    Ok(csv_response("inventory.csv", body))
}
