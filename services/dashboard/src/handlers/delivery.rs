//! Delivery Handler
//!
//! Delivery tracking per set.

use axum::{extract::State, response::Json};
use axum_extra::extract::Query;
use mechbi_models::DeliveryView;
use mechbi_utils::analytics::{delivery_sets, delivery_view, DeliveryQuery};
use serde::Deserialize;

use super::{current_snapshot, selection};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryParams {
    #[serde(default)]
    pub sets: Vec<String>,
    pub search: Option<String>,
}

/// GET /api/v1/deliveries/sets
pub async fn list_delivery_sets(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let snapshot = current_snapshot(&state)?;
    let data = &snapshot.data;
    Ok(Json(delivery_sets(&data.delivery, &data.schema.delivery)?))
}

/// GET /api/v1/deliveries
pub async fn get_deliveries(
    State(state): State<AppState>,
    Query(params): Query<DeliveryParams>,
) -> ApiResult<Json<DeliveryView>> {
    let snapshot = current_snapshot(&state)?;
    let data = &snapshot.data;
    let query = DeliveryQuery {
        sets: selection(&params.sets),
        search: params.search,
    };
    Ok(Json(delivery_view(&data.delivery, &data.schema.delivery, &query)?))
}
