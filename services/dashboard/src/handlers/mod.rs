pub mod data;
pub mod delivery;
pub mod health;
pub mod inventory;
pub mod projects;

pub use data::*;
pub use delivery::*;
pub use health::*;
pub use inventory::*;
pub use projects::*;

use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use mechbi_utils::Snapshot;

use crate::error::ApiResult;
use crate::AppState;

/// Multi-select values from a repeated query key (`?status=a&status=b`).
/// Values are taken whole, so commas inside an option survive. Blank
/// entries are dropped; no entries is an empty selection.
pub fn selection(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// The snapshot currently served. Cached after the startup load, so this
/// does not touch the workbook.
pub fn current_snapshot(state: &AppState) -> ApiResult<Arc<Snapshot>> {
    Ok(state.store.snapshot()?)
}

pub fn csv_response(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename.replace('"', "")),
            ),
        ],
        body,
    )
        .into_response()
}
