use axum::{extract::State, response::Json};
use mechbi_models::SnapshotInfo;
use mechbi_utils::DashboardError;

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/v1/data/reload
///
/// Discards the cached snapshot and rebuilds it from the workbook. A failed
/// reload leaves every view answering with the load diagnostic.
pub async fn reload_data(State(state): State<AppState>) -> ApiResult<Json<SnapshotInfo>> {
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|e| DashboardError::internal(format!("reload task failed: {}", e)))?;

    match result {
        Ok(snapshot) => {
            let info = snapshot.info();
            state.metrics.reloads.inc();
            state.metrics.record_snapshot(&info);
            tracing::info!(generation = info.generation, snapshot_id = %info.id, "Data reloaded");
            Ok(Json(info))
        }
        Err(error) => {
            state.metrics.reload_failures.inc();
            Err(error.into())
        }
    }
}
