use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET /api/v1/health/detailed
pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let mut health_status = json!({
        "status": "healthy",
        "service": "mechbi-dashboard",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    health_status["checks"]["data"] = match state.store.snapshot() {
        Ok(snapshot) => json!({
            "status": "healthy",
            "snapshot": snapshot.info(),
            "sheets": snapshot.data.selection,
        }),
        Err(e) => json!({
            "status": "unhealthy",
            "code": e.error_code(),
            "message": e.to_string(),
        }),
    };

    if health_status["checks"]["data"]["status"] != "healthy" {
        health_status["status"] = json!("degraded");
    }

    Json(health_status)
}
