use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    serve, Router,
};
use mechbi_utils::{init_logging, AppConfig, DataStore};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod error;
mod handlers;
mod metrics;
mod middleware;
mod routes;

use metrics::DashboardMetrics;
use middleware::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Mechatronics BI dashboard");

    // Load the workbook once; without data there is nothing to serve
    let store = Arc::new(DataStore::new(&config.data)?);
    let loader = store.clone();
    let snapshot = tokio::task::spawn_blocking(move || loader.snapshot())
        .await?
        .with_context(|| {
            format!(
                "no data: cannot load workbook '{}'",
                config.data.workbook_path.display()
            )
        })?;

    let metrics = Arc::new(DashboardMetrics::new()?);
    metrics.record_snapshot(&snapshot.info());

    let state = AppState {
        store,
        metrics,
        config: config.clone(),
    };
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Dashboard listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    let mut app = Router::new().route("/health", get(health_check));
    if state.config.monitoring.metrics_enabled {
        app = app.route("/metrics", get(metrics_handler));
    }

    app
        // API routes
        .nest("/api/v1", routes::create_api_routes())
        // Middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(axum::middleware::from_fn(error_handling_middleware)),
        )
        // Application state
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub metrics: Arc<DashboardMetrics>,
    pub config: AppConfig,
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "mechbi-dashboard",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler(State(state): State<AppState>) -> Result<String, (StatusCode, String)> {
    state
        .metrics
        .gather_text()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Error encoding metrics: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use mechbi_utils::DataConfig;
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../shared/utils/tests/fixtures/parts.xlsx")
    }

    fn app_with(workbook_path: PathBuf) -> Router {
        let mut config = AppConfig::default();
        config.data = DataConfig {
            workbook_path,
            ..DataConfig::default()
        };
        let state = AppState {
            store: Arc::new(DataStore::new(&config.data).unwrap()),
            metrics: Arc::new(DashboardMetrics::new().unwrap()),
            config,
        };
        create_app(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app_with(fixture()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = app_with(fixture())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_inventory_endpoint() {
        let (status, body) = get_json(app_with(fixture()), "/api/v1/inventory").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kpis"]["parts_found"], 4);
        assert_eq!(body["filters_active"], false);
        assert!(body["details"].is_null());

        let (_, body) = get_json(app_with(fixture()), "/api/v1/inventory?status=Backorder").await;
        assert_eq!(body["kpis"]["parts_found"], 1);
        assert_eq!(body["details"]["rows"][0][0], "ABC-123");
    }

    #[tokio::test]
    async fn test_inventory_export() {
        let (status, body) = get(app_with(fixture()), "/api/v1/inventory/export?search=pololu").await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(body).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("MfgNo,Mfg,Name,Category,Status,Link"));
        assert!(lines.next().unwrap().starts_with("ABC-123,Pololu,Lidar Sensor"));
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn test_delivery_endpoints() {
        let (status, body) = get_json(app_with(fixture()), "/api/v1/deliveries/sets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["SET 1", "SET 2", "SET 10"]));

        let (_, body) = get_json(app_with(fixture()), "/api/v1/deliveries?sets=SET%202").await;
        assert_eq!(body["kpis"]["items_found"], 2);
        assert_eq!(body["kpis"]["released"], 1);
        assert_eq!(body["filtered"], true);
    }

    #[tokio::test]
    async fn test_multi_select_uses_repeated_keys() {
        let (status, body) =
            get_json(app_with(fixture()), "/api/v1/deliveries?sets=SET%201&sets=SET%202").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kpis"]["items_found"], 3);

        let (_, body) = get_json(
            app_with(fixture()),
            "/api/v1/inventory?status=Backorder&status=Wires%2C%20Cables",
        )
        .await;
        assert_eq!(body["kpis"]["parts_found"], 1);
    }

    #[tokio::test]
    async fn test_project_endpoints() {
        let (_, body) = get_json(app_with(fixture()), "/api/v1/projects").await;
        assert_eq!(body, json!(["Arm", "Rover"]));

        let (status, body) = get_json(app_with(fixture()), "/api/v1/projects/Rover/bom").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kpis"]["total_components"], 2);
        assert_eq!(body["kpis"]["missing"], 2);
        assert_eq!(body["lines"]["lines"][1]["matched"], false);

        let (status, body) = get_json(app_with(fixture()), "/api/v1/projects/Submarine/bom").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_project_export() {
        let (status, body) = get(app_with(fixture()), "/api/v1/projects/Rover/bom/export").await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(body).unwrap();
        assert!(csv.starts_with("Project,Slot,Part Number,Matched"));
        assert!(csv.contains("Rover,Component 4,XYZ999,no"));
    }

    #[tokio::test]
    async fn test_reload_and_metrics() {
        let app = app_with(fixture());
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/data/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["component_rows"], 4);

        let (status, body) = get(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("mechbi_reloads_total 1"));
    }

    #[tokio::test]
    async fn test_missing_workbook_is_service_unavailable() {
        let app = app_with(PathBuf::from("nowhere/parts.xlsx"));
        let (status, body) = get_json(app.clone(), "/api/v1/inventory").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "WORKBOOK_NOT_FOUND");

        let (status, body) = get_json(app, "/api/v1/health/detailed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
    }
}
