//! Prometheus metrics for data snapshots.

use mechbi_models::SnapshotInfo;
use prometheus::{IntCounter, IntGauge, IntGaugeVec, Opts, Registry};

pub struct DashboardMetrics {
    registry: Registry,

    pub reloads: IntCounter,
    pub reload_failures: IntCounter,
    pub rows_loaded: IntGaugeVec,
    pub generation: IntGauge,
}

impl DashboardMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let reloads = IntCounter::new("mechbi_reloads_total", "Successful data reloads")?;
        let reload_failures = IntCounter::new("mechbi_reload_failures_total", "Failed data reloads")?;
        let rows_loaded = IntGaugeVec::new(
            Opts::new("mechbi_rows_loaded", "Rows in the current snapshot"),
            &["table"],
        )?;
        let generation = IntGauge::new("mechbi_snapshot_generation", "Current snapshot generation")?;

        registry.register(Box::new(reloads.clone()))?;
        registry.register(Box::new(reload_failures.clone()))?;
        registry.register(Box::new(rows_loaded.clone()))?;
        registry.register(Box::new(generation.clone()))?;

        Ok(Self {
            registry,
            reloads,
            reload_failures,
            rows_loaded,
            generation,
        })
    }

    /// Publishes the row counts of a freshly loaded snapshot.
    pub fn record_snapshot(&self, info: &SnapshotInfo) {
        let tables = [
            ("components", info.component_rows),
            ("delivery", info.delivery_rows),
            ("projects", info.project_rows),
        ];
        for (table, rows) in tables {
            self.rows_loaded.with_label_values(&[table]).set(rows as i64);
        }
        self.generation.set(info.generation as i64);
    }

    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
