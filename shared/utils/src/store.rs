//! Data Store
//!
//! Owns the memoized result of the load-and-clean pipeline. A snapshot is
//! immutable once built; reload builds a fresh snapshot and swaps it in.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use mechbi_models::SnapshotInfo;
use uuid::Uuid;

use crate::config::DataConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::workbook::{BomLinker, CleanWorkbook, LoadOutcome, WorkbookPipeline};

/// One immutable generation of cleaned workbook data.
#[derive(Debug)]
pub struct Snapshot {
    pub id: Uuid,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub source: PathBuf,
    pub data: CleanWorkbook,
}

impl Snapshot {
    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            id: self.id,
            generation: self.generation,
            loaded_at: self.loaded_at,
            source: self.source.display().to_string(),
            component_rows: self.data.components.len(),
            delivery_rows: self.data.delivery.len(),
            project_rows: self.data.projects.len(),
        }
    }
}

#[derive(Debug)]
enum StoreState {
    Empty,
    Ready(Arc<Snapshot>),
    Failed(DashboardError),
}

pub struct DataStore {
    source: PathBuf,
    pipeline: WorkbookPipeline,
    linker: BomLinker,
    state: RwLock<StoreState>,
    generation: AtomicU64,
}

impl DataStore {
    pub fn new(config: &DataConfig) -> DashboardResult<Self> {
        Ok(Self {
            source: config.workbook_path.clone(),
            pipeline: WorkbookPipeline::new(config)?,
            linker: BomLinker::new(config.linker.clone()),
            state: RwLock::new(StoreState::Empty),
            generation: AtomicU64::new(0),
        })
    }

    pub fn linker(&self) -> &BomLinker {
        &self.linker
    }

    /// Returns the current snapshot, loading it on first use. A failed load
    /// is remembered until the next `reload`.
    pub fn snapshot(&self) -> DashboardResult<Arc<Snapshot>> {
        {
            let state = self.state.read().map_err(|_| poisoned())?;
            match &*state {
                StoreState::Ready(snapshot) => return Ok(Arc::clone(snapshot)),
                StoreState::Failed(error) => return Err(error.clone()),
                StoreState::Empty => {}
            }
        }

        let mut state = self.state.write().map_err(|_| poisoned())?;
        if let StoreState::Empty = &*state {
            *state = self.build();
        }
        match &*state {
            StoreState::Ready(snapshot) => Ok(Arc::clone(snapshot)),
            StoreState::Failed(error) => Err(error.clone()),
            StoreState::Empty => Err(DashboardError::internal("data store left empty after load")),
        }
    }

    /// Discards the cached tables and rebuilds them from the workbook.
    pub fn reload(&self) -> DashboardResult<Arc<Snapshot>> {
        tracing::info!(source = %self.source.display(), "Reloading workbook data");
        let next = self.build();

        let mut state = self.state.write().map_err(|_| poisoned())?;
        *state = next;
        match &*state {
            StoreState::Ready(snapshot) => Ok(Arc::clone(snapshot)),
            StoreState::Failed(error) => Err(error.clone()),
            StoreState::Empty => Err(DashboardError::internal("data store left empty after reload")),
        }
    }

    /// Number of snapshots built successfully so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn build(&self) -> StoreState {
        match self.pipeline.load(&self.source) {
            LoadOutcome::Ready(data) => {
                let snapshot = Snapshot {
                    id: Uuid::new_v4(),
                    generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
                    loaded_at: Utc::now(),
                    source: self.source.clone(),
                    data,
                };
                tracing::info!(
                    generation = snapshot.generation,
                    snapshot_id = %snapshot.id,
                    components = snapshot.data.components.len(),
                    delivery = snapshot.data.delivery.len(),
                    projects = snapshot.data.projects.len(),
                    "Data snapshot ready"
                );
                StoreState::Ready(Arc::new(snapshot))
            }
            LoadOutcome::NoData(error) => StoreState::Failed(error),
        }
    }
}

fn poisoned() -> DashboardError {
    DashboardError::internal("data store lock poisoned")
}
