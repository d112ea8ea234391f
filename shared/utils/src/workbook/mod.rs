//! Workbook Processing Module
//!
//! Load → header normalization → value cleaning → schema resolution for the
//! mechatronics parts workbook, plus the BOM linker used by the project
//! explorer.

pub mod cleaner;
pub mod linker;
pub mod loader;
pub mod normalizer;
pub mod resolver;

use std::path::Path;

use mechbi_models::{ColumnAliases, Table, WorkbookSchema};

pub use cleaner::{normalize_join_key, CleaningRules, ValueCleaner};
pub use linker::{BomLinker, LinkerRules};
pub use loader::{read_workbook, RawSheets, SheetSelection};
pub use normalizer::normalize_headers;
pub use resolver::{resolve_column, resolve_schema};

use crate::config::DataConfig;
use crate::error::{DashboardError, DashboardResult};

/// The three cleaned sheets and their resolved schema.
#[derive(Debug, Clone, Default)]
pub struct CleanWorkbook {
    pub selection: SheetSelection,
    pub components: Table,
    pub delivery: Table,
    pub projects: Table,
    pub schema: WorkbookSchema,
}

/// Result of one load attempt. A missing or unreadable workbook is reported
/// as `NoData` instead of an error so callers decide how to halt.
#[derive(Debug)]
pub enum LoadOutcome {
    Ready(CleanWorkbook),
    NoData(DashboardError),
}

pub struct WorkbookPipeline {
    cleaner: ValueCleaner,
    aliases: ColumnAliases,
}

impl WorkbookPipeline {
    pub fn new(config: &DataConfig) -> DashboardResult<Self> {
        Ok(Self {
            cleaner: ValueCleaner::new(config.cleaning.clone())?,
            aliases: config.columns.clone(),
        })
    }

    pub fn cleaner(&self) -> &ValueCleaner {
        &self.cleaner
    }

    /// Normalizes, cleans and resolves already-read sheets.
    pub fn process(&self, raw: RawSheets) -> CleanWorkbook {
        let RawSheets {
            selection,
            mut components,
            mut delivery,
            mut projects,
        } = raw;

        for table in [&mut components, &mut delivery, &mut projects] {
            normalize_headers(table);
        }

        let components = self.cleaner.clean_table(&components);
        let delivery = self.cleaner.clean_table(&delivery);
        let projects = self.cleaner.clean_table(&projects);
        let schema = resolve_schema(&components, &delivery, &projects, &self.aliases);

        CleanWorkbook {
            selection,
            components,
            delivery,
            projects,
            schema,
        }
    }

    /// Reads and processes the workbook at `path`.
    pub fn load(&self, path: &Path) -> LoadOutcome {
        match read_workbook(path) {
            Ok(raw) => LoadOutcome::Ready(self.process(raw)),
            Err(error) => {
                tracing::error!(error = %error, path = %path.display(), "Data load failed");
                LoadOutcome::NoData(error)
            }
        }
    }
}
