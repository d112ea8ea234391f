pub mod analytics;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod store;
pub mod workbook;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use store::{DataStore, Snapshot};
pub use workbook::{CleanWorkbook, LoadOutcome, WorkbookPipeline};
