use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DashboardError {
    #[error("Workbook not found: {path}")]
    WorkbookNotFound { path: String },

    #[error("Workbook read error: {message}")]
    WorkbookRead { message: String },

    #[error("Data missing: {message}")]
    DataMissing { message: String },

    #[error("Column unavailable: {field}")]
    ColumnUnavailable { field: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl DashboardError {
    pub fn workbook_not_found(path: impl Into<String>) -> Self {
        Self::WorkbookNotFound { path: path.into() }
    }

    pub fn workbook_read(message: impl Into<String>) -> Self {
        Self::WorkbookRead {
            message: message.into(),
        }
    }

    pub fn data_missing(message: impl Into<String>) -> Self {
        Self::DataMissing {
            message: message.into(),
        }
    }

    pub fn column_unavailable(field: impl Into<String>) -> Self {
        Self::ColumnUnavailable {
            field: field.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::WorkbookNotFound { .. } => "WORKBOOK_NOT_FOUND",
            Self::WorkbookRead { .. } => "WORKBOOK_READ_ERROR",
            Self::DataMissing { .. } => "DATA_MISSING",
            Self::ColumnUnavailable { .. } => "COLUMN_UNAVAILABLE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Export { .. } => "EXPORT_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::WorkbookNotFound { .. } => 503,
            Self::WorkbookRead { .. } => 503,
            Self::DataMissing { .. } => 409,
            Self::ColumnUnavailable { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::Configuration { .. } => 500,
            Self::Export { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// True when the whole data set is unavailable, as opposed to one view.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Self::WorkbookNotFound { .. } | Self::WorkbookRead { .. }
        )
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<DashboardError> for ErrorResponse {
    fn from(error: DashboardError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl From<calamine::Error> for DashboardError {
    fn from(error: calamine::Error) -> Self {
        Self::workbook_read(error.to_string())
    }
}

impl From<csv::Error> for DashboardError {
    fn from(error: csv::Error) -> Self {
        Self::export(error.to_string())
    }
}

impl From<regex::Error> for DashboardError {
    fn from(error: regex::Error) -> Self {
        Self::configuration(error.to_string())
    }
}
