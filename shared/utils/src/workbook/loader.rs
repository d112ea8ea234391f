//! Sheet Loader
//!
//! Opens the parts workbook and picks the Components, Delivery Sets and
//! Projects Considered sheets by name.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, DataType, Range, Reader, Sheets};
use mechbi_models::Table;
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};

/// Sheet names chosen for each logical table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetSelection {
    pub components: Option<String>,
    pub delivery: Option<String>,
    pub projects: Option<String>,
}

/// The three sheets as read, before any cleaning.
#[derive(Debug, Clone, Default)]
pub struct RawSheets {
    pub selection: SheetSelection,
    pub components: Table,
    pub delivery: Table,
    pub projects: Table,
}

/// Picks sheets by name. Components falls back to the first sheet; the
/// optional sheets stay unselected when nothing matches.
pub fn select_sheets(names: &[String]) -> SheetSelection {
    let find = |pred: &dyn Fn(&str) -> bool| names.iter().find(|n| pred(n)).cloned();

    let components = find(&|n: &str| n.contains("Component")).or_else(|| names.first().cloned());
    let delivery = find(&|n: &str| n.contains("Set") && n.contains("Delivery"))
        .or_else(|| find(&|n: &str| n.contains("Delivery")));
    let projects = find(&|n: &str| n.contains("Project") && n.contains("Considered"));

    SheetSelection {
        components,
        delivery,
        projects,
    }
}

/// Reads the workbook at `path`.
pub fn read_workbook(path: &Path) -> DashboardResult<RawSheets> {
    if !path.exists() {
        return Err(DashboardError::workbook_not_found(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    let selection = select_sheets(&names);

    let components = match &selection.components {
        Some(name) => read_sheet(&mut workbook, name)?,
        None => return Err(DashboardError::workbook_read("workbook contains no sheets")),
    };

    let delivery = match &selection.delivery {
        Some(name) => read_sheet(&mut workbook, name)?,
        None => {
            tracing::warn!("No delivery set sheet found; delivery tracking unavailable");
            Table::default()
        }
    };

    let projects = match &selection.projects {
        Some(name) => read_sheet(&mut workbook, name)?,
        None => {
            tracing::warn!("No 'Projects Considered' sheet found; project explorer unavailable");
            Table::default()
        }
    };

    tracing::info!(
        path = %path.display(),
        components = components.len(),
        delivery = delivery.len(),
        projects = projects.len(),
        "Workbook read"
    );

    Ok(RawSheets {
        selection,
        components,
        delivery,
        projects,
    })
}

fn read_sheet(workbook: &mut Sheets<BufReader<File>>, name: &str) -> DashboardResult<Table> {
    let range = workbook
        .worksheet_range(name)
        .ok_or_else(|| DashboardError::workbook_read(format!("sheet '{}' missing", name)))??;
    Ok(range_to_table(&range))
}

/// First row becomes the headers; empty cells become absent values.
pub fn range_to_table(range: &Range<DataType>) -> Table {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Table::default();
    };

    let mut table = Table::new(unique_headers(header_row));
    for row in rows {
        table.push_row(row.iter().map(cell_text).collect());
    }
    table
}

fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) if s.is_empty() => None,
        DataType::String(s) => Some(s.clone()),
        DataType::DateTime(_) => Some(
            cell.as_datetime()
                .map(format_datetime)
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

/// Midnight timestamps are shown as plain dates.
fn format_datetime(value: chrono::NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Blank headers become `Unnamed: N`; repeats get `.1`, `.2`, ... suffixes.
fn unique_headers(cells: &[DataType]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx));
            let count = seen.entry(base.clone()).or_insert(0);
            let header = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            header
        })
        .collect()
}
