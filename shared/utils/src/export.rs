//! CSV export of detail tables and linked bills of materials.

use mechbi_models::{LinkedBom, Table, SENTINEL};

use crate::error::{DashboardError, DashboardResult};

/// Serializes a table to CSV. Absent cells are written as empty fields.
pub fn table_to_csv(table: &Table) -> DashboardResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    finish(writer)
}

/// Serializes every BOM line with its slot, match flag and all component
/// attributes.
pub fn bom_to_csv(bom: &LinkedBom) -> DashboardResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec!["Project", "Slot", "Part Number", "Matched"];
    header.extend(bom.attribute_headers.iter().map(String::as_str));
    writer.write_record(&header)?;

    for line in &bom.lines {
        let matched = if line.matched { "yes" } else { "no" };
        let mut record = vec![
            line.project.as_str(),
            line.slot.as_str(),
            line.part_number.as_str(),
            matched,
        ];
        record.extend(line.attributes.iter().map(|a| if a.is_empty() { SENTINEL } else { a.as_str() }));
        writer.write_record(&record)?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> DashboardResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| DashboardError::export(e.to_string()))
}
