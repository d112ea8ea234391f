//! Project explorer: readiness of one project's linked bill of materials.

use mechbi_models::{ComponentSchema, LinkedBom, ProjectBomView, ProjectKpis, Table};

use super::{count_containing, percentage, top_counts, value_counts};

const TOP_CATEGORIES: usize = 10;
const UNCATEGORIZED: &str = "Uncategorized";
const PART_NUMBER_HEADER: &str = "MfgNo";

/// Display table of a linked BOM: the normalized part number followed by
/// the name, status and link attributes that resolved.
pub fn bom_table(bom: &LinkedBom, schema: &ComponentSchema) -> Table {
    let attributes: Vec<(String, usize)> = [&schema.name, &schema.status, &schema.link]
        .into_iter()
        .flatten()
        .filter_map(|header| bom.attribute_index(header).map(|idx| (header.clone(), idx)))
        .collect();

    let mut headers = vec![PART_NUMBER_HEADER.to_string()];
    headers.extend(attributes.iter().map(|(header, _)| header.clone()));

    let mut table = Table::new(headers);
    for line in &bom.lines {
        let mut row = vec![Some(line.part_number.clone())];
        row.extend(
            attributes
                .iter()
                .map(|&(_, idx)| line.attributes.get(idx).cloned()),
        );
        table.push_row(row);
    }
    table
}

/// Attribute columns of a BOM as a table, for counting.
fn attribute_table(bom: &LinkedBom) -> Table {
    let mut table = Table::new(bom.attribute_headers.clone());
    for line in &bom.lines {
        table.push_row(line.attributes.iter().cloned().map(Some).collect());
    }
    table
}

pub fn project_view(project: &str, bom: &LinkedBom, schema: &ComponentSchema) -> ProjectBomView {
    let attributes = attribute_table(bom);
    let status = schema.status.as_deref().and_then(|h| bom.attribute_index(h));
    let category = schema.category.as_deref().and_then(|h| bom.attribute_index(h));

    let total = bom.len();
    let kpis = match status {
        Some(status) => {
            let in_stock = count_containing(&attributes, status, "available");
            ProjectKpis {
                total_components: total,
                in_stock,
                missing: total - in_stock,
                readiness_pct: percentage(in_stock, total),
            }
        }
        None => ProjectKpis {
            total_components: total,
            in_stock: 0,
            missing: total,
            readiness_pct: 0,
        },
    };

    ProjectBomView {
        project: project.to_string(),
        kpis,
        stock_status: status.map(|c| value_counts(&attributes, c)),
        composition: category.map(|c| top_counts(&attributes, c, Some(UNCATEGORIZED), TOP_CATEGORIES)),
        bill_of_materials: bom_table(bom, schema),
    }
}
