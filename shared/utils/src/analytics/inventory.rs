//! Inventory cockpit: KPIs and breakdowns over the cleaned Components sheet.

use mechbi_models::{ComponentSchema, HierarchyNode, InventoryKpis, InventoryView, Table, SENTINEL};

use super::{
    column, count_containing, distinct_count, filter_in, percentage, search, top_counts,
    unique_values, value_counts,
};

const TOP_CATEGORIES: usize = 12;
const TOP_MANUFACTURERS: usize = 25;
const UNKNOWN_CATEGORY: &str = "Unknown";

/// Inventory filters. Empty selections keep every row.
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub status: Vec<String>,
    pub category: Vec<String>,
    pub search: Option<String>,
}

/// Column indices of the resolved Components fields.
struct Columns {
    part_number: Option<usize>,
    name: Option<usize>,
    category: Option<usize>,
    sub_category: Option<usize>,
    sub_category2: Option<usize>,
    brand: Option<usize>,
    status: Option<usize>,
    link: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table, schema: &ComponentSchema) -> Self {
        Self {
            part_number: column(table, schema.part_number.as_ref()),
            name: column(table, schema.name.as_ref()),
            category: column(table, schema.category.as_ref()),
            sub_category: column(table, schema.sub_category.as_ref()),
            sub_category2: column(table, schema.sub_category2.as_ref()),
            brand: column(table, schema.brand.as_ref()),
            status: column(table, schema.status.as_ref()),
            link: column(table, schema.link.as_ref()),
        }
    }

    fn detail(&self) -> Vec<usize> {
        [
            self.part_number,
            self.brand,
            self.name,
            self.category,
            self.status,
            self.link,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A selection narrows the view only when it leaves some option out.
fn narrows(table: &Table, column: usize, selected: &[String]) -> bool {
    !selected.is_empty()
        && unique_values(table, column)
            .iter()
            .any(|option| !selected.contains(option))
}

/// Applies the status/category selections and the search term.
fn apply_filters(components: &Table, cols: &Columns, query: &InventoryQuery) -> (Table, bool) {
    let mut filtered = components.clone();
    let mut filters_active = false;

    if let Some(status) = cols.status {
        filters_active |= narrows(components, status, &query.status);
        filtered = filter_in(&filtered, status, &query.status);
    }
    if let Some(category) = cols.category {
        filters_active |= narrows(components, category, &query.category);
        filtered = filter_in(&filtered, category, &query.category);
    }

    if let Some(term) = super::search_term(query.search.as_deref()) {
        let targets: Vec<usize> = [cols.part_number, cols.name, cols.brand]
            .into_iter()
            .flatten()
            .collect();
        filtered = search(&filtered, &targets, term);
        filters_active = true;
    }

    (filtered, filters_active)
}

/// Detail rows (part number, brand, name, category, status, link) that
/// survive the filters, whether or not any filter is active.
pub fn inventory_details(components: &Table, schema: &ComponentSchema, query: &InventoryQuery) -> Table {
    let cols = Columns::resolve(components, schema);
    let (filtered, _) = apply_filters(components, &cols, query);
    filtered.select_columns(&cols.detail())
}

/// Builds the KPI and breakdown view of the (filtered) Components sheet.
pub fn inventory_view(components: &Table, schema: &ComponentSchema, query: &InventoryQuery) -> InventoryView {
    let cols = Columns::resolve(components, schema);
    let (filtered, filters_active) = apply_filters(components, &cols, query);

    let total = filtered.len();
    let available = cols
        .status
        .map_or(0, |c| count_containing(&filtered, c, "available"));

    let kpis = InventoryKpis {
        parts_found: total,
        available,
        availability_pct: percentage(available, total),
        categories: cols.category.map_or(0, |c| distinct_count(&filtered, c)),
        manufacturers: cols.brand.map_or(0, |c| distinct_count(&filtered, c)),
    };

    let status_breakdown = cols
        .status
        .map(|c| value_counts(&filtered, c))
        .unwrap_or_default();
    let category_breakdown = cols
        .category
        .map(|c| top_counts(&filtered, c, None, TOP_CATEGORIES))
        .unwrap_or_default();
    let top_manufacturers = cols
        .brand
        .map(|c| top_counts(&filtered, c, None, TOP_MANUFACTURERS))
        .unwrap_or_default();

    let hierarchy = match (cols.category, cols.sub_category) {
        (Some(cat), Some(sub)) => {
            let sub2 = cols
                .sub_category2
                .filter(|&c| filtered.column_values(c).any(|v| v.is_some()));
            category_hierarchy(&filtered, cat, sub, sub2)
        }
        _ => Vec::new(),
    };

    let details = filters_active.then(|| filtered.select_columns(&cols.detail()));

    tracing::debug!(
        parts_found = kpis.parts_found,
        available = kpis.available,
        filters_active,
        "Inventory view built"
    );

    InventoryView {
        kpis,
        status_breakdown,
        category_breakdown,
        top_manufacturers,
        hierarchy,
        filters_active,
        details,
    }
}

/// Category → sub-category → sub-category 2 tree. A dashed category is
/// shown as `Unknown`; children are ordered by count, ties by first seen.
fn category_hierarchy(table: &Table, cat: usize, sub: usize, sub2: Option<usize>) -> Vec<HierarchyNode> {
    let mut roots: Vec<HierarchyNode> = Vec::new();

    for row in table.rows() {
        let text = |c: usize| row.get(c).and_then(|v| v.as_deref()).unwrap_or(SENTINEL);
        let category = match text(cat) {
            SENTINEL => UNKNOWN_CATEGORY,
            other => other,
        };

        let mut path = vec![category, text(sub)];
        if let Some(sub2) = sub2 {
            path.push(text(sub2));
        }
        insert_path(&mut roots, &path);
    }

    sort_nodes(&mut roots);
    roots
}

fn insert_path(nodes: &mut Vec<HierarchyNode>, path: &[&str]) {
    let Some((label, rest)) = path.split_first() else {
        return;
    };
    let idx = match nodes.iter().position(|n| n.label == *label) {
        Some(idx) => idx,
        None => {
            nodes.push(HierarchyNode {
                label: label.to_string(),
                count: 0,
                children: Vec::new(),
            });
            nodes.len() - 1
        }
    };
    nodes[idx].count += 1;
    insert_path(&mut nodes[idx].children, rest);
}

fn sort_nodes(nodes: &mut [HierarchyNode]) {
    nodes.sort_by(|a, b| b.count.cmp(&a.count));
    for node in nodes {
        sort_nodes(&mut node.children);
    }
}
