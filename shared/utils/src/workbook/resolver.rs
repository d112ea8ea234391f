//! Column Resolver
//!
//! Maps logical fields onto the header names a particular workbook uses.

use std::collections::HashMap;

use mechbi_models::{
    ColumnAliases, ComponentSchema, DeliverySchema, ProjectSchema, Table, WorkbookSchema,
};

/// Returns the first candidate present in `table` (case-insensitive), spelled
/// the way the table spells it. Empty tables never resolve.
pub fn resolve_column<S: AsRef<str>>(table: &Table, candidates: &[S]) -> Option<String> {
    if table.is_empty() {
        return None;
    }

    let by_lower: HashMap<String, &String> = table
        .headers()
        .iter()
        .map(|h| (h.to_lowercase(), h))
        .collect();

    candidates
        .iter()
        .find_map(|c| by_lower.get(&c.as_ref().to_lowercase()))
        .map(|h| (*h).clone())
}

pub fn resolve_components(table: &Table, aliases: &ColumnAliases) -> ComponentSchema {
    let a = &aliases.components;
    ComponentSchema {
        part_number: resolve_column(table, &a.part_number),
        name: resolve_column(table, &a.name),
        category: resolve_column(table, &a.category),
        sub_category: resolve_column(table, &a.sub_category),
        sub_category2: resolve_column(table, &a.sub_category2),
        brand: resolve_column(table, &a.brand),
        status: resolve_column(table, &a.status),
        link: resolve_column(table, &a.link),
    }
}

pub fn resolve_delivery(table: &Table, aliases: &ColumnAliases) -> DeliverySchema {
    let a = &aliases.delivery;
    DeliverySchema {
        set: resolve_column(table, &a.set),
        status: resolve_column(table, &a.status),
        link: resolve_column(table, &a.link),
        name: resolve_column(table, &a.name),
        part_number: resolve_column(table, &a.part_number),
    }
}

pub fn resolve_projects(table: &Table, aliases: &ColumnAliases) -> ProjectSchema {
    if table.is_empty() {
        return ProjectSchema::default();
    }

    let marker = &aliases.projects.slot_marker;
    ProjectSchema {
        name: table.headers().first().cloned(),
        component_slots: table
            .headers()
            .iter()
            .filter(|h| h.contains(marker.as_str()))
            .cloned()
            .collect(),
    }
}

pub fn resolve_schema(
    components: &Table,
    delivery: &Table,
    projects: &Table,
    aliases: &ColumnAliases,
) -> WorkbookSchema {
    let schema = WorkbookSchema {
        components: resolve_components(components, aliases),
        delivery: resolve_delivery(delivery, aliases),
        projects: resolve_projects(projects, aliases),
    };

    if schema.components.part_number.is_none() {
        tracing::warn!("No part number column found in Components; BOM linking disabled");
    }
    tracing::debug!(?schema, "Resolved workbook schema");
    schema
}
