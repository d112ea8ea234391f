//! BOM Linker
//!
//! Turns one wide project row into BOM lines and left-joins them against the
//! cleaned Components sheet on the normalized part number.

use std::collections::HashMap;

use mechbi_models::{BomLine, LinkedBom, ProjectSchema, Table, WorkbookSchema, SENTINEL};
use serde::{Deserialize, Serialize};

use super::cleaner::normalize_join_key;
use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerRules {
    /// Normalized slot values that never name a part.
    pub denylist: Vec<String>,
    /// Slot values shorter than this are discarded.
    pub min_part_number_len: usize,
}

impl Default for LinkerRules {
    fn default() -> Self {
        Self {
            denylist: ["-", "UNKNOWN", "NAN", "NONE", "NAT", "0"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            min_part_number_len: 2,
        }
    }
}

/// A melted (project, slot, part number) reference before joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReference {
    pub project: String,
    pub slot: String,
    pub part_number: String,
}

/// Lookup from normalized part number to the first Components row carrying it.
pub struct ComponentIndex<'a> {
    components: &'a Table,
    rows: HashMap<String, usize>,
}

impl<'a> ComponentIndex<'a> {
    pub fn build(components: &'a Table, part_number_column: &str) -> Option<Self> {
        let column = components.column_index(part_number_column)?;
        let mut rows = HashMap::new();
        for (idx, value) in components.column_values(column).enumerate() {
            if let Some(value) = value {
                rows.entry(normalize_join_key(value)).or_insert(idx);
            }
        }
        Some(Self { components, rows })
    }

    pub fn lookup(&self, part_number: &str) -> Option<&'a [Option<String>]> {
        let row = *self.rows.get(&normalize_join_key(part_number))?;
        self.components.rows().get(row).map(Vec::as_slice)
    }
}

pub struct BomLinker {
    rules: LinkerRules,
    denylist: Vec<String>,
}

impl BomLinker {
    pub fn new(rules: LinkerRules) -> Self {
        let denylist = rules.denylist.iter().map(|d| normalize_join_key(d)).collect();
        Self { rules, denylist }
    }

    /// Sorted, de-duplicated project identifiers.
    pub fn list_projects(projects: &Table, schema: &ProjectSchema) -> Vec<String> {
        let Some(column) = schema.name.as_deref().and_then(|n| projects.column_index(n)) else {
            return Vec::new();
        };

        let mut names: Vec<String> = projects
            .column_values(column)
            .map(|v| v.unwrap_or(SENTINEL).to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Melts the slot columns of `project` into normalized, junk-free
    /// part-number references.
    pub fn melt(
        &self,
        projects: &Table,
        schema: &ProjectSchema,
        project: &str,
    ) -> DashboardResult<Vec<SlotReference>> {
        if projects.is_empty() {
            return Err(DashboardError::data_missing(
                "'Projects Considered' sheet not found",
            ));
        }
        let name_column = schema
            .name
            .as_deref()
            .and_then(|n| projects.column_index(n))
            .ok_or_else(|| DashboardError::column_unavailable("project name"))?;

        let selected: Vec<&Vec<Option<String>>> = projects
            .rows()
            .iter()
            .filter(|row| row[name_column].as_deref().unwrap_or(SENTINEL) == project)
            .collect();
        if selected.is_empty() {
            return Err(DashboardError::not_found(format!("project '{}'", project)));
        }

        let mut references = Vec::new();
        for slot in &schema.component_slots {
            let Some(column) = projects.column_index(slot) else {
                continue;
            };
            for row in &selected {
                let Some(raw) = row[column].as_deref() else {
                    continue;
                };
                let part_number = normalize_join_key(raw);
                if self.is_junk(&part_number) {
                    continue;
                }
                references.push(SlotReference {
                    project: project.to_string(),
                    slot: slot.clone(),
                    part_number,
                });
            }
        }

        Ok(references)
    }

    /// Left-joins slot references against the Components sheet.
    pub fn join(&self, references: Vec<SlotReference>, index: &ComponentIndex<'_>) -> LinkedBom {
        let width = index.components.headers().len();
        let lines = references
            .into_iter()
            .map(|reference| {
                let (matched, attributes) = match index.lookup(&reference.part_number) {
                    Some(row) => (
                        true,
                        row.iter()
                            .map(|cell| match cell.as_deref().map(str::trim) {
                                Some(v) if !v.is_empty() => v.to_string(),
                                _ => SENTINEL.to_string(),
                            })
                            .collect(),
                    ),
                    None => (false, vec![SENTINEL.to_string(); width]),
                };
                BomLine {
                    project: reference.project,
                    slot: reference.slot,
                    part_number: reference.part_number,
                    matched,
                    attributes,
                }
            })
            .collect();

        LinkedBom {
            attribute_headers: index.components.headers().to_vec(),
            lines,
        }
    }

    /// Builds the linked bill of materials for one project.
    pub fn link_project(
        &self,
        project: &str,
        projects: &Table,
        components: &Table,
        schema: &WorkbookSchema,
    ) -> DashboardResult<LinkedBom> {
        let references = self.melt(projects, &schema.projects, project)?;

        let index = schema
            .components
            .part_number
            .as_deref()
            .and_then(|column| ComponentIndex::build(components, column))
            .ok_or_else(|| {
                DashboardError::column_unavailable(
                    "part number column missing in inventory; cannot link project data",
                )
            })?;

        let bom = self.join(references, &index);
        tracing::debug!(
            project,
            lines = bom.len(),
            unmatched = bom.unmatched(),
            "Linked project BOM"
        );
        Ok(bom)
    }

    fn is_junk(&self, part_number: &str) -> bool {
        part_number.chars().count() < self.rules.min_part_number_len
            || self.denylist.iter().any(|d| d == part_number)
    }
}

impl Default for BomLinker {
    fn default() -> Self {
        Self::new(LinkerRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::resolver::resolve_schema;
    use mechbi_models::ColumnAliases;

    fn fixture() -> (Table, Table, WorkbookSchema) {
        let components = Table::from_rows(
            &["MfgNo", "Name", "Status", "Link"],
            &[
                &["ABC-123", "Servo", "Available", "https://example.com/servo"],
                &["DEF-456", "Sensor", "Backorder", ""],
            ],
        );
        let projects = Table::from_rows(
            &["Project", "Component 1", "Component 2", "Component 3", "Component 4"],
            &[
                &["Rover", "ABC-123", "", "-", "xyz999"],
                &["Arm", "def-456.0", "0", "unknown", "X"],
            ],
        );
        let schema = resolve_schema(
            &components,
            &Table::default(),
            &projects,
            &ColumnAliases::default(),
        );
        (components, projects, schema)
    }

    #[test]
    fn test_round_trip_resolved_and_unresolved() {
        let (components, projects, schema) = fixture();
        let bom = BomLinker::default()
            .link_project("Rover", &projects, &components, &schema)
            .unwrap();

        assert_eq!(bom.len(), 2);
        assert_eq!(bom.lines[0].part_number, "ABC-123");
        assert!(bom.lines[0].matched);
        assert_eq!(bom.lines[0].attributes, vec!["ABC-123", "Servo", "Available", "https://example.com/servo"]);

        assert_eq!(bom.lines[1].part_number, "XYZ999");
        assert!(!bom.lines[1].matched);
        assert!(bom.lines[1].attributes.iter().all(|a| a == "-"));
    }

    #[test]
    fn test_keys_normalized_on_both_sides() {
        let (components, projects, schema) = fixture();
        let bom = BomLinker::default()
            .link_project("Arm", &projects, &components, &schema)
            .unwrap();

        assert_eq!(bom.len(), 1);
        assert_eq!(bom.lines[0].part_number, "DEF-456");
        assert!(bom.lines[0].matched);
        // Empty link cell is dashed in the joined output.
        assert_eq!(bom.lines[0].attributes[3], "-");
    }

    #[test]
    fn test_title_cased_inventory_keys_still_match() {
        let components = Table::from_rows(&["Part Number", "Status"], &[&["Abc-123", "Available"]]);
        let projects = Table::from_rows(&["Project", "Component A"], &[&["Rover", "ABC-123"]]);
        let schema = resolve_schema(&components, &Table::default(), &projects, &ColumnAliases::default());

        let bom = BomLinker::default()
            .link_project("Rover", &projects, &components, &schema)
            .unwrap();
        assert!(bom.lines[0].matched);
    }

    #[test]
    fn test_project_without_references_is_empty() {
        let components = Table::from_rows(&["MfgNo"], &[&["ABC-123"]]);
        let projects = Table::from_rows(&["Project", "Component 1"], &[&["Idle", "-"]]);
        let schema = resolve_schema(&components, &Table::default(), &projects, &ColumnAliases::default());

        let bom = BomLinker::default()
            .link_project("Idle", &projects, &components, &schema)
            .unwrap();
        assert!(bom.is_empty());
    }

    #[test]
    fn test_errors() {
        let (components, projects, schema) = fixture();
        let linker = BomLinker::default();

        let err = linker
            .link_project("Missing", &projects, &components, &schema)
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");

        let err = linker
            .link_project("Rover", &Table::default(), &components, &schema)
            .unwrap_err();
        assert_eq!(err.error_code(), "DATA_MISSING");

        let mut no_key = schema.clone();
        no_key.components.part_number = None;
        let err = linker
            .link_project("Rover", &projects, &components, &no_key)
            .unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_UNAVAILABLE");
    }

    #[test]
    fn test_list_projects_sorted_unique() {
        let (_, projects, schema) = fixture();
        assert_eq!(
            BomLinker::list_projects(&projects, &schema.projects),
            vec!["Arm", "Rover"]
        );
    }
}
