//! Column schemas for the three workbook sheets.
//!
//! Header names drift between workbook revisions, so every logical field is
//! described by an ordered list of accepted header aliases (most preferred
//! first). The aliases are resolved once per data snapshot into the
//! `*Schema` structs below, which carry the header names actually present.

use serde::{Deserialize, Serialize};

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Accepted header aliases for the Components sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentAliases {
    pub part_number: Vec<String>,
    pub name: Vec<String>,
    pub category: Vec<String>,
    pub sub_category: Vec<String>,
    pub sub_category2: Vec<String>,
    pub brand: Vec<String>,
    pub status: Vec<String>,
    pub link: Vec<String>,
}

impl Default for ComponentAliases {
    fn default() -> Self {
        Self {
            part_number: aliases(&["MfgNo", "Mfg No", "PartNo", "Part Number"]),
            name: aliases(&["Name", "Description", "Component Name"]),
            category: aliases(&["Category"]),
            sub_category: aliases(&["SubCategory"]),
            sub_category2: aliases(&["SubCategory2"]),
            brand: aliases(&["Mfg", "Manufacturer", "Brand"]),
            status: aliases(&["Status"]),
            link: aliases(&["Link", "Url"]),
        }
    }
}

/// Accepted header aliases for the Delivery Sets sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryAliases {
    pub set: Vec<String>,
    pub status: Vec<String>,
    pub link: Vec<String>,
    pub name: Vec<String>,
    pub part_number: Vec<String>,
}

impl Default for DeliveryAliases {
    fn default() -> Self {
        Self {
            set: aliases(&["Set No", "Set"]),
            status: aliases(&["Final Status", "Status"]),
            link: aliases(&["Link", "Url"]),
            name: aliases(&["xDesign Name", "Name", "Description", "Component Name"]),
            part_number: aliases(&["Mfg No", "MfgNo", "Part No"]),
        }
    }
}

/// How project rows are laid out in the Projects Considered sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    /// Case-sensitive marker identifying component slot headers.
    pub slot_marker: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            slot_marker: "Component".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub components: ComponentAliases,
    pub delivery: DeliveryAliases,
    pub projects: ProjectLayout,
}

/// Resolved Components columns. `None` means the workbook has no such column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentSchema {
    pub part_number: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub sub_category2: Option<String>,
    pub brand: Option<String>,
    pub status: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliverySchema {
    pub set: Option<String>,
    pub status: Option<String>,
    pub link: Option<String>,
    pub name: Option<String>,
    pub part_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSchema {
    /// First column of the sheet, holding the project identifier.
    pub name: Option<String>,
    pub component_slots: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkbookSchema {
    pub components: ComponentSchema,
    pub delivery: DeliverySchema,
    pub projects: ProjectSchema,
}
