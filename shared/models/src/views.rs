//! Dashboard view documents.
//!
//! These are the serialized shapes handed to the front end. Charts are
//! rendered client-side from the breakdown vectors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::table::Table;

/// One bar/slice of a value-count breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: usize,
}

/// Node of the category → sub-category → sub-category 2 tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub label: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<HierarchyNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryKpis {
    pub parts_found: usize,
    pub available: usize,
    pub availability_pct: u32,
    pub categories: usize,
    pub manufacturers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub kpis: InventoryKpis,
    pub status_breakdown: Vec<CountBucket>,
    pub category_breakdown: Vec<CountBucket>,
    pub top_manufacturers: Vec<CountBucket>,
    pub hierarchy: Vec<HierarchyNode>,
    pub filters_active: bool,
    /// Detail rows, only present while a filter or search is active.
    pub details: Option<Table>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Released,
    Backorder,
    Split,
    OutOfStock,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryKpis {
    pub items_found: usize,
    pub released: usize,
    pub pending: usize,
    pub readiness_pct: u32,
}

/// Count of one status within one delivery set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetComposition {
    pub set: String,
    pub status: String,
    pub class: DeliveryStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryView {
    pub kpis: DeliveryKpis,
    pub composition: Vec<SetComposition>,
    pub filtered: bool,
    pub manifest: Option<Table>,
}

/// One line of a linked project bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub project: String,
    /// Header of the slot column the part number came from.
    pub slot: String,
    pub part_number: String,
    /// False when no component carries this part number.
    pub matched: bool,
    /// Component attributes aligned with `LinkedBom::attribute_headers`,
    /// dashed when unmatched or empty.
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedBom {
    pub attribute_headers: Vec<String>,
    pub lines: Vec<BomLine>,
}

impl LinkedBom {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn attribute_index(&self, header: &str) -> Option<usize> {
        self.attribute_headers.iter().position(|h| h == header)
    }

    pub fn unmatched(&self) -> usize {
        self.lines.iter().filter(|l| !l.matched).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectKpis {
    pub total_components: usize,
    pub in_stock: usize,
    pub missing: usize,
    pub readiness_pct: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectBomView {
    pub project: String,
    pub kpis: ProjectKpis,
    /// `None` when the Components sheet has no status column.
    pub stock_status: Option<Vec<CountBucket>>,
    /// `None` when the Components sheet has no category column.
    pub composition: Option<Vec<CountBucket>>,
    pub bill_of_materials: Table,
}

/// Identity and size of the currently served data snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub id: Uuid,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub component_rows: usize,
    pub delivery_rows: usize,
    pub project_rows: usize,
}
