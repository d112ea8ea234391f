//! # Mechatronics BI Domain Models
//!
//! Data shapes shared by the loading pipeline and the dashboard service.
//!
//! ## Key Models
//!
//! - **Table**: an ordered, header-addressed sheet held in memory
//! - **ColumnAliases**: accepted header spellings per logical field
//! - **WorkbookSchema**: the header names resolved for one data snapshot
//! - **LinkedBom**: a project bill of materials joined against inventory
//! - **InventoryView / DeliveryView / ProjectBomView**: dashboard documents

pub mod schema;
pub mod table;
pub mod views;


pub use schema::*;
pub use table::*;
pub use views::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases_prefer_mfg_no() {
        let aliases = ColumnAliases::default();
        assert_eq!(aliases.components.part_number[0], "MfgNo");
        assert_eq!(aliases.delivery.set, vec!["Set No", "Set"]);
        assert_eq!(aliases.projects.slot_marker, "Component");
    }

    #[test]
    fn test_partial_alias_config_keeps_defaults() {
        let aliases: ColumnAliases =
            serde_json::from_str(r#"{"components": {"status": ["Stock State"]}}"#).unwrap();
        assert_eq!(aliases.components.status, vec!["Stock State"]);
        assert_eq!(aliases.components.category, vec!["Category"]);
        assert_eq!(aliases.delivery, DeliveryAliases::default());
    }

    #[test]
    fn test_linked_bom_counts_unmatched() {
        let bom = LinkedBom {
            attribute_headers: vec!["Status".into()],
            lines: vec![
                BomLine {
                    project: "Rover".into(),
                    slot: "Component 1".into(),
                    part_number: "ABC-123".into(),
                    matched: true,
                    attributes: vec!["Available".into()],
                },
                BomLine {
                    project: "Rover".into(),
                    slot: "Component 2".into(),
                    part_number: "XYZ999".into(),
                    matched: false,
                    attributes: vec![SENTINEL.into()],
                },
            ],
        };
        assert_eq!(bom.len(), 2);
        assert_eq!(bom.unmatched(), 1);
        assert_eq!(bom.attribute_index("Status"), Some(0));
    }
}
