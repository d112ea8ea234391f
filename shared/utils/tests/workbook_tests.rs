//! Workbook Integration Tests
//!
//! Load → clean → resolve → link against a small three-sheet workbook.

use std::path::PathBuf;

use mechbi_utils::analytics::{
    delivery_sets, delivery_view, inventory_view, project_view, DeliveryQuery, InventoryQuery,
};
use mechbi_utils::workbook::BomLinker;
use mechbi_utils::{DataConfig, DataStore};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/parts.xlsx")
}

fn store() -> DataStore {
    let config = DataConfig {
        workbook_path: fixture(),
        ..DataConfig::default()
    };
    DataStore::new(&config).unwrap()
}

#[test]
fn test_sheets_are_selected_and_cleaned() {
    let store = store();
    let snapshot = store.snapshot().unwrap();
    let data = &snapshot.data;

    assert_eq!(data.selection.components.as_deref(), Some("Component List"));
    assert_eq!(data.selection.delivery.as_deref(), Some("Delivery Set Status"));
    assert_eq!(data.selection.projects.as_deref(), Some("Projects Considered"));

    let components = &data.components;
    assert_eq!(components.len(), 4);
    // Header whitespace is trimmed; link values are untouched.
    let link = components.column_index("Link").unwrap();
    assert_eq!(components.value(0, link), Some(" https://shop.example/a "));

    let mfg_no = components.column_index("MfgNo").unwrap();
    assert_eq!(components.value(0, mfg_no), Some("2095"));
    assert_eq!(components.value(1, mfg_no), Some("ABC-123"));

    let brand = components.column_index("Mfg").unwrap();
    assert_eq!(components.value(0, brand), Some("DFRobot"));
    assert_eq!(components.value(1, brand), Some("Pololu"));
    assert_eq!(components.value(2, brand), Some("-"));

    let name = components.column_index("Name").unwrap();
    assert_eq!(components.value(0, name), Some("Servo Motor"));
    assert_eq!(components.value(3, name), Some("-"));

    assert_eq!(data.schema.components.sub_category2.as_deref(), Some("SubCategory2"));
    assert_eq!(data.schema.projects.component_slots.len(), 4);
}

#[test]
fn test_snapshot_is_memoized_until_reload() {
    let store = store();
    let first = store.snapshot().unwrap();
    let again = store.snapshot().unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(store.generation(), 1);

    let reloaded = store.reload().unwrap();
    assert_ne!(first.id, reloaded.id);
    assert_eq!(reloaded.generation, 2);
    assert_eq!(reloaded.info().component_rows, 4);
}

#[test]
fn test_inventory_view() {
    let snapshot = store().snapshot().unwrap();
    let data = &snapshot.data;
    let view = inventory_view(&data.components, &data.schema.components, &InventoryQuery::default());

    assert_eq!(view.kpis.parts_found, 4);
    assert_eq!(view.kpis.available, 3);
    assert_eq!(view.kpis.availability_pct, 75);
    assert_eq!(view.kpis.categories, 3);
    assert!(view.hierarchy.iter().any(|n| n.label == "Unknown"));
    assert!(view.details.is_none());
}

#[test]
fn test_delivery_view() {
    let snapshot = store().snapshot().unwrap();
    let data = &snapshot.data;

    let sets = delivery_sets(&data.delivery, &data.schema.delivery).unwrap();
    assert_eq!(sets, vec!["SET 1", "SET 2", "SET 10"]);

    let view = delivery_view(&data.delivery, &data.schema.delivery, &DeliveryQuery::default()).unwrap();
    assert_eq!(view.kpis.items_found, 4);
    assert_eq!(view.kpis.released, 2);
    assert_eq!(view.kpis.readiness_pct, 50);
}

#[test]
fn test_project_bom_round_trip() {
    let store = store();
    let snapshot = store.snapshot().unwrap();
    let data = &snapshot.data;

    assert_eq!(
        BomLinker::list_projects(&data.projects, &data.schema.projects),
        vec!["Arm", "Rover"]
    );

    let rover = store
        .linker()
        .link_project("Rover", &data.projects, &data.components, &data.schema)
        .unwrap();
    assert_eq!(rover.len(), 2);
    assert_eq!(rover.lines[0].part_number, "ABC-123");
    assert!(rover.lines[0].matched);
    assert_eq!(rover.lines[1].part_number, "XYZ999");
    assert!(!rover.lines[1].matched);
    assert!(rover.lines[1].attributes.iter().all(|a| a == "-"));

    let arm = store
        .linker()
        .link_project("Arm", &data.projects, &data.components, &data.schema)
        .unwrap();
    assert_eq!(arm.len(), 2);
    assert_eq!(arm.unmatched(), 0);

    let view = project_view("Arm", &arm, &data.schema.components);
    assert_eq!(view.kpis.in_stock, 2);
    assert_eq!(view.kpis.readiness_pct, 100);
}

#[test]
fn test_unknown_project() {
    let store = store();
    let snapshot = store.snapshot().unwrap();
    let data = &snapshot.data;
    let err = store
        .linker()
        .link_project("Submarine", &data.projects, &data.components, &data.schema)
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}
