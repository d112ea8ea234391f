//! Delivery tracking over the Delivery Sets sheet.

use std::collections::HashMap;

use mechbi_models::{
    DeliveryKpis, DeliverySchema, DeliveryStatus, DeliveryView, SetComposition, Table, SENTINEL,
};

use super::{column, count_containing, filter_in, natural_cmp, natural_sort, percentage, search, unique_values};
use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, Default)]
pub struct DeliveryQuery {
    pub sets: Vec<String>,
    pub search: Option<String>,
}

/// Classifies a status label by substring, first match wins.
pub fn classify_delivery_status(status: &str) -> DeliveryStatus {
    let lower = status.to_lowercase();
    if lower.contains("released") {
        DeliveryStatus::Released
    } else if lower.contains("backorder") {
        DeliveryStatus::Backorder
    } else if lower.contains("split") {
        DeliveryStatus::Split
    } else if lower.contains("out of stock") {
        DeliveryStatus::OutOfStock
    } else {
        DeliveryStatus::Other
    }
}

/// Set and status are required; everything else is optional.
fn required_columns(delivery: &Table, schema: &DeliverySchema) -> DashboardResult<(usize, usize)> {
    if delivery.is_empty() {
        return Err(DashboardError::data_missing("delivery set sheet is empty or missing"));
    }
    let set = column(delivery, schema.set.as_ref())
        .ok_or_else(|| DashboardError::column_unavailable("delivery set"))?;
    let status = column(delivery, schema.status.as_ref())
        .ok_or_else(|| DashboardError::column_unavailable("delivery status"))?;
    Ok((set, status))
}

/// Distinct set labels in natural order ("Set 2" before "Set 10").
pub fn delivery_sets(delivery: &Table, schema: &DeliverySchema) -> DashboardResult<Vec<String>> {
    let (set, _) = required_columns(delivery, schema)?;
    let mut sets = unique_values(delivery, set);
    natural_sort(&mut sets);
    Ok(sets)
}

pub fn delivery_view(delivery: &Table, schema: &DeliverySchema, query: &DeliveryQuery) -> DashboardResult<DeliveryView> {
    let (set, status) = required_columns(delivery, schema)?;
    let part_number = column(delivery, schema.part_number.as_ref());
    let name = column(delivery, schema.name.as_ref());
    let link = column(delivery, schema.link.as_ref());

    let mut view = filter_in(delivery, set, &query.sets);
    let mut filtered = !query.sets.is_empty();

    if let Some(term) = super::search_term(query.search.as_deref()) {
        let targets: Vec<usize> = [name, part_number, Some(status)].into_iter().flatten().collect();
        view = search(&view, &targets, term);
        filtered = true;
    }

    let total = view.len();
    let released = count_containing(&view, status, "released");
    let kpis = DeliveryKpis {
        items_found: total,
        released,
        pending: total - released,
        readiness_pct: percentage(released, total),
    };

    let composition = set_composition(&view, set, status);

    let manifest = filtered.then(|| {
        let columns: Vec<usize> = [Some(set), part_number, name, Some(status), link]
            .into_iter()
            .flatten()
            .collect();
        view.select_columns(&columns)
    });

    Ok(DeliveryView {
        kpis,
        composition,
        filtered,
        manifest,
    })
}

/// Row counts per (set, status), ordered naturally by set.
fn set_composition(table: &Table, set: usize, status: usize) -> Vec<SetComposition> {
    let mut groups: Vec<SetComposition> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for row in table.rows() {
        let text = |c: usize| row.get(c).and_then(|v| v.as_deref()).unwrap_or(SENTINEL).to_string();
        let key = (text(set), text(status));
        match index.get(&key) {
            Some(&idx) => groups[idx].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(SetComposition {
                    class: classify_delivery_status(&key.1),
                    set: key.0,
                    status: key.1,
                    count: 1,
                });
            }
        }
    }

    groups.sort_by(|a, b| natural_cmp(&a.set, &b.set));
    groups
}
