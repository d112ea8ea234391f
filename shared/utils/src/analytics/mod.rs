//! Aggregation and KPI helpers shared by the dashboard views.

pub mod delivery;
pub mod inventory;
pub mod projects;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use mechbi_models::{CountBucket, Table, SENTINEL};

pub use delivery::{classify_delivery_status, delivery_sets, delivery_view, DeliveryQuery};
pub use inventory::{inventory_details, inventory_view, InventoryQuery};
pub use projects::project_view;

/// Whole-number percentage, 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part * 100 / total) as u32
}

/// Orders digit runs numerically and text case-insensitively ("Set 2" < "Set 10").
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b)
}

pub fn natural_sort(values: &mut [String]) {
    values.sort_by(|a, b| natural_cmp(a, b));
}

fn cell_text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or(SENTINEL)
}

/// Value counts sorted by count descending; ties keep first appearance.
pub fn value_counts(table: &Table, column: usize) -> Vec<CountBucket> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for value in table.column_values(column) {
        let label = value.unwrap_or(SENTINEL);
        match counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                counts.insert(label.to_string(), 1);
                order.push(label.to_string());
            }
        }
    }

    let mut buckets: Vec<CountBucket> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            CountBucket { label, count }
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Like `value_counts`, with `-` relabelled and the result truncated.
pub fn top_counts(table: &Table, column: usize, dash_label: Option<&str>, limit: usize) -> Vec<CountBucket> {
    let mut buckets = value_counts(table, column);
    if let Some(label) = dash_label {
        relabel_sentinel(&mut buckets, label);
    }
    buckets.truncate(limit);
    buckets
}

/// Renames the `-` bucket, merging it into an existing bucket of that name.
pub fn relabel_sentinel(buckets: &mut Vec<CountBucket>, label: &str) {
    let Some(dash) = buckets.iter().position(|b| b.label == SENTINEL) else {
        return;
    };
    match buckets.iter().position(|b| b.label == label) {
        Some(existing) => {
            let count = buckets[dash].count;
            buckets[existing].count += count;
            buckets.remove(dash);
            buckets.sort_by(|a, b| b.count.cmp(&a.count));
        }
        None => buckets[dash].label = label.to_string(),
    }
}

pub fn distinct_count(table: &Table, column: usize) -> usize {
    table
        .column_values(column)
        .map(|v| v.unwrap_or(SENTINEL))
        .collect::<HashSet<_>>()
        .len()
}

/// Sorted distinct values of one column, the options of a multi-select filter.
pub fn unique_values(table: &Table, column: usize) -> Vec<String> {
    let mut values: Vec<String> = table
        .column_values(column)
        .map(|v| v.unwrap_or(SENTINEL).to_string())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    values.sort();
    values
}

/// Rows whose value in `column` contains `needle`, ignoring case.
pub fn count_containing(table: &Table, column: usize, needle: &str) -> usize {
    let needle = needle.to_lowercase();
    table
        .column_values(column)
        .filter(|v| v.map_or(false, |v| v.to_lowercase().contains(&needle)))
        .count()
}

/// Keeps rows whose value in `column` is one of `selected`. An empty
/// selection keeps every row.
pub fn filter_in(table: &Table, column: usize, selected: &[String]) -> Table {
    if selected.is_empty() {
        return table.clone();
    }
    table.filter_rows(|row| {
        let value = row.get(column).map_or(SENTINEL, cell_text);
        selected.iter().any(|s| s == value)
    })
}

/// Case-insensitive literal substring search, OR-combined across `columns`.
pub fn search(table: &Table, columns: &[usize], term: &str) -> Table {
    let term = term.to_lowercase();
    table.filter_rows(|row| {
        columns.iter().any(|&c| {
            row.get(c)
                .map_or(false, |cell| cell_text(cell).to_lowercase().contains(&term))
        })
    })
}

/// Trims a search term, treating blank input as no search.
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|t| !t.is_empty())
}

/// Resolved header name → column index, for optional schema fields.
pub fn column(table: &Table, header: Option<&String>) -> Option<usize> {
    header.and_then(|h| table.column_index(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(4, 4), 100);
    }

    #[test]
    fn test_natural_sort() {
        let mut sets = vec!["Set 10".to_string(), "Set 2".to_string(), "Set 1".to_string()];
        natural_sort(&mut sets);
        assert_eq!(sets, vec!["Set 1", "Set 2", "Set 10"]);

        let mut mixed = vec!["SET 3".to_string(), "set 12".to_string(), "Set 1".to_string()];
        natural_sort(&mut mixed);
        assert_eq!(mixed, vec!["Set 1", "SET 3", "set 12"]);
    }

    #[test]
    fn test_value_counts_order() {
        let table = Table::from_rows(
            &["Status"],
            &[&["Backorder"], &["Available"], &["Available"], &["Split"]],
        );
        let counts = value_counts(&table, 0);
        assert_eq!(counts[0], CountBucket { label: "Available".into(), count: 2 });
        assert_eq!(counts[1].label, "Backorder");
        assert_eq!(counts[2].label, "Split");
    }

    #[test]
    fn test_relabel_sentinel_merges() {
        let mut buckets = vec![
            CountBucket { label: "-".into(), count: 3 },
            CountBucket { label: "Motors".into(), count: 2 },
            CountBucket { label: "Uncategorized".into(), count: 1 },
        ];
        relabel_sentinel(&mut buckets, "Uncategorized");
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], CountBucket { label: "Uncategorized".into(), count: 4 });
    }

    #[test]
    fn test_filter_and_search() {
        let table = Table::from_rows(
            &["MfgNo", "Name", "Status"],
            &[
                &["ABC-1", "Servo", "Available"],
                &["DEF-2", "Sensor", "Backorder"],
                &["GHI-3", "Motor Driver", "Available"],
            ],
        );

        assert_eq!(filter_in(&table, 2, &[]).len(), 3);
        assert_eq!(filter_in(&table, 2, &["Backorder".to_string()]).len(), 1);

        let found = search(&table, &[0, 1], "s");
        assert_eq!(found.len(), 2);
        let found = search(&table, &[0, 1], "def");
        assert_eq!(found.value(0, 1), Some("Sensor"));
        // Regex metacharacters are matched literally.
        assert!(search(&table, &[0], "ABC.1").is_empty());
    }

    #[test]
    fn test_counts() {
        let table = Table::from_rows(&["Status"], &[&["Available"], &["Not Available"], &["Split"]]);
        assert_eq!(count_containing(&table, 0, "AVAILABLE"), 2);
        assert_eq!(distinct_count(&table, 0), 3);
        assert_eq!(unique_values(&table, 0), vec!["Available", "Not Available", "Split"]);
        assert_eq!(search_term(Some("  ")), None);
        assert_eq!(search_term(Some(" servo ")), Some("servo"));
    }
}
