use std::collections::{BTreeMap, BTreeSet};

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// Columns absent from the map are not filtered.
pub type FilterState = BTreeMap<String, BTreeSet<Value>>;

/// Initialise a [`FilterState`] for `columns` with every value selected.
pub fn init_filter_state(table: &Table, columns: &[&str]) -> FilterState {
    columns
        .iter()
        .filter(|col| table.has_column(col))
        .map(|col| (col.to_string(), table.unique_values(col)))
        .collect()
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a column filter when:
/// * The column is not in `filters` or not in the table → passes
/// * The filter set for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(&[Value], &BTreeSet<Value>)> = filters
        .iter()
        .filter_map(|(col, selected)| Some((table.column(col)?, selected)))
        .collect();

    (0..table.len())
        .filter(|&row| {
            active
                .iter()
                .all(|(values, selected)| selected.contains(&values[row]))
        })
        .collect()
}

/// The rows of `table` that pass `filters`, reindexed from 0.
pub fn apply(table: &Table, filters: &FilterState) -> Table {
    table.select_rows(&filtered_indices(table, filters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::with_columns(["treatment", "fitness"]);
        t.push_row(vec![Value::from("ctrl"), Value::Float(1.0)]);
        t.push_row(vec![Value::from("heat"), Value::Float(2.0)]);
        t.push_row(vec![Value::Null, Value::Float(3.0)]);
        t
    }

    #[test]
    fn everything_selected_keeps_all_rows() {
        let t = sample();
        let filters = init_filter_state(&t, &["treatment", "missing"]);
        assert_eq!(filters.len(), 1);
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn deselected_values_are_hidden() {
        let t = sample();
        let mut filters = init_filter_state(&t, &["treatment"]);
        filters
            .get_mut("treatment")
            .unwrap()
            .remove(&Value::from("ctrl"));
        assert_eq!(filtered_indices(&t, &filters), vec![1, 2]);

        filters.get_mut("treatment").unwrap().remove(&Value::Null);
        let kept = apply(&t, &filters);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.get(0, "fitness"), Some(&Value::Float(2.0)));
    }

    #[test]
    fn empty_selection_hides_everything() {
        let t = sample();
        let mut filters = FilterState::new();
        filters.insert("treatment".to_string(), BTreeSet::new());
        assert!(filtered_indices(&t, &filters).is_empty());
    }
}
