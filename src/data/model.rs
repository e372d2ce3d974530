use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Value – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, inferred from the text of a data file.
/// Used as a `BTreeMap` / `BTreeSet` key downstream, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            // Mixed numeric columns still sort by magnitude.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(std::cmp::Ordering::Greater),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Infer a cell's type from its text: empty → Null, then integer,
    /// float, boolean, and finally string.
    pub fn infer(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::String(s.to_string())
    }

    /// Try to interpret the value as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – column-major rows from one or more data files
// ---------------------------------------------------------------------------

/// A column-major table with an implicit 0-based row index.
///
/// Every column holds exactly [`Table::len`] values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    n_rows: usize,
}

impl Table {
    /// An empty table with the given header and no rows.
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let columns = vec![Vec::new(); names.len()];
        Table {
            names,
            columns,
            n_rows: 0,
        }
    }

    /// Append one row. Short rows are padded with [`Value::Null`]; extra
    /// values are dropped, callers are expected to validate the width.
    pub fn push_row(&mut self, row: Vec<Value>) {
        let mut values = row.into_iter();
        for column in &mut self.columns {
            column.push(values.next().unwrap_or(Value::Null));
        }
        self.n_rows += 1;
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// All values of a column, in row order.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.position(name).map(|i| self.columns[i].as_slice())
    }

    /// A single cell.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|c| c.get(row))
    }

    /// One row as `(column, value)` pairs.
    pub fn row(&self, row: usize) -> Option<Vec<(&str, &Value)>> {
        if row >= self.n_rows {
            return None;
        }
        Some(
            self.names
                .iter()
                .zip(&self.columns)
                .map(|(n, c)| (n.as_str(), &c[row]))
                .collect(),
        )
    }

    /// Set every row of `name` to `value`, adding the column at the end if
    /// it does not exist yet.
    pub fn fill_column(&mut self, name: &str, value: Value) {
        let filled = vec![value; self.n_rows];
        match self.position(name) {
            Some(i) => self.columns[i] = filled,
            None => {
                self.names.push(name.to_string());
                self.columns.push(filled);
            }
        }
    }

    /// Sorted set of distinct values in a column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<Value> {
        self.column(name)
            .map(|c| c.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Store integer cells as floats in every column whose non-null cells are
    /// all numeric with at least one float, so `1` and `1.0` are one value.
    pub fn promote_numeric_columns(&mut self) {
        for column in &mut self.columns {
            let mut has_float = false;
            let all_numeric = column.iter().all(|v| match v {
                Value::Float(_) => {
                    has_float = true;
                    true
                }
                Value::Integer(_) | Value::Null => true,
                _ => false,
            });
            if !(all_numeric && has_float) {
                continue;
            }
            for v in column.iter_mut() {
                if let Value::Integer(i) = *v {
                    *v = Value::Float(i as f64);
                }
            }
        }
    }

    /// Rows at the given indices, in the given order, reindexed from 0.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| rows.iter().map(|&r| c[r].clone()).collect())
            .collect();
        Table {
            names: self.names.clone(),
            columns,
            n_rows: rows.len(),
        }
    }

    /// Row-wise concatenation over the union of column names (first-seen
    /// order). Columns a table lacks are filled with [`Value::Null`] for its
    /// rows. Mixed integer / float columns end up as floats. The result is
    /// reindexed from 0.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let mut out = Table::default();
        for table in tables {
            for name in &table.names {
                if !out.has_column(name) {
                    out.names.push(name.clone());
                    out.columns.push(vec![Value::Null; out.n_rows]);
                }
            }
            let Table {
                names,
                columns,
                n_rows,
            } = table;
            let mut incoming: Vec<Option<Vec<Value>>> = columns.into_iter().map(Some).collect();
            for (i, name) in out.names.iter().enumerate() {
                match names.iter().position(|n| n == name) {
                    Some(j) => out.columns[i].extend(incoming[j].take().unwrap_or_default()),
                    None => out.columns[i].extend(std::iter::repeat(Value::Null).take(n_rows)),
                }
            }
            out.n_rows += n_rows;
        }
        out.promote_numeric_columns();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    fn table(names: &[&str], rows: Vec<Vec<Value>>) -> Table {
        let mut t = Table::with_columns(names.iter().copied());
        for row in rows {
            t.push_row(row);
        }
        t
    }

    #[test]
    fn infer_cell_types() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("42"), Value::Integer(42));
        assert_eq!(Value::infer("-1.5"), Value::Float(-1.5));
        assert_eq!(Value::infer("true"), Value::Bool(true));
        assert_eq!(Value::infer("ctrl"), Value::String("ctrl".into()));
    }

    #[test]
    fn numeric_values_order_by_magnitude() {
        let mut values = vec![Value::Float(2.5), Value::Integer(3), Value::Integer(1)];
        values.sort();
        assert_eq!(
            values,
            vec![Value::Integer(1), Value::Float(2.5), Value::Integer(3)]
        );
        assert!(Value::Null < Value::Integer(0));
        assert!(Value::Float(1e9) < Value::String("a".into()));
    }

    #[test]
    fn short_rows_are_padded() {
        let t = table(&["a", "b"], vec![vec![Value::Integer(1)]]);
        assert_eq!(t.get(0, "b"), Some(&Value::Null));
    }

    #[test]
    fn fill_column_adds_or_overwrites() {
        let mut t = table(&["a"], vec![vec![int(1)], vec![int(2)]]);
        t.fill_column("treatment", "ctrl".into());
        assert_eq!(t.column_names(), ["a", "treatment"]);
        t.fill_column("a", Value::Integer(0));
        assert_eq!(t.column("a").unwrap(), &[Value::Integer(0), Value::Integer(0)]);
    }

    #[test]
    fn concat_fills_missing_columns_with_null() {
        let a = table(&["x", "y"], vec![vec![int(1), int(2)]]);
        let b = table(&["y", "z"], vec![vec![int(3), int(4)], vec![int(5), int(6)]]);
        let t = Table::concat([a, b]);

        assert_eq!(t.len(), 3);
        assert_eq!(t.column_names(), ["x", "y", "z"]);
        assert_eq!(
            t.column("x").unwrap(),
            &[Value::Integer(1), Value::Null, Value::Null]
        );
        assert_eq!(
            t.column("y").unwrap(),
            &[Value::Integer(2), Value::Integer(3), Value::Integer(5)]
        );
        assert_eq!(
            t.column("z").unwrap(),
            &[Value::Null, Value::Integer(4), Value::Integer(6)]
        );
    }

    #[test]
    fn promotion_unifies_integer_and_float_cells() {
        let mut t = table(
            &["update", "name"],
            vec![
                vec![int(1), Value::from("a")],
                vec![Value::Float(1.0), int(2)],
                vec![Value::Null, Value::Null],
            ],
        );
        t.promote_numeric_columns();
        assert_eq!(
            t.column("update").unwrap(),
            &[Value::Float(1.0), Value::Float(1.0), Value::Null]
        );
        assert_eq!(t.column("name").unwrap(), &[Value::from("a"), int(2), Value::Null]);
        assert_eq!(t.unique_values("update").len(), 2);
    }

    #[test]
    fn concat_promotes_across_tables() {
        let a = table(&["update"], vec![vec![int(1)], vec![int(2)]]);
        let b = table(&["update"], vec![vec![Value::Float(1.0)]]);
        let t = Table::concat([a, b]);
        assert_eq!(
            t.column("update").unwrap(),
            &[Value::Float(1.0), Value::Float(2.0), Value::Float(1.0)]
        );
    }

    #[test]
    fn select_rows_reindexes() {
        let t = table(&["x"], vec![vec![int(1)], vec![int(2)], vec![int(3)]]);
        let s = t.select_rows(&[2, 0]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(0, "x"), Some(&Value::Integer(3)));
        assert_eq!(s.get(1, "x"), Some(&Value::Integer(1)));
    }
}
