use std::fmt;

use serde::Serialize;

use crate::error::DataError;

pub const BRAND: &str = "Brand";
pub const PRICE: &str = "Price";
pub const STORAGE_GB: &str = "Storage_GB";
pub const RAM_GB: &str = "RAM_GB";
pub const OS: &str = "OS";

/// Columns every stage relies on by name.
pub const REQUIRED_COLUMNS: [&str; 5] = [BRAND, PRICE, STORAGE_GB, RAM_GB, OS];

/// Columns that must infer as numeric.
pub const NUMERIC_COLUMNS: [&str; 3] = [PRICE, STORAGE_GB, RAM_GB];

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Used as a map/set key by the cleaner, so `Value` must be `Ord` and `Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Real(f64),
    Missing,
}

// -- Manual Eq/Ord: reals compare by total order so NaN can't poison a set --

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
                Missing => 0,
                Integer(_) => 1,
                Real(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Real(a), Real(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Real(f) => f.to_bits().hash(state),
            Value::Missing => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(v) => write!(f, "{}", format_real(*v)),
            Value::Missing => write!(f, "NaN"),
        }
    }
}

impl Value {
    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Text used when the value is a grouping key.
    pub fn key_label(&self) -> String {
        match self {
            Value::Missing => UNKNOWN_KEY.to_string(),
            other => other.to_string(),
        }
    }
}

/// Group key used for rows whose key cell is missing. It is itself a missing
/// token on load, so no loaded text cell can share the bucket.
pub const UNKNOWN_KEY: &str = "<NA>";

/// Shortest round-trip form, keeping `.0` on integral values so the cell
/// reloads as a real rather than an integer.
pub fn format_real(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

// ---------------------------------------------------------------------------
// Column / RecordTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Real)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The whole table: a fixed column list and row-major cells.
/// Every row is exactly `columns.len()` wide.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl RecordTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, DataError> {
        self.column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Iterate one column's cells in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |r| &r[idx])
    }

    /// Non-missing numeric cells of a column.
    pub fn numeric_column(&self, idx: usize) -> Vec<f64> {
        self.column_values(idx).filter_map(Value::as_f64).collect()
    }

    /// Convert an integer column to reals in place.
    pub fn promote_to_real(&mut self, idx: usize) {
        if self.columns[idx].kind != ColumnType::Integer {
            return;
        }
        self.columns[idx].kind = ColumnType::Real;
        for row in &mut self.rows {
            if let Value::Integer(i) = row[idx] {
                row[idx] = Value::Real(i as f64);
            }
        }
    }

    /// First `n` rows, for terminal display.
    pub fn head(&self, n: usize) -> Preview<'_> {
        Preview { table: self, n }
    }
}

// ---------------------------------------------------------------------------
// Preview – fixed-width rendering of the first rows
// ---------------------------------------------------------------------------

pub struct Preview<'a> {
    table: &'a RecordTable,
    n: usize,
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<String>> = self
            .table
            .rows
            .iter()
            .take(self.n)
            .map(|r| r.iter().map(Value::to_string).collect())
            .collect();
        let index_width = rows.len().saturating_sub(1).to_string().len();

        let widths: Vec<usize> = self
            .table
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                rows.iter()
                    .map(|r| r[i].len())
                    .chain(std::iter::once(c.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (c, w) in self.table.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", c.name)?;
        }
        writeln!(f)?;
        for (i, row) in rows.iter().enumerate() {
            write!(f, "{i:<index_width$}")?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "  {cell:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn format_real_keeps_decimal_point() {
        assert_eq!(format_real(15.0), "15.0");
        assert_eq!(format_real(12999.5), "12999.5");
        assert_eq!(format_real(-3.0), "-3.0");
    }

    #[test]
    fn values_order_within_and_across_kinds() {
        let set: BTreeSet<Value> = [
            Value::Text("b".into()),
            Value::Integer(3),
            Value::Missing,
            Value::Real(1.5),
            Value::Integer(1),
        ]
        .into_iter()
        .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                Value::Missing,
                Value::Integer(1),
                Value::Integer(3),
                Value::Real(1.5),
                Value::Text("b".into()),
            ]
        );
    }

    #[test]
    fn missing_key_is_unknown() {
        assert_eq!(Value::Missing.key_label(), UNKNOWN_KEY);
        assert_eq!(Value::Text("Apple".into()).key_label(), "Apple");
    }

    #[test]
    fn promote_converts_integers() {
        let mut t = RecordTable::new(
            vec![Column::new(PRICE, ColumnType::Integer)],
            vec![vec![Value::Integer(10)], vec![Value::Missing]],
        );
        t.promote_to_real(0);
        assert_eq!(t.columns[0].kind, ColumnType::Real);
        assert_eq!(t.rows[0][0], Value::Real(10.0));
        assert!(t.rows[1][0].is_missing());
    }

    #[test]
    fn head_renders_header_and_rows() {
        let t = RecordTable::new(
            vec![
                Column::new(BRAND, ColumnType::Text),
                Column::new(PRICE, ColumnType::Real),
            ],
            vec![
                vec![Value::Text("Apple".into()), Value::Real(999.0)],
                vec![Value::Text("Nokia".into()), Value::Missing],
                vec![Value::Text("Oppo".into()), Value::Real(1.0)],
            ],
        );
        let text = t.head(2).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Brand") && lines[0].contains("Price"));
        assert!(lines[1].contains("999.0"));
        assert!(lines[2].contains("NaN"));
        assert!(!text.contains("Oppo"));
    }
}
