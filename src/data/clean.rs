use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};

use super::model::{ColumnType, RecordTable, Value, PRICE, RAM_GB, STORAGE_GB};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Fill strategy per column
// ---------------------------------------------------------------------------

/// How missing cells of a column get replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    /// Middle of the sorted non-missing values.
    Median,
    /// Most frequent non-missing value; ties go to the lowest value.
    Mode,
}

/// Columns imputed by the cleaner, in the order they are filled.
pub const FILL_PLAN: [(&str, FillStrategy); 3] = [
    (PRICE, FillStrategy::Median),
    (STORAGE_GB, FillStrategy::Mode),
    (RAM_GB, FillStrategy::Mode),
];

/// Result of [`clean_table`]: the cleaned table plus what was changed.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: RecordTable,
    pub duplicates_removed: usize,
    /// column name → number of cells filled.
    pub filled: BTreeMap<String, usize>,
}

impl CleanOutcome {
    /// True when cleaning changed nothing.
    pub fn is_noop(&self) -> bool {
        self.duplicates_removed == 0 && self.filled.values().all(|&n| n == 0)
    }
}

/// Deduplicate, then impute the numeric columns of [`FILL_PLAN`]. Medians
/// and modes are taken over the deduplicated rows. A last dedupe pass runs
/// after filling so the result has no identical rows.
///
/// Columns not in the plan (Brand, OS, extras) are left as they are, missing
/// cells included. Fails if a planned column is absent.
pub fn clean_table(mut table: RecordTable) -> Result<CleanOutcome, DataError> {
    for (name, _) in FILL_PLAN {
        table.require_column(name)?;
    }

    let duplicates_removed = drop_duplicates(&mut table);
    debug!("removed {duplicates_removed} duplicate rows");

    let mut filled = BTreeMap::new();
    for (name, strategy) in FILL_PLAN {
        let idx = table.require_column(name)?;
        let n = fill_missing(&mut table, idx, strategy);
        filled.insert(name.to_string(), n);
    }

    // Filling can make two rows identical.
    let collapsed = drop_duplicates(&mut table);
    if collapsed > 0 {
        debug!("removed {collapsed} rows that became duplicates after filling");
    }
    let duplicates_removed = duplicates_removed + collapsed;

    Ok(CleanOutcome {
        table,
        duplicates_removed,
        filled,
    })
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Remove rows equal to an earlier row across every column.
/// First occurrences survive in their original order. Returns the number
/// of rows removed.
pub fn drop_duplicates(table: &mut RecordTable) -> usize {
    let before = table.rows.len();
    let mut seen: HashSet<Vec<Value>> = HashSet::with_capacity(before);
    table.rows.retain(|row| seen.insert(row.clone()));
    before - table.rows.len()
}

// ---------------------------------------------------------------------------
// Imputation
// ---------------------------------------------------------------------------

/// Replace missing cells of column `idx`; returns how many were filled.
/// A column with no observed values is left untouched.
pub fn fill_missing(table: &mut RecordTable, idx: usize, strategy: FillStrategy) -> usize {
    let missing = table.column_values(idx).filter(|v| v.is_missing()).count();
    if missing == 0 {
        return 0;
    }

    let fill = match strategy {
        FillStrategy::Median => median_fill_value(table, idx),
        FillStrategy::Mode => mode(table.column_values(idx)),
    };
    let Some(fill) = fill else {
        warn!(
            "column '{}' has no observed values; {missing} missing cells left as-is",
            table.columns[idx].name
        );
        return 0;
    };

    debug!(
        "filling {missing} missing '{}' cells with {fill}",
        table.columns[idx].name
    );
    for row in &mut table.rows {
        if row[idx].is_missing() {
            row[idx] = fill.clone();
        }
    }
    missing
}

/// Median as a cell value matching the column type; promotes an integer
/// column to real when the median falls between two integers.
fn median_fill_value(table: &mut RecordTable, idx: usize) -> Option<Value> {
    let m = median(&table.numeric_column(idx))?;
    match table.columns[idx].kind {
        ColumnType::Integer if m.fract() == 0.0 => Some(Value::Integer(m as i64)),
        ColumnType::Integer => {
            table.promote_to_real(idx);
            Some(Value::Real(m))
        }
        _ => Some(Value::Real(m)),
    }
}

/// Median of the values (mean of the two middle ones for even counts).
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent non-missing value. `BTreeMap` iterates ascending, and only a
/// strictly higher count replaces the current best, so ties resolve to the
/// lowest value.
pub fn mode<'a>(values: impl Iterator<Item = &'a Value>) -> Option<Value> {
    let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
    for v in values.filter(|v| !v.is_missing()) {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<(&Value, usize)> = None;
    for (v, n) in counts {
        if best.map_or(true, |(_, b)| n > b) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, BRAND, OS};

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn phones(rows: Vec<(Value, Value, Value, Value, Value)>) -> RecordTable {
        RecordTable::new(
            vec![
                Column::new(BRAND, ColumnType::Text),
                Column::new(PRICE, ColumnType::Real),
                Column::new(STORAGE_GB, ColumnType::Integer),
                Column::new(RAM_GB, ColumnType::Integer),
                Column::new(OS, ColumnType::Text),
            ],
            rows.into_iter()
                .map(|(a, b, c, d, e)| vec![a, b, c, d, e])
                .collect(),
        )
    }

    fn sample() -> RecordTable {
        use Value::{Integer as I, Missing as M, Real as R};
        phones(vec![
            (text("Apple"), R(10.0), I(64), I(4), text("iOS")),
            (text("Apple"), R(10.0), I(64), I(4), text("iOS")),
            (text("Samsung"), R(20.0), I(64), M, text("Android")),
            (text("Nokia"), M, I(128), I(8), M),
            (M, R(40.0), M, I(8), text("Android")),
            (text("Nokia"), M, I(128), I(8), M),
        ])
    }

    #[test]
    fn median_fill_example() {
        use Value::{Missing as M, Real as R};
        let mut t = RecordTable::new(
            vec![Column::new(PRICE, ColumnType::Real)],
            vec![vec![R(10.0)], vec![R(20.0)], vec![M]],
        );
        assert_eq!(fill_missing(&mut t, 0, FillStrategy::Median), 1);
        assert_eq!(t.rows[2][0], Value::Real(15.0));
    }

    #[test]
    fn mode_fill_example() {
        use Value::{Integer as I, Missing as M};
        let mut t = RecordTable::new(
            vec![Column::new(STORAGE_GB, ColumnType::Integer)],
            vec![vec![I(64)], vec![I(64)], vec![I(128)], vec![M]],
        );
        assert_eq!(fill_missing(&mut t, 0, FillStrategy::Mode), 1);
        assert_eq!(t.rows[3][0], Value::Integer(64));
    }

    #[test]
    fn mode_tie_goes_to_lowest_value() {
        let vals = [
            Value::Integer(256),
            Value::Integer(128),
            Value::Integer(256),
            Value::Integer(128),
            Value::Missing,
            Value::Missing,
            Value::Missing,
        ];
        assert_eq!(mode(vals.iter()), Some(Value::Integer(128)));
    }

    #[test]
    fn integer_median_between_values_promotes_column() {
        use Value::{Integer as I, Missing as M};
        let mut t = RecordTable::new(
            vec![Column::new(PRICE, ColumnType::Integer)],
            vec![vec![I(10)], vec![I(15)], vec![M]],
        );
        fill_missing(&mut t, 0, FillStrategy::Median);
        assert_eq!(t.columns[0].kind, ColumnType::Real);
        assert_eq!(t.rows[0][0], Value::Real(10.0));
        assert_eq!(t.rows[2][0], Value::Real(12.5));
    }

    #[test]
    fn empty_column_is_left_alone() {
        let mut t = RecordTable::new(
            vec![Column::new(RAM_GB, ColumnType::Real)],
            vec![vec![Value::Missing], vec![Value::Missing]],
        );
        assert_eq!(fill_missing(&mut t, 0, FillStrategy::Mode), 0);
        assert!(t.rows.iter().all(|r| r[0].is_missing()));
    }

    #[test]
    fn clean_dedupes_then_fills() {
        let input = sample();
        let input_len = input.len();
        let out = clean_table(input).unwrap();

        assert_eq!(out.duplicates_removed, 2);
        assert!(out.table.len() <= input_len);
        assert_eq!(out.table.len(), 4);

        let unique: HashSet<&Vec<Value>> = out.table.rows.iter().collect();
        assert_eq!(unique.len(), out.table.len());

        for name in [PRICE, STORAGE_GB, RAM_GB] {
            let idx = out.table.column_index(name).unwrap();
            assert!(out.table.column_values(idx).all(|v| !v.is_missing()));
        }

        // median of [10, 20, 40] after dedupe
        assert_eq!(out.table.rows[2][1], Value::Real(20.0));
        // Storage_GB: 64 x2, 128 x1
        assert_eq!(out.table.rows[3][2], Value::Integer(64));
        // RAM_GB: 4, 8, 8
        assert_eq!(out.table.rows[1][3], Value::Integer(8));

        assert_eq!(out.filled[PRICE], 1);
        assert_eq!(out.filled[STORAGE_GB], 1);
        assert_eq!(out.filled[RAM_GB], 1);
    }

    #[test]
    fn brand_and_os_are_not_imputed() {
        let out = clean_table(sample()).unwrap();
        assert!(out.table.rows[3][0].is_missing());
        assert!(out.table.rows[2][4].is_missing());
    }

    #[test]
    fn rows_made_identical_by_filling_collapse() {
        use Value::{Integer as I, Missing as M, Real as R};
        let t = phones(vec![
            (text("Oppo"), R(15.0), I(64), I(4), text("Android")),
            (text("Oppo"), M, I(64), I(4), text("Android")),
            (text("Vivo"), R(15.0), I(32), I(2), text("Android")),
        ]);
        let out = clean_table(t).unwrap();
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.duplicates_removed, 1);
        assert_eq!(out.filled[PRICE], 1);
    }

    #[test]
    fn absent_fill_column_is_an_error() {
        let t = RecordTable::new(vec![Column::new(PRICE, ColumnType::Real)], vec![]);
        assert!(matches!(
            clean_table(t),
            Err(DataError::MissingColumn(c)) if c == STORAGE_GB
        ));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean_table(sample()).unwrap();
        let twice = clean_table(once.table.clone()).unwrap();
        assert!(twice.is_noop());
        assert_eq!(twice.table, once.table);
    }
}
