use std::path::Path;

use log::debug;

use super::model::{Column, ColumnType, RecordTable, Value, NUMERIC_COLUMNS, REQUIRED_COLUMNS};
use crate::error::{DataError, FileError, TableError};

/// Tokens read as a missing cell; the same set `pandas.read_csv` uses.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the listings table from a comma-delimited file with a header row.
///
/// Column types are inferred from content: a column whose non-missing cells
/// all parse as `i64` is Integer, as `f64` is Real, anything else is Text.
/// The required columns must all be present and the numeric ones must infer
/// as numeric.
pub fn load_table(path: &Path) -> Result<RecordTable, TableError> {
    let csv_err = |source: csv::Error| FileError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut raw: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        if record.len() != headers.len() {
            return Err(DataError::RaggedRow {
                row: row_no,
                expected: headers.len(),
                found: record.len(),
            }
            .into());
        }
        raw.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    let table = build_table(headers, raw)?;
    debug!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

fn build_table(headers: Vec<String>, raw: Vec<Vec<String>>) -> Result<RecordTable, DataError> {
    for name in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == name) {
            return Err(DataError::MissingColumn(name.to_string()));
        }
    }

    let kinds: Vec<ColumnType> = (0..headers.len())
        .map(|i| infer_column_type(raw.iter().map(|r| r[i].as_str())))
        .collect();

    for name in NUMERIC_COLUMNS {
        let Some(idx) = headers.iter().position(|h| h == name) else {
            continue;
        };
        if kinds[idx] == ColumnType::Text {
            let (row, value) = raw
                .iter()
                .enumerate()
                .find(|(_, r)| !is_missing(&r[idx]) && r[idx].parse::<f64>().is_err())
                .map(|(i, r)| (i, r[idx].clone()))
                .unwrap_or_default();
            return Err(DataError::NotNumeric {
                column: name.to_string(),
                row,
                value,
            });
        }
    }

    let rows = raw
        .into_iter()
        .map(|r| {
            r.into_iter()
                .zip(&kinds)
                .map(|(cell, kind)| parse_cell(cell, *kind))
                .collect()
        })
        .collect();

    let columns = headers
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| Column::new(name, kind))
        .collect();

    Ok(RecordTable::new(columns, rows))
}

/// A missing token, or any spelling `f64::from_str` reads as NaN (`NAN`,
/// `+nan`, ...), which must not reach the table as a real.
fn is_missing(s: &str) -> bool {
    MISSING_TOKENS.contains(&s) || s.parse::<f64>().is_ok_and(f64::is_nan)
}

/// All-missing columns come out Real.
fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut kind = ColumnType::Integer;
    let mut seen = false;
    for cell in cells.filter(|c| !is_missing(c)) {
        seen = true;
        if kind == ColumnType::Integer && cell.parse::<i64>().is_err() {
            kind = ColumnType::Real;
        }
        if kind == ColumnType::Real && cell.parse::<f64>().is_err() {
            return ColumnType::Text;
        }
    }
    if seen {
        kind
    } else {
        ColumnType::Real
    }
}

fn parse_cell(cell: String, kind: ColumnType) -> Value {
    if is_missing(&cell) {
        return Value::Missing;
    }
    match kind {
        ColumnType::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Missing),
        ColumnType::Real => match cell.parse::<f64>() {
            Ok(v) if !v.is_nan() => Value::Real(v),
            _ => Value::Missing,
        },
        ColumnType::Text => Value::Text(cell),
    }
}
