use std::path::Path;

use log::debug;

use super::model::{format_real, RecordTable, Value};
use crate::error::FileError;

/// Write the table as comma-delimited text: header row in column order, no
/// index column, missing cells as empty fields. The parent directory is
/// created when absent.
pub fn write_table(table: &RecordTable, path: &Path) -> Result<(), FileError> {
    let write_err = |source: std::io::Error| FileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| FileError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer
        .write_record(table.columns.iter().map(|c| c.name.as_str()))
        .map_err(csv_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(field_text))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(write_err)?;

    debug!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Real(v) => format_real(*v),
        Value::Missing => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_table;
    use crate::data::model::{Column, ColumnType, BRAND, OS, PRICE, RAM_GB, STORAGE_GB};

    fn table() -> RecordTable {
        RecordTable::new(
            vec![
                Column::new(BRAND, ColumnType::Text),
                Column::new(PRICE, ColumnType::Real),
                Column::new(STORAGE_GB, ColumnType::Integer),
                Column::new(RAM_GB, ColumnType::Real),
                Column::new(OS, ColumnType::Text),
            ],
            vec![
                vec![
                    Value::Text("Apple, Inc.".into()),
                    Value::Real(79999.0),
                    Value::Integer(256),
                    Value::Real(6.0),
                    Value::Text("iOS".into()),
                ],
                vec![
                    Value::Missing,
                    Value::Real(12499.99),
                    Value::Integer(64),
                    Value::Real(4.5),
                    Value::Missing,
                ],
            ],
        )
    }

    #[test]
    fn writes_header_and_formats_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table(&table(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Brand,Price,Storage_GB,RAM_GB,OS");
        assert_eq!(lines[1], "\"Apple, Inc.\",79999.0,256,6.0,iOS");
        assert_eq!(lines[2], ",12499.99,64,4.5,");
    }

    #[test]
    fn round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.csv");
        let original = table();
        write_table(&original, &path).unwrap();
        assert_eq!(load_table(&path).unwrap(), original);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mobile_outputs").join("nested").join("t.csv");
        write_table(&table(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_target_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = write_table(&table(), &blocker.join("out.csv")).unwrap_err();
        assert!(matches!(err, FileError::Write { .. } | FileError::Csv { .. }));
    }
}
