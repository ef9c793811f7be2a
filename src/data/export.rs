use std::path::Path;

use super::error::{DataError, DataResult};
use super::model::{Table, Value};

/// Text written for one cell.
///
/// Floats keep their natural form (`5.0`, `2.5`) except in identifier
/// columns, where integral values lose the `.0` the spreadsheet reader adds.
pub fn cell_text(value: &Value, identifier: bool) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float(v) if identifier && v.is_finite() && v.fract() == 0.0 => format!("{v:.0}"),
        Value::Float(v) => format!("{v:?}"),
        other => other.to_string(),
    }
}

/// Encode the table as UTF-8 CSV: header row, then one line per row.
pub fn to_csv(table: &Table, identifier_columns: &[String]) -> DataResult<Vec<u8>> {
    let identifier: Vec<bool> = table
        .columns
        .iter()
        .map(|c| identifier_columns.contains(c))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(
            row.iter()
                .zip(&identifier)
                .map(|(value, &is_id)| cell_text(value, is_id)),
        )?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))
}

/// Write the CSV encoding of `table` to `path`.
pub fn write_csv(table: &Table, identifier_columns: &[String], path: &Path) -> DataResult<()> {
    let bytes = to_csv(table, identifier_columns)?;
    std::fs::write(path, bytes)?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Table {
        Table::new(
            vec!["número da os".into(), "dias em atraso".into(), "obs comercial".into()],
            vec![
                vec![Value::Float(20231.0), Value::Float(12.0), "cliente, ausente".into()],
                vec![Value::Float(20232.5), Value::Float(3.5), Value::Null],
            ],
        )
    }

    #[test]
    fn identifier_columns_lose_trailing_zero() {
        let bytes = to_csv(&orders(), &["número da os".to_string()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "número da os,dias em atraso,obs comercial\n\
             20231,12.0,\"cliente, ausente\"\n\
             20232.5,3.5,\n"
        );
    }

    #[test]
    fn export_parses_back_to_same_shape() {
        let table = orders();
        let bytes = to_csv(&table, &[]).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(headers, table.columns);
        assert_eq!(rows.len(), table.len());
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_data.csv");
        write_csv(&orders(), &[], &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("número da os,"));
    }
}
