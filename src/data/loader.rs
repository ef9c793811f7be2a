use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};

use super::error::{DataError, DataResult};
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Container formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Xlsx,
    Csv,
}

impl SourceFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> DataResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(SourceFormat::Xlsx),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(DataError::Parse(format!(
                "unsupported file extension: .{other}"
            ))),
        }
    }
}

/// Parse uploaded bytes into a table.
///
/// Fails with [`DataError::Parse`] when the bytes are not a readable file of
/// the given format, and with [`DataError::EmptyDataset`] when the file has a
/// header but no data rows. No partial table is ever returned.
pub fn load_bytes(format: SourceFormat, bytes: &[u8]) -> DataResult<Table> {
    let table = match format {
        SourceFormat::Xlsx => load_xlsx(bytes)?,
        SourceFormat::Csv => load_csv(bytes)?,
    };
    if table.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    log::info!(
        "Parsed {} rows with columns {:?}",
        table.len(),
        table.columns
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// First worksheet; first row is the header.
fn load_xlsx(bytes: &[u8]) -> DataResult<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::Parse("workbook contains no sheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| header_label(cell, i))
        .collect();

    let data: Vec<Vec<Value>> = rows
        .map(|row| row.iter().map(cell_to_value).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|v| !v.is_null()))
        .collect();

    Ok(Table::new(columns, data))
}

fn header_label(cell: &Data, index: usize) -> String {
    let label = cell_to_value(cell).to_string();
    if label.trim().is_empty() {
        format!("unnamed: {index}")
    } else {
        label
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Float(*f),
        Data::Int(i) => Value::Integer(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => {
            let pattern = if dt.as_f64().fract() == 0.0 {
                "%Y-%m-%d"
            } else {
                "%Y-%m-%d %H:%M:%S"
            };
            match dt.as_datetime() {
                Some(d) => Value::Date(d.format(pattern).to_string()),
                None => Value::Float(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Date(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; cell types are guessed.
fn load_csv(bytes: &[u8]) -> DataResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Parse(format!("reading CSV header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| DataError::Parse(format!("CSV row {row_no}: {e}")))?;
        rows.push(record.iter().map(guess_value_type).collect());
    }

    Ok(Table::new(columns, rows))
}

fn guess_value_type(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    // "NaN" and "inf" parse as floats but are labels in a spreadsheet.
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => return Value::Float(f),
        _ => {}
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::Text(s.to_string())
}
