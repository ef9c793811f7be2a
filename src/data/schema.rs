use super::error::{DataError, DataResult};
use super::model::Table;

/// Canonical form of a column label: trimmed and lowercased.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Normalize every column label so later lookups ignore case and padding.
pub fn normalize_columns(mut table: Table) -> Table {
    for column in &mut table.columns {
        *column = normalize_label(column);
    }
    table
}

/// Check the required columns in order and stop at the first one missing.
pub fn validate_required(table: &Table, required: &[&str]) -> DataResult<()> {
    match required.iter().find(|name| !table.has_column(name)) {
        Some(missing) => {
            log::error!("Required column '{missing}' is missing");
            Err(DataError::MissingColumn(missing.to_string()))
        }
        None => Ok(()),
    }
}

/// [`validate_required`], handing the table back unchanged on success.
pub fn require_columns(table: Table, required: &[&str]) -> DataResult<Table> {
    validate_required(&table, required)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn table(columns: &[&str]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![vec![Value::Null; columns.len()]],
        )
    }

    #[test]
    fn labels_are_trimmed_and_lowercased() {
        let t = normalize_columns(table(&["  Número da OS ", "MATRÍCULA", "Obs Comercial\t"]));
        assert_eq!(t.columns, vec!["número da os", "matrícula", "obs comercial"]);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let once = normalize_columns(table(&[" Situação", "Processo Outorga "]));
        let twice = normalize_columns(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_required_column_is_named() {
        let t = table(&["id", "name"]);
        match validate_required(&t, &["status"]) {
            Err(DataError::MissingColumn(c)) => assert_eq!(c, "status"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_stops_at_first_missing_column() {
        let t = table(&["id"]);
        match require_columns(t, &["id", "status", "name"]) {
            Err(DataError::MissingColumn(c)) => assert_eq!(c, "status"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn valid_table_is_returned_unchanged() {
        let t = table(&["status", "id"]);
        assert_eq!(require_columns(t.clone(), &["id", "status"]).unwrap(), t);
    }
}
