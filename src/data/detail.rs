use super::model::{Table, Value};

/// Distinct keys offered in the record picker, in table order.
pub fn record_keys(table: &Table, key_column: &str) -> Vec<Value> {
    table.distinct_values(key_column)
}

/// `(field, value)` pairs of the first row whose `key_column` equals `key`.
/// Fields the table does not have are skipped.
pub fn record_detail(
    table: &Table,
    key_column: &str,
    key: &Value,
    fields: &[String],
) -> Option<Vec<(String, Value)>> {
    let key_idx = table.column_index(key_column)?;
    let row = table.rows.iter().find(|r| &r[key_idx] == key)?;

    Some(
        fields
            .iter()
            .filter_map(|field| {
                let idx = table.column_index(field)?;
                Some((field.clone(), row[idx].clone()))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wells() -> Table {
        Table::new(
            vec!["numeração".into(), "bairro".into(), "situação".into()],
            vec![
                vec![Value::Float(7.0), "Centro".into(), "ATIVO".into()],
                vec![Value::Float(9.0), "Parque Alvorada".into(), "TAMPONADO".into()],
                vec![Value::Float(7.0), "Duplicado".into(), "INATIVO".into()],
            ],
        )
    }

    #[test]
    fn first_matching_row_is_described() {
        let fields = vec!["situação".to_string(), "observações".to_string(), "bairro".to_string()];
        let detail = record_detail(&wells(), "numeração", &Value::Float(7.0), &fields).unwrap();
        assert_eq!(
            detail,
            vec![
                ("situação".to_string(), Value::from("ATIVO")),
                ("bairro".to_string(), Value::from("Centro")),
            ]
        );
    }

    #[test]
    fn unknown_key_has_no_detail() {
        assert!(record_detail(&wells(), "numeração", &Value::Float(1.0), &[]).is_none());
        assert_eq!(record_keys(&wells(), "numeração").len(), 2);
    }
}
