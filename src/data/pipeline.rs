use crate::config::DashboardConfig;

use super::aggregate::{AggregateResults, aggregate};
use super::error::DataResult;
use super::filter::{FilterSelection, apply};
use super::model::Table;
use super::schema::{normalize_columns, require_columns};

/// Result of one pass over the filtered table.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The filters matched nothing. Not an error: the user can keep
    /// adjusting filters, but there is nothing to aggregate or export.
    NoMatches,
    Ready {
        filtered: Table,
        aggregates: AggregateResults,
    },
}

/// Normalize column labels once, then check the required columns.
pub fn prepare(raw: Table, config: &DashboardConfig) -> DataResult<Table> {
    let table = normalize_columns(raw);
    require_columns(table, &config.required_columns())
}

/// Filter and aggregate a prepared table for the current selection.
pub fn run(table: &Table, config: &DashboardConfig, selection: &FilterSelection) -> DataResult<Outcome> {
    let criteria = selection.criteria(table, config);
    let filtered = apply(table, &criteria);
    if filtered.is_empty() {
        log::warn!("No rows match the current filters");
        return Ok(Outcome::NoMatches);
    }
    let aggregates = aggregate(&filtered, config)?;
    Ok(Outcome::Ready { filtered, aggregates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use crate::data::filter::{Choice, Selection};
    use crate::data::loader::{SourceFormat, load_bytes};
    use crate::data::model::Value;

    const WELLS_CSV: &str = "\
Numeração ,Situação,Processo Outorga,Termo de Cessão,Bairro
101,ATIVO,Sim,Sim,Centro
102,ATIVO,Não,Não,Centro
103,INATIVO,Solicitado,Sim,Mocambinho
104,TAMPONADO,Não,Não,Centro
";

    fn prepared() -> Table {
        let raw = load_bytes(SourceFormat::Csv, WELLS_CSV.as_bytes()).unwrap();
        prepare(raw, &DashboardConfig::wells()).unwrap()
    }

    #[test]
    fn prepare_normalizes_then_validates() {
        let table = prepared();
        assert_eq!(table.columns[0], "numeração");
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn prepare_names_missing_required_column() {
        let raw = load_bytes(SourceFormat::Csv, "Situação,Numeração\nATIVO,1\n".as_bytes()).unwrap();
        match prepare(raw, &DashboardConfig::wells()) {
            Err(DataError::MissingColumn(c)) => assert_eq!(c, "processo outorga"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unrestricted_run_sees_every_row() {
        let config = DashboardConfig::wells();
        let table = prepared();
        let selection = FilterSelection::unrestricted(&table, &config);

        let Outcome::Ready { filtered, aggregates } = run(&table, &config, &selection).unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(filtered, table);
        assert_eq!(aggregates.total_rows, 4);

        let cross = aggregates.cross_tab.unwrap();
        assert_eq!(cross.rows[0].value, Value::from("ATIVO"));
        assert_eq!(cross.rows[0].total, 2);
        assert_eq!(cross.rows[1].cells[2].count, 1);
    }

    #[test]
    fn selections_narrow_the_result() {
        let config = DashboardConfig::wells();
        let table = prepared();
        let selection = FilterSelection::unrestricted(&table, &config)
            .with(0, Selection::Single(Choice::from_label("ATIVO")))
            .with(1, Selection::Single(Choice::from_label("Não")));

        let Outcome::Ready { filtered, .. } = run(&table, &config, &selection).unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(0, "numeração"), Some(&Value::Integer(102)));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let config = DashboardConfig::wells();
        let table = prepared();
        let selection = FilterSelection::unrestricted(&table, &config)
            .with(0, Selection::Single(Choice::from_label("TAMPONADO")))
            .with(1, Selection::Single(Choice::from_label("Sim")));

        assert_eq!(run(&table, &config, &selection).unwrap(), Outcome::NoMatches);
    }
}
