//! Counts and rankings over a filtered table.
//!
//! Everything here is recomputed from scratch on each interaction; tables are
//! small enough that a full scan is cheap.

use std::collections::HashMap;

use crate::config::{CrossTabSpec, DashboardConfig};

use super::error::DataResult;
use super::filter::contains_ignore_case;
use super::model::{Table, Value};

/// Number of rows sharing one category value.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: Value,
    pub count: usize,
}

/// Count rows per distinct value of `column`, largest first, keeping at most
/// `n` entries. Null cells are not counted. Ties keep first-encountered order.
pub fn frequency_count(table: &Table, column: &str, n: usize) -> Vec<CategoryCount> {
    let Some(values) = table.column_values(column) else {
        return Vec::new();
    };

    let mut order: Vec<CategoryCount> = Vec::new();
    let mut slots: HashMap<&Value, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_null()) {
        match slots.get(value).copied() {
            Some(slot) => order[slot].count += 1,
            None => {
                slots.insert(value, order.len());
                order.push(CategoryCount { category: value.clone(), count: 1 });
            }
        }
    }

    // `sort_by` is stable, so equal counts stay in first-seen order.
    order.sort_by(|a, b| b.count.cmp(&a.count));
    order.truncate(n);
    order
}

/// Count rows where every `(column, value)` pair matches.
pub fn count_where(table: &Table, conditions: &[(&str, &Value)]) -> usize {
    let Some(positions) = conditions
        .iter()
        .map(|(column, value)| table.column_index(column).map(|c| (c, *value)))
        .collect::<Option<Vec<_>>>()
    else {
        return 0;
    };

    table
        .rows
        .iter()
        .filter(|row| positions.iter().all(|(c, value)| &row[*c] == *value))
        .count()
}

/// Count rows whose `column` contains `phrase`, ignoring case.
pub fn contains_count(table: &Table, column: &str, phrase: &str) -> usize {
    table
        .column_values(column)
        .map(|values| values.filter(|v| contains_ignore_case(v, phrase)).count())
        .unwrap_or(0)
}

/// The `k` rows with the largest numeric `column`, projected to `projection`.
///
/// Rows whose value is null or not numeric are left out. Equal values keep
/// their original row order.
pub fn top_k(table: &Table, column: &str, k: usize, projection: &[&str]) -> DataResult<Table> {
    let mut ranked: Vec<(usize, f64)> = match table.column_values(column) {
        Some(values) => values
            .enumerate()
            .filter_map(|(i, v)| v.as_f64().map(|x| (i, x)))
            .collect(),
        None => Vec::new(),
    };
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);

    let indices: Vec<usize> = ranked.into_iter().map(|(i, _)| i).collect();
    table.select(&indices).project(projection)
}

// ---------------------------------------------------------------------------
// Cross tab: fixed (row value, column value) pairs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CrossTabRow {
    pub value: Value,
    /// Rows with this row value, regardless of the column value.
    pub total: usize,
    pub cells: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub row_column: String,
    pub column_column: String,
    pub rows: Vec<CrossTabRow>,
}

/// Count each configured pair independently, e.g. ("ATIVO", "Sim").
pub fn cross_counts(table: &Table, spec: &CrossTabSpec) -> CrossTab {
    let rows = spec
        .row_values
        .iter()
        .map(|row_label| {
            let row_value = Value::Text(row_label.clone());
            let total = count_where(table, &[(spec.row_column.as_str(), &row_value)]);
            let cells = spec
                .column_values
                .iter()
                .map(|col_label| {
                    let col_value = Value::Text(col_label.clone());
                    let count = count_where(
                        table,
                        &[
                            (spec.row_column.as_str(), &row_value),
                            (spec.column_column.as_str(), &col_value),
                        ],
                    );
                    CategoryCount { category: col_value, count }
                })
                .collect();
            CrossTabRow { value: row_value, total, cells }
        })
        .collect();

    CrossTab {
        row_column: spec.row_column.clone(),
        column_column: spec.column_column.clone(),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Everything the dashboard shows for one filtered table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResult {
    pub title: String,
    pub column: String,
    pub chart: bool,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResults {
    pub total_rows: usize,
    pub frequencies: Vec<FrequencyResult>,
    pub top_k: Option<(String, Table)>,
    pub cross_tab: Option<CrossTab>,
    /// `(phrase, matching rows)` for each configured tag.
    pub tags: Vec<(String, usize)>,
}

/// Run every view configured for the dashboard. Views over optional columns
/// missing from `table` are left out.
pub fn aggregate(table: &Table, config: &DashboardConfig) -> DataResult<AggregateResults> {
    let frequencies = config
        .frequency_views
        .iter()
        .filter(|view| table.has_column(&view.column))
        .map(|view| FrequencyResult {
            title: view.title.clone(),
            column: view.column.clone(),
            chart: view.chart,
            counts: frequency_count(table, &view.column, view.top_n),
        })
        .collect();

    let top = match &config.top_k {
        Some(view) if table.has_column(&view.column) => {
            let projection: Vec<&str> = view
                .columns
                .iter()
                .map(String::as_str)
                .filter(|c| table.has_column(c))
                .collect();
            let ranked = top_k(table, &view.column, view.k, &projection)?;
            Some((view.title.clone(), ranked))
        }
        _ => None,
    };

    let cross_tab = config
        .cross_tab
        .as_ref()
        .filter(|spec| table.has_column(&spec.row_column) && table.has_column(&spec.column_column))
        .map(|spec| cross_counts(table, spec));

    let tags = match &config.tags {
        Some(spec) if table.has_column(&spec.column) => spec
            .phrases
            .iter()
            .map(|phrase| (phrase.clone(), contains_count(table, &spec.column, phrase)))
            .collect(),
        _ => Vec::new(),
    };

    Ok(AggregateResults {
        total_rows: table.len(),
        frequencies,
        top_k: top,
        cross_tab,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_cells_count_as_one_category() {
        let t = Table::new(
            vec!["bairro".into()],
            vec![vec![Value::Float(f64::NAN)], vec![Value::Float(f64::NAN)], vec!["Centro".into()]],
        );
        let counts = frequency_count(&t, "bairro", 10);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].category, Value::Float(f64::NAN));
        assert_eq!(counts[0].count, 2);
    }
    use crate::data::filter::{Criterion, apply};

    fn delays_and_services() -> Table {
        Table::new(
            vec!["delay".into(), "service".into()],
            vec![
                vec![Value::Float(5.0), "A".into()],
                vec![Value::Float(10.0), "B".into()],
                vec![Value::Float(10.0), "A".into()],
            ],
        )
    }

    #[test]
    fn range_then_frequency_scenario() {
        let t = delays_and_services();
        let filtered = apply(
            &t,
            &[Criterion::Range { column: "delay".into(), min: 6.0, max: 10.0 }],
        );
        assert_eq!(filtered.len(), 2);
        assert!(filtered.rows.iter().all(|r| r[0] == Value::Float(10.0)));

        let counts = frequency_count(&filtered, "service", 10);
        let mut pairs: Vec<(String, usize)> =
            counts.iter().map(|c| (c.category.to_string(), c.count)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("A".to_string(), 1), ("B".to_string(), 1)]);
    }

    #[test]
    fn frequency_count_is_bounded_sorted_and_skips_nulls() {
        let t = Table::new(
            vec!["bairro".into()],
            ["Centro", "Norte", "Centro", "Sul", "Norte", "Centro", ""]
                .iter()
                .map(|s| vec![if s.is_empty() { Value::Null } else { Value::from(*s) }])
                .collect(),
        );
        let counts = frequency_count(&t, "bairro", 2);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0], CategoryCount { category: "Centro".into(), count: 3 });
        assert_eq!(counts[1], CategoryCount { category: "Norte".into(), count: 2 });

        let all = frequency_count(&t, "bairro", 10);
        assert!(all.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(all.iter().all(|c| c.count > 0));
        assert_eq!(all.iter().map(|c| c.count).sum::<usize>(), 6);
    }

    #[test]
    fn frequency_ties_keep_first_seen_order() {
        let t = Table::new(
            vec!["s".into()],
            vec![vec!["B".into()], vec!["A".into()], vec!["C".into()], vec!["A".into()], vec!["B".into()]],
        );
        let labels: Vec<String> = frequency_count(&t, "s", 3)
            .into_iter()
            .map(|c| c.category.to_string())
            .collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
    }

    #[test]
    fn top_k_is_stable_for_ties() {
        let t = Table::new(
            vec!["id".into(), "v".into()],
            vec![
                vec![Value::Integer(1), Value::Float(1.0)],
                vec![Value::Integer(2), Value::Float(5.0)],
                vec![Value::Integer(3), Value::Float(5.0)],
                vec![Value::Integer(4), Value::Float(3.0)],
                vec![Value::Integer(5), Value::Null],
            ],
        );
        let top = top_k(&t, "v", 3, &["id", "v"]).unwrap();
        let ids: Vec<&Value> = top.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(ids, vec![&Value::Integer(2), &Value::Integer(3), &Value::Integer(4)]);
        assert_eq!(top.columns, vec!["id", "v"]);
    }

    #[test]
    fn cross_counts_count_each_pair() {
        let t = Table::new(
            vec!["situação".into(), "processo outorga".into()],
            vec![
                vec!["ATIVO".into(), "Sim".into()],
                vec!["ATIVO".into(), "Não".into()],
                vec!["ATIVO".into(), "Sim".into()],
                vec!["INATIVO".into(), "Solicitado".into()],
            ],
        );
        let spec = DashboardConfig::wells().cross_tab.unwrap();
        let cross = cross_counts(&t, &spec);

        assert_eq!(cross.rows.len(), 3);
        let ativo = &cross.rows[0];
        assert_eq!(ativo.total, 3);
        let counts: Vec<usize> = ativo.cells.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![2, 1, 0]);
        assert_eq!(cross.rows[1].cells[2].count, 1);
        assert_eq!(cross.rows[2].total, 0);
    }

    #[test]
    fn contains_count_ignores_case() {
        let t = Table::new(
            vec!["obs".into()],
            vec![vec!["Cliente Ausente".into()], vec![Value::Null], vec!["ausente".into()], vec!["ok".into()]],
        );
        assert_eq!(contains_count(&t, "obs", "AUSENTE"), 2);
        assert_eq!(contains_count(&t, "missing", "x"), 0);
    }

    #[test]
    fn aggregate_runs_configured_views() {
        let config = DashboardConfig::service_orders();
        let columns: Vec<String> = config.required_columns().iter().map(|c| c.to_string()).collect();
        let row = |os: f64, delay: f64, service: &str, obs: &str| -> Vec<Value> {
            vec![
                Value::Float(delay),
                Value::Float(os),
                Value::Float(os * 10.0),
                service.into(),
                "Rua 1".into(),
                "Centro".into(),
                obs.into(),
            ]
        };
        let t = Table::new(
            columns,
            vec![
                row(1.0, 3.0, "Corte", "cliente ausente"),
                row(2.0, 9.0, "Corte", "imóvel fechado"),
                row(3.0, 7.0, "Vistoria", ""),
            ],
        );

        let results = aggregate(&t, &config).unwrap();
        assert_eq!(results.total_rows, 3);
        assert_eq!(results.frequencies.len(), 2);
        assert_eq!(results.frequencies[0].counts[0].count, 2);

        let (_, top) = results.top_k.unwrap();
        assert_eq!(top.columns.len(), 7);
        assert_eq!(top.value(0, "número da os"), Some(&Value::Float(2.0)));

        assert!(results.cross_tab.is_none());
        assert_eq!(results.tags[0], ("cliente ausente".to_string(), 1));
        assert_eq!(results.tags[1], ("imóvel fechado".to_string(), 1));
    }
}
