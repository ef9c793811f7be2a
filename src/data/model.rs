use std::collections::HashSet;
use std::fmt;

use super::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as read from a spreadsheet.
/// Used as a set member and map key downstream, so `Value` must be `Ord`.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord/Hash so we can put Value in BTreeSet and HashMap --
// Floats compare by `total_cmp` and hash by bits, so NaN equals itself and
// 0.0 differs from -0.0 everywhere.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

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
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

/// UI text. Integral floats print as whole numbers (`5`, not `5.0`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, ""),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for range filters and rankings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded spreadsheet
// ---------------------------------------------------------------------------

/// Ordered rows sharing one column set.
///
/// `rows[r][c]` is the cell of row `r` in column `columns[c]`; every row has
/// exactly `columns.len()` cells. Tables are treated as immutable once
/// prepared: filtering and projection build new tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, padding short rows with `Null` and truncating long ones
    /// so every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column. First match wins if labels repeat.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `(row, column)`; `None` if the column is absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of one column, in row order.
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    /// Distinct non-null values of a column in first-encountered order.
    pub fn distinct_values(&self, column: &str) -> Vec<Value> {
        let Some(values) = self.column_values(column) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        values
            .filter(|v| !v.is_null())
            .filter(|v| seen.insert((*v).clone()))
            .cloned()
            .collect()
    }

    /// True minimum and maximum of the numeric cells of a column.
    pub fn numeric_bounds(&self, column: &str) -> Option<(f64, f64)> {
        self.column_values(column)?
            .filter_map(Value::as_f64)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// New table holding the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// New table holding only the named columns, in the order given.
    pub fn project(&self, columns: &[&str]) -> DataResult<Table> {
        let positions = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| DataError::MissingColumn(name.to_string()))
            })
            .collect::<DataResult<Vec<usize>>>()?;

        Ok(Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| positions.iter().map(|&p| row[p].clone()).collect())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn float_equality_agrees_with_hash_and_order() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));

        let set: HashSet<Value> = [nan.clone(), Value::Float(f64::NAN), Value::Float(0.0), Value::Float(-0.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&nan));

        let t = Table::new(vec!["bairro".into()], vec![vec![nan.clone()], vec![Value::Float(f64::NAN)]]);
        assert_eq!(t.distinct_values("bairro"), vec![nan]);
    }

    fn sample() -> Table {
        Table::new(
            vec!["serviço".into(), "dias em atraso".into()],
            vec![
                vec!["A".into(), Value::Float(5.0)],
                vec![Value::Null, Value::Integer(12)],
                vec!["B".into(), Value::Float(-1.5)],
                vec!["A".into()],
            ],
        )
    }

    #[test]
    fn new_pads_short_rows() {
        let t = sample();
        assert!(t.rows.iter().all(|r| r.len() == 2));
        assert_eq!(t.value(3, "dias em atraso"), Some(&Value::Null));
    }

    #[test]
    fn distinct_values_skip_nulls_and_keep_first_order() {
        let t = sample();
        assert_eq!(t.distinct_values("serviço"), vec![Value::from("A"), Value::from("B")]);
        assert!(t.distinct_values("missing").is_empty());
    }

    #[test]
    fn numeric_bounds_ignore_non_numeric_cells() {
        let t = sample();
        assert_eq!(t.numeric_bounds("dias em atraso"), Some((-1.5, 12.0)));
        assert_eq!(t.numeric_bounds("serviço"), None);
    }

    #[test]
    fn project_reorders_and_reports_missing() {
        let t = sample();
        let p = t.project(&["dias em atraso", "serviço"]).unwrap();
        assert_eq!(p.columns, vec!["dias em atraso", "serviço"]);
        assert_eq!(p.rows[0], vec![Value::Float(5.0), Value::from("A")]);

        match t.project(&["bairro"]) {
            Err(DataError::MissingColumn(c)) => assert_eq!(c, "bairro"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn display_drops_trailing_zero_of_integral_floats() {
        assert_eq!(Value::Float(1234.0).to_string(), "1234");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
    }
}
