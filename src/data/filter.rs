use crate::config::{DashboardConfig, FilterKind};

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Criteria: one predicate over one column
// ---------------------------------------------------------------------------

/// Labels that mean "no restriction" when picked in a selector.
const ALL_SENTINELS: [&str; 3] = ["all", "todos", "todas"];

/// One entry of a selector: either the "all" sentinel or a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Choice {
    All,
    Only(Value),
}

impl Choice {
    /// Map a configured option label to a choice, recognising the sentinels.
    pub fn from_label(label: &str) -> Self {
        let folded = label.trim().to_lowercase();
        if ALL_SENTINELS.contains(&folded.as_str()) {
            Choice::All
        } else {
            Choice::Only(Value::Text(label.to_string()))
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

/// A single-column filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Inclusive numeric range. Null and non-numeric cells fail.
    Range { column: String, min: f64, max: f64 },
    /// Cell must be one of `values`; no restriction when empty or when the
    /// selection contains [`Choice::All`].
    OneOf { column: String, values: Vec<Choice> },
    /// Cell must equal the choice; no restriction for [`Choice::All`].
    Equals { column: String, choice: Choice },
    /// Case-insensitive substring match; no restriction for a blank phrase.
    /// Null cells never match.
    Contains { column: String, phrase: String },
}

impl Criterion {
    pub fn column(&self) -> &str {
        match self {
            Criterion::Range { column, .. }
            | Criterion::OneOf { column, .. }
            | Criterion::Equals { column, .. }
            | Criterion::Contains { column, .. } => column,
        }
    }

    /// Whether this criterion imposes no constraint and can be skipped.
    pub fn is_unrestricted(&self) -> bool {
        match self {
            Criterion::Range { .. } => false,
            Criterion::OneOf { values, .. } => values.is_empty() || values.iter().any(Choice::is_all),
            Criterion::Equals { choice, .. } => choice.is_all(),
            Criterion::Contains { phrase, .. } => phrase.trim().is_empty(),
        }
    }

    /// Test a single cell against this criterion.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Criterion::Range { min, max, .. } => value
                .as_f64()
                .is_some_and(|v| *min <= v && v <= *max),
            Criterion::OneOf { values, .. } => values.iter().any(|choice| match choice {
                Choice::All => true,
                Choice::Only(wanted) => wanted == value,
            }),
            Criterion::Equals { choice, .. } => match choice {
                Choice::All => true,
                Choice::Only(wanted) => wanted == value,
            },
            Criterion::Contains { phrase, .. } => contains_ignore_case(value, phrase),
        }
    }

    /// Whether row `row` of `table` passes. Unrestricted criteria always pass.
    pub fn matches(&self, table: &Table, row: usize) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        match table.value(row, self.column()) {
            Some(value) => self.accepts(value),
            None => true,
        }
    }
}

/// Case-insensitive containment; null cells never match.
pub fn contains_ignore_case(value: &Value, phrase: &str) -> bool {
    if value.is_null() {
        return false;
    }
    value
        .to_string()
        .to_lowercase()
        .contains(&phrase.to_lowercase())
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of rows that pass all active criteria.
///
/// Criteria are AND-ed and commute. A criterion over a column the table
/// does not have is skipped; callers only build criteria for columns that
/// survived validation.
pub fn filtered_indices(table: &Table, criteria: &[Criterion]) -> Vec<usize> {
    let active: Vec<&Criterion> = criteria
        .iter()
        .filter(|c| !c.is_unrestricted())
        .filter(|c| {
            let present = table.has_column(c.column());
            if !present {
                log::debug!("Skipping criterion on absent column '{}'", c.column());
            }
            present
        })
        .collect();

    (0..table.len())
        .filter(|&row| active.iter().all(|c| c.matches(table, row)))
        .collect()
}

/// The sub-table of rows passing all criteria. May be empty.
pub fn apply(table: &Table, criteria: &[Criterion]) -> Table {
    table.select(&filtered_indices(table, criteria))
}

// ---------------------------------------------------------------------------
// FilterSelection: the user's current widget values
// ---------------------------------------------------------------------------

/// What the user picked in one filter widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Range { min: f64, max: f64 },
    Set(Vec<Choice>),
    Single(Choice),
    Text(String),
}

/// Immutable snapshot of every filter widget, aligned with
/// [`DashboardConfig::filters`]. Built fresh on each interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    pub selections: Vec<Selection>,
}

impl FilterSelection {
    /// Selections that restrict nothing; ranges span the column's true bounds.
    pub fn unrestricted(table: &Table, config: &DashboardConfig) -> Self {
        let selections = config
            .filters
            .iter()
            .map(|spec| match &spec.kind {
                FilterKind::Range => {
                    let (min, max) = table
                        .numeric_bounds(&spec.column)
                        .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
                    Selection::Range { min, max }
                }
                FilterKind::Set => Selection::Set(vec![Choice::All]),
                FilterKind::Single { .. } => Selection::Single(Choice::All),
                FilterKind::Search => Selection::Text(String::new()),
            })
            .collect();
        FilterSelection { selections }
    }

    /// A copy with the selection at `index` replaced.
    pub fn with(&self, index: usize, selection: Selection) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.selections.get_mut(index) {
            *slot = selection;
        }
        next
    }

    /// Translate the selections into criteria.
    ///
    /// Filters over columns missing from `table` are dropped: validation has
    /// already rejected missing required columns, so these are optional
    /// columns whose filter is disabled. A range filter over a column with no
    /// numeric cells is dropped as well.
    pub fn criteria(&self, table: &Table, config: &DashboardConfig) -> Vec<Criterion> {
        config
            .filters
            .iter()
            .zip(&self.selections)
            .filter_map(|(spec, selection)| {
                if !table.has_column(&spec.column) {
                    log::warn!(
                        "Filter '{}' disabled: optional column '{}' is absent",
                        spec.label,
                        spec.column
                    );
                    return None;
                }
                let column = spec.column.clone();
                match selection {
                    Selection::Range { min, max } => {
                        table.numeric_bounds(&spec.column)?;
                        Some(Criterion::Range { column, min: *min, max: *max })
                    }
                    Selection::Set(values) => Some(Criterion::OneOf { column, values: values.clone() }),
                    Selection::Single(choice) => Some(Criterion::Equals { column, choice: choice.clone() }),
                    Selection::Text(phrase) => Some(Criterion::Contains { column, phrase: phrase.clone() }),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Table {
        Table::new(
            vec!["dias em atraso".into(), "serviço".into(), "obs comercial".into()],
            vec![
                vec![Value::Float(5.0), "A".into(), "Cliente AUSENTE no local".into()],
                vec![Value::Float(10.0), "B".into(), Value::Null],
                vec![Value::Float(10.0), "A".into(), "imóvel fechado".into()],
                vec![Value::Null, "C".into(), "cliente ausente".into()],
            ],
        )
    }

    fn range(min: f64, max: f64) -> Criterion {
        Criterion::Range { column: "dias em atraso".into(), min, max }
    }

    #[test]
    fn range_is_inclusive_and_drops_nulls() {
        let t = orders();
        assert_eq!(filtered_indices(&t, &[range(6.0, 10.0)]), vec![1, 2]);
        assert_eq!(filtered_indices(&t, &[range(5.0, 5.0)]), vec![0]);
    }

    #[test]
    fn all_sentinel_leaves_table_unchanged() {
        let t = orders();
        let c = Criterion::OneOf { column: "serviço".into(), values: vec![Choice::All] };
        assert_eq!(apply(&t, &[c]), t);
    }

    #[test]
    fn empty_set_selection_filters_nothing() {
        let t = orders();
        let c = Criterion::OneOf { column: "serviço".into(), values: vec![] };
        assert_eq!(apply(&t, &[c]).len(), t.len());
    }

    #[test]
    fn set_membership_keeps_selected_values() {
        let t = orders();
        let c = Criterion::OneOf {
            column: "serviço".into(),
            values: vec![Choice::Only("A".into()), Choice::Only("C".into())],
        };
        assert_eq!(filtered_indices(&t, &[c]), vec![0, 2, 3]);
    }

    #[test]
    fn equality_and_sentinel_labels() {
        let t = orders();
        assert_eq!(Choice::from_label(" Todos "), Choice::All);
        assert_eq!(Choice::from_label("TODAS"), Choice::All);
        let c = Criterion::Equals { column: "serviço".into(), choice: Choice::from_label("B") };
        assert_eq!(filtered_indices(&t, &[c]), vec![1]);
    }

    #[test]
    fn substring_ignores_case_and_never_matches_null() {
        let t = orders();
        let c = Criterion::Contains { column: "obs comercial".into(), phrase: "Ausente".into() };
        assert_eq!(filtered_indices(&t, &[c]), vec![0, 3]);

        let blank = Criterion::Contains { column: "obs comercial".into(), phrase: "  ".into() };
        assert_eq!(filtered_indices(&t, &[blank]).len(), 4);
    }

    #[test]
    fn filters_commute_and_return_subset() {
        let t = orders();
        let criteria = vec![
            range(0.0, 10.0),
            Criterion::Equals { column: "serviço".into(), choice: Choice::Only("A".into()) },
            Criterion::Contains { column: "obs comercial".into(), phrase: "fechado".into() },
        ];
        let forward = filtered_indices(&t, &criteria);
        let mut reversed_criteria = criteria.clone();
        reversed_criteria.reverse();
        assert_eq!(forward, filtered_indices(&t, &reversed_criteria));
        assert_eq!(forward, vec![2]);

        let out = apply(&t, &criteria);
        assert!(out.len() <= t.len());
        for row in 0..out.len() {
            assert!(criteria.iter().all(|c| c.matches(&out, row)));
        }
    }

    #[test]
    fn no_match_yields_valid_empty_table() {
        let t = orders();
        let out = apply(&t, &[range(100.0, 200.0)]);
        assert!(out.is_empty());
        assert_eq!(out.columns, t.columns);
    }

    #[test]
    fn unrestricted_selection_keeps_every_row_with_a_delay() {
        let config = DashboardConfig::service_orders();
        let t = orders();
        let selection = FilterSelection::unrestricted(&t, &config);
        assert_eq!(selection.selections[0], Selection::Range { min: 5.0, max: 10.0 });

        // "bairro" is absent here; its filter is dropped along with "situação".
        let criteria = selection.criteria(&t, &config);
        assert_eq!(criteria.len(), 3);
        assert_eq!(filtered_indices(&t, &criteria), vec![0, 1, 2]);
    }

    #[test]
    fn with_replaces_one_selection() {
        let config = DashboardConfig::service_orders();
        let t = orders();
        let base = FilterSelection::unrestricted(&t, &config);
        let next = base.with(1, Selection::Set(vec![Choice::Only("B".into())]));

        assert_ne!(base, next);
        assert_eq!(filtered_indices(&t, &next.criteria(&t, &config)), vec![1]);
    }
}
