use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::schema::normalize_label;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Everything that distinguishes one dashboard variant from another.
/// Chosen at startup and never changed while the app runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub title: String,
    /// Default name offered when exporting the filtered rows.
    pub export_file_name: String,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub frequency_views: Vec<FrequencyView>,
    #[serde(default)]
    pub top_k: Option<TopKView>,
    #[serde(default)]
    pub cross_tab: Option<CrossTabSpec>,
    #[serde(default)]
    pub tags: Option<TagSpec>,
    #[serde(default)]
    pub detail: Option<DetailView>,
    /// Numeric columns exported without a fractional part when integral.
    #[serde(default)]
    pub identifier_columns: Vec<String>,
}

/// A column the dashboard knows about. Required columns must be present in
/// every upload; optional ones only switch their filters and views off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub label: String,
    pub column: String,
    pub kind: FilterKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Inclusive numeric range bounded by the column's min and max.
    Range,
    /// Multi-select over the column's distinct values.
    Set,
    /// Single choice; fixed options, or the column's distinct values if `None`.
    Single { options: Option<Vec<String>> },
    /// Case-insensitive substring search.
    Search,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyView {
    pub title: String,
    pub column: String,
    pub top_n: usize,
    /// Render as a bar chart rather than a table.
    #[serde(default)]
    pub chart: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKView {
    pub title: String,
    pub column: String,
    pub k: usize,
    /// Columns shown for each ranked row.
    pub columns: Vec<String>,
}

/// Counts for each `(row value, column value)` pair, e.g. status × grant process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabSpec {
    pub row_column: String,
    pub row_values: Vec<String>,
    pub column_column: String,
    pub column_values: Vec<String>,
}

/// Phrases counted inside a free-text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSpec {
    pub column: String,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub key_column: String,
    pub fields: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl DashboardConfig {
    /// Overdue service orders ("OS") per unit.
    pub fn service_orders() -> Self {
        DashboardConfig {
            title: "Dashboard de OS's".to_string(),
            export_file_name: "filtered_data.csv".to_string(),
            columns: vec![
                ColumnSpec::required("dias em atraso"),
                ColumnSpec::required("número da os"),
                ColumnSpec::required("matrícula"),
                ColumnSpec::required("serviço"),
                ColumnSpec::required("endereço"),
                ColumnSpec::required("bairro"),
                ColumnSpec::required("obs comercial"),
                ColumnSpec::optional("situação"),
            ],
            filters: vec![
                FilterSpec::new("Dias em Atraso", "dias em atraso", FilterKind::Range),
                FilterSpec::new("Serviço", "serviço", FilterKind::Set),
                FilterSpec::new("Situação", "situação", FilterKind::Single { options: None }),
                FilterSpec::new("Bairro", "bairro", FilterKind::Single { options: None }),
                FilterSpec::new("Obs Comercial", "obs comercial", FilterKind::Search),
            ],
            frequency_views: vec![
                FrequencyView {
                    title: "Top 10 Serviços".to_string(),
                    column: "serviço".to_string(),
                    top_n: 10,
                    chart: true,
                },
                FrequencyView {
                    title: "Top 5 Bairros".to_string(),
                    column: "bairro".to_string(),
                    top_n: 5,
                    chart: false,
                },
            ],
            top_k: Some(TopKView {
                title: "Top 6 OS's com mais tempo em atraso".to_string(),
                column: "dias em atraso".to_string(),
                k: 6,
                columns: [
                    "número da os",
                    "matrícula",
                    "serviço",
                    "dias em atraso",
                    "endereço",
                    "bairro",
                    "obs comercial",
                ]
                .map(String::from)
                .to_vec(),
            }),
            cross_tab: None,
            tags: Some(TagSpec {
                column: "obs comercial".to_string(),
                phrases: ["cliente ausente", "imóvel fechado", "endereço não localizado"]
                    .map(String::from)
                    .to_vec(),
            }),
            detail: Some(DetailView {
                key_column: "número da os".to_string(),
                fields: ["matrícula", "serviço", "dias em atraso", "endereço", "bairro", "obs comercial"]
                    .map(String::from)
                    .to_vec(),
            }),
            identifier_columns: vec!["número da os".to_string(), "matrícula".to_string()],
        }
    }

    /// Well monitoring ("poços") for one unit.
    pub fn wells() -> Self {
        let yes_no = |extra: &[&str]| {
            let mut options = vec!["Todos".to_string(), "Sim".to_string(), "Não".to_string()];
            options.extend(extra.iter().map(|s| s.to_string()));
            Some(options)
        };
        DashboardConfig {
            title: "Análise de Poços".to_string(),
            export_file_name: "analise_pocos.csv".to_string(),
            columns: vec![
                ColumnSpec::required("situação"),
                ColumnSpec::required("processo outorga"),
                ColumnSpec::required("termo de cessão"),
                ColumnSpec::required("numeração"),
                ColumnSpec::optional("outorga em tramitação"),
                ColumnSpec::optional("locin"),
                ColumnSpec::optional("bairro"),
                ColumnSpec::optional("sistema"),
                ColumnSpec::optional("endereço"),
                ColumnSpec::optional("observações"),
            ],
            filters: vec![
                FilterSpec::new(
                    "Situação do Poço",
                    "situação",
                    FilterKind::Single {
                        options: Some(
                            ["Todos", "ATIVO", "INATIVO", "TAMPONADO"].map(String::from).to_vec(),
                        ),
                    },
                ),
                FilterSpec::new(
                    "Processo de Outorga",
                    "processo outorga",
                    FilterKind::Single { options: yes_no(&["Solicitado"]) },
                ),
                FilterSpec::new(
                    "Termo de Cessão",
                    "termo de cessão",
                    FilterKind::Single { options: yes_no(&[]) },
                ),
                FilterSpec::new(
                    "Outorga em Tramitação",
                    "outorga em tramitação",
                    FilterKind::Single {
                        options: Some(
                            ["Todos", "Não", "Em tramitação/análise"].map(String::from).to_vec(),
                        ),
                    },
                ),
            ],
            frequency_views: vec![FrequencyView {
                title: "Quantitativo de Poços".to_string(),
                column: "situação".to_string(),
                top_n: 10,
                chart: true,
            }],
            top_k: None,
            cross_tab: Some(CrossTabSpec {
                row_column: "situação".to_string(),
                row_values: ["ATIVO", "INATIVO", "TAMPONADO"].map(String::from).to_vec(),
                column_column: "processo outorga".to_string(),
                column_values: ["Sim", "Não", "Solicitado"].map(String::from).to_vec(),
            }),
            tags: None,
            detail: Some(DetailView {
                key_column: "numeração".to_string(),
                fields: ["locin", "bairro", "situação", "sistema", "endereço", "observações"]
                    .map(String::from)
                    .to_vec(),
            }),
            identifier_columns: vec!["numeração".to_string()],
        }
    }

    /// Read a config from JSON, normalize its column names and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: DashboardConfig =
            serde_json::from_str(&text).context("parsing config JSON")?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Bring every column reference to the form the normalizer produces.
    pub fn normalize(&mut self) {
        fn norm(s: &mut String) {
            *s = normalize_label(s);
        }
        self.columns.iter_mut().for_each(|c| norm(&mut c.name));
        self.filters.iter_mut().for_each(|f| norm(&mut f.column));
        self.frequency_views.iter_mut().for_each(|v| norm(&mut v.column));
        self.identifier_columns.iter_mut().for_each(norm);
        if let Some(top) = &mut self.top_k {
            norm(&mut top.column);
            top.columns.iter_mut().for_each(norm);
        }
        if let Some(cross) = &mut self.cross_tab {
            norm(&mut cross.row_column);
            norm(&mut cross.column_column);
        }
        if let Some(tags) = &mut self.tags {
            norm(&mut tags.column);
        }
        if let Some(detail) = &mut self.detail {
            norm(&mut detail.key_column);
            detail.fields.iter_mut().for_each(norm);
        }
    }

    /// Every column a filter or view refers to must be declared.
    pub fn validate(&self) -> Result<()> {
        let mut referenced: Vec<&str> = Vec::new();
        referenced.extend(self.filters.iter().map(|f| f.column.as_str()));
        referenced.extend(self.frequency_views.iter().map(|v| v.column.as_str()));
        referenced.extend(self.identifier_columns.iter().map(String::as_str));
        if let Some(top) = &self.top_k {
            referenced.push(&top.column);
            referenced.extend(top.columns.iter().map(String::as_str));
        }
        if let Some(cross) = &self.cross_tab {
            referenced.push(&cross.row_column);
            referenced.push(&cross.column_column);
        }
        if let Some(tags) = &self.tags {
            referenced.push(&tags.column);
        }
        if let Some(detail) = &self.detail {
            referenced.push(&detail.key_column);
            referenced.extend(detail.fields.iter().map(String::as_str));
        }

        for name in referenced {
            if self.column(name).is_none() {
                bail!("column '{name}' is used by a filter or view but not declared");
            }
        }
        if self.frequency_views.iter().any(|v| v.top_n == 0) {
            bail!("frequency views need top_n of at least 1");
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Required column names in declaration order.
    pub fn required_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl ColumnSpec {
    pub fn required(name: &str) -> Self {
        ColumnSpec { name: name.to_string(), required: true }
    }

    pub fn optional(name: &str) -> Self {
        ColumnSpec { name: name.to_string(), required: false }
    }
}

impl FilterSpec {
    pub fn new(label: &str, column: &str, kind: FilterKind) -> Self {
        FilterSpec {
            label: label.to_string(),
            column: column.to_string(),
            kind,
        }
    }
}
