use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::{DashboardConfig, FilterKind};
use crate::data::cache::LoadCache;
use crate::data::export::write_csv;
use crate::data::filter::{Choice, FilterSelection, Selection};
use crate::data::loader::SourceFormat;
use crate::data::model::{Table, Value};
use crate::data::pipeline::{self, Outcome};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Dashboard variant, fixed at startup.
    pub config: DashboardConfig,

    /// Parsed uploads keyed by content.
    cache: LoadCache,

    /// Name of the file currently shown.
    pub source_name: Option<String>,

    /// Prepared table (None until user opens a file).
    pub table: Option<Arc<Table>>,

    /// Current widget values, one per configured filter.
    pub selection: FilterSelection,

    /// Choices offered by each set/single filter; empty for the others.
    pub filter_options: Vec<Vec<Choice>>,

    /// Result of the last pipeline run.
    pub outcome: Option<Outcome>,

    /// Key of the record shown in the detail section.
    pub detail_key: Option<Value>,

    /// Colours for each charted column, stable across filter changes.
    pub color_maps: BTreeMap<String, ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: LoadCache::default(),
            source_name: None,
            table: None,
            selection: FilterSelection::default(),
            filter_options: Vec::new(),
            outcome: None,
            detail_key: None,
            color_maps: BTreeMap::new(),
            status_message: None,
        }
    }

    /// Read a file from disk and ingest it. Errors end up in `status_message`.
    pub fn open_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let loaded = SourceFormat::from_path(path)
            .map_err(anyhow::Error::from)
            .and_then(|format| {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Ok((format, bytes))
            });
        match loaded {
            Ok((format, bytes)) => self.open_bytes(&name, format, &bytes),
            Err(e) => self.fail(e),
        }
    }

    /// Parse, normalize and validate uploaded bytes, then show them.
    pub fn open_bytes(&mut self, name: &str, format: SourceFormat, bytes: &[u8]) {
        match self.prepare(format, bytes) {
            Ok(table) => {
                log::info!("Loaded '{name}': {} rows, columns {:?}", table.len(), table.columns);
                log::debug!("{} uploads in the load cache", self.cache.len());
                self.source_name = Some(name.to_string());
                self.set_table(table);
            }
            Err(e) => self.fail(e.context(format!("loading '{name}'"))),
        }
    }

    fn prepare(&mut self, format: SourceFormat, bytes: &[u8]) -> Result<Table> {
        let raw = self.cache.get_or_load(format, bytes)?;
        Ok(pipeline::prepare(Table::clone(&raw), &self.config)?)
    }

    /// Ingest a prepared table: reset filters, options and colours.
    pub fn set_table(&mut self, table: Table) {
        self.selection = FilterSelection::unrestricted(&table, &self.config);
        self.filter_options = self
            .config
            .filters
            .iter()
            .map(|spec| match &spec.kind {
                FilterKind::Single { options: Some(labels) } => {
                    labels.iter().map(|l| Choice::from_label(l)).collect()
                }
                FilterKind::Single { options: None } | FilterKind::Set => {
                    std::iter::once(Choice::All)
                        .chain(table.distinct_values(&spec.column).into_iter().map(Choice::Only))
                        .collect()
                }
                FilterKind::Range | FilterKind::Search => Vec::new(),
            })
            .collect();
        self.color_maps = self
            .config
            .frequency_views
            .iter()
            .filter(|view| view.chart)
            .map(|view| {
                let values = table.distinct_values(&view.column);
                (view.column.clone(), ColorMap::new(&values))
            })
            .collect();

        self.table = Some(Arc::new(table));
        self.detail_key = None;
        self.status_message = None;
        self.rerun();
    }

    /// Replace the filter selection and recompute the dashboard.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        if selection != self.selection {
            self.selection = selection;
            self.rerun();
        }
    }

    /// Back to "no restriction" on every filter.
    pub fn reset_filters(&mut self) {
        if let Some(table) = &self.table {
            let selection = FilterSelection::unrestricted(table, &self.config);
            self.set_selection(selection);
        }
    }

    /// Re-run filter and aggregation for the current selection.
    pub fn rerun(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        match pipeline::run(table, &self.config, &self.selection) {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                if self.filtered().is_none() {
                    self.detail_key = None;
                }
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Rows passing the current filters, if any.
    pub fn filtered(&self) -> Option<&Table> {
        match &self.outcome {
            Some(Outcome::Ready { filtered, .. }) => Some(filtered),
            _ => None,
        }
    }

    /// Export the filtered rows. Nothing is written when no row matches.
    pub fn export_to(&mut self, path: &Path) {
        let Some(filtered) = self.filtered() else {
            self.status_message = Some("Nothing to export: no rows match the filters".to_string());
            return;
        };
        match write_csv(filtered, &self.config.identifier_columns, path) {
            Ok(()) => self.status_message = None,
            Err(e) => self.fail(anyhow::Error::from(e).context("exporting CSV")),
        }
    }

    pub fn update_selection(&mut self, index: usize, selection: Selection) {
        let next = self.selection.with(index, selection);
        self.set_selection(next);
    }

    fn fail(&mut self, e: anyhow::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }
}
