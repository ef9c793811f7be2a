use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::{CrossTab, FrequencyResult};
use crate::data::export::cell_text;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Tabular widgets
// ---------------------------------------------------------------------------

/// Scrollable grid of a whole table.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table, identifier_columns: &[String], max_height: f32) {
    let identifier: Vec<bool> = table
        .columns
        .iter()
        .map(|c| identifier_columns.contains(c))
        .collect();

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .columns(Column::auto().at_least(60.0).clip(true), table.columns.len())
            .header(22.0, |mut header| {
                for name in &table.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for (value, &is_id) in cells.iter().zip(&identifier) {
                        row.col(|ui| {
                            ui.label(cell_text(value, is_id));
                        });
                    }
                });
            });
    });
}

/// `(category, count)` pairs as a two-column grid.
pub fn counts_table(ui: &mut Ui, result: &FrequencyResult) {
    ui.strong(&result.title);
    egui::Grid::new(("counts", &result.column))
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong(&result.column);
            ui.strong("Quantidade");
            ui.end_row();
            for entry in &result.counts {
                ui.label(entry.category.to_string());
                ui.label(entry.count.to_string());
                ui.end_row();
            }
        });
}

/// Totals per row value with a breakdown by column value.
pub fn cross_tab_grid(ui: &mut Ui, cross: &CrossTab) {
    ui.strong(format!("{} × {}", cross.row_column, cross.column_column));
    let Some(first) = cross.rows.first() else {
        return;
    };

    egui::Grid::new("cross_tab")
        .striped(true)
        .num_columns(first.cells.len() + 2)
        .show(ui, |ui: &mut Ui| {
            ui.strong(&cross.row_column);
            ui.strong("Total");
            for cell in &first.cells {
                ui.strong(cell.category.to_string());
            }
            ui.end_row();

            for row in &cross.rows {
                ui.label(row.value.to_string());
                ui.label(row.total.to_string());
                for cell in &row.cells {
                    ui.label(cell.count.to_string());
                }
                ui.end_row();
            }
        });
}
