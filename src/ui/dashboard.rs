use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::detail::{record_detail, record_keys};
use crate::data::model::Value;
use crate::data::pipeline::Outcome;
use crate::state::AppState;

use super::{panels, plot, tables};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render counts, charts, rankings and the filtered rows.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Abra uma planilha para começar  (Arquivo → Abrir…)");
        });
        return;
    }

    ui.heading(&state.config.title);
    ui.separator();

    let mut export_clicked = false;
    let AppState {
        config,
        outcome,
        detail_key,
        color_maps,
        ..
    } = &mut *state;

    let Some(Outcome::Ready { filtered, aggregates }) = outcome.as_ref() else {
        ui.colored_label(
            egui::Color32::YELLOW,
            "Nenhum dado encontrado com os filtros aplicados.",
        );
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label("Total de registros");
            ui.label(RichText::new(aggregates.total_rows.to_string()).size(32.0).strong());
            ui.separator();

            for frequency in &aggregates.frequencies {
                if frequency.chart {
                    plot::frequency_chart(ui, frequency, color_maps.get(&frequency.column));
                } else {
                    tables::counts_table(ui, frequency);
                }
                ui.separator();
            }

            if let Some(cross) = &aggregates.cross_tab {
                tables::cross_tab_grid(ui, cross);
                ui.separator();
            }

            if !aggregates.tags.is_empty() {
                ui.strong("Ocorrências em observações");
                egui::Grid::new("tags").striped(true).show(ui, |ui: &mut Ui| {
                    for (phrase, count) in &aggregates.tags {
                        ui.label(phrase);
                        ui.label(count.to_string());
                        ui.end_row();
                    }
                });
                ui.separator();
            }

            if let Some((title, ranked)) = &aggregates.top_k {
                ui.strong(title);
                tables::data_table(ui, "top_k", ranked, &config.identifier_columns, 200.0);
                ui.separator();
            }

            if let Some(view) = &config.detail {
                ui.strong("Detalhes do registro");
                let keys = record_keys(filtered, &view.key_column);
                let selected_text = detail_key
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "Selecione".to_string());
                egui::ComboBox::from_id_salt("detail_key")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui: &mut Ui| {
                        for key in keys {
                            let is_current = detail_key.as_ref() == Some(&key);
                            let label = key.to_string();
                            if ui.selectable_label(is_current, label).clicked() {
                                *detail_key = Some(key);
                            }
                        }
                    });

                let detail = detail_key
                    .as_ref()
                    .and_then(|key| record_detail(filtered, &view.key_column, key, &view.fields));
                if let Some(fields) = detail {
                    egui::Grid::new("detail").num_columns(2).show(ui, |ui: &mut Ui| {
                        for (field, value) in fields {
                            ui.strong(field);
                            ui.label(value.to_string());
                            ui.end_row();
                        }
                    });
                }
                ui.separator();
            }

            ui.strong("Tabela de registros filtrados");
            tables::data_table(ui, "filtered", filtered, &config.identifier_columns, 400.0);
            ui.separator();

            if ui.button("Baixar dados filtrados (CSV)").clicked() {
                export_clicked = true;
            }
        });

    if export_clicked {
        panels::save_file_dialog(state);
    }
}
