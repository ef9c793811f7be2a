use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, TextEdit, Ui};

use crate::config::FilterKind;
use crate::data::filter::{Choice, Selection};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("Nenhum arquivo carregado.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let specs = state.config.filters.clone();
    let options = state.filter_options.clone();
    let selections = state.selection.selections.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, (spec, current)) in specs.iter().zip(&selections).enumerate() {
                if !table.has_column(&spec.column) {
                    continue;
                }
                ui.strong(&spec.label);

                let changed = match (&spec.kind, current) {
                    (FilterKind::Range, Selection::Range { min, max }) => {
                        match table.numeric_bounds(&spec.column) {
                            Some(bounds) => range_widget(ui, bounds, *min, *max),
                            None => {
                                ui.weak("sem valores numéricos");
                                None
                            }
                        }
                    }
                    (FilterKind::Set, Selection::Set(selected)) => {
                        set_widget(ui, i, &options[i], selected)
                    }
                    (FilterKind::Single { .. }, Selection::Single(choice)) => {
                        single_widget(ui, i, &options[i], choice)
                    }
                    (FilterKind::Search, Selection::Text(phrase)) => search_widget(ui, phrase),
                    _ => None,
                };

                if let Some(selection) = changed {
                    state.update_selection(i, selection);
                }
                ui.separator();
            }

            if ui.button("Limpar filtros").clicked() {
                state.reset_filters();
            }
        });
}

fn range_widget(ui: &mut Ui, (lo, hi): (f64, f64), min: f64, max: f64) -> Option<Selection> {
    let (mut min, mut max) = (min, max);
    let integral = lo.fract() == 0.0 && hi.fract() == 0.0;

    let mut min_slider = Slider::new(&mut min, lo..=hi).text("mín");
    let mut max_slider = Slider::new(&mut max, lo..=hi).text("máx");
    if integral {
        min_slider = min_slider.integer();
        max_slider = max_slider.integer();
    }
    let min_changed = ui.add(min_slider).changed();
    let max_changed = ui.add(max_slider).changed();

    if !(min_changed || max_changed) {
        return None;
    }
    // Keep min <= max by moving the bound the user did not touch.
    if min > max {
        if min_changed {
            max = min;
        } else {
            min = max;
        }
    }
    Some(Selection::Range { min, max })
}

fn set_widget(ui: &mut Ui, index: usize, options: &[Choice], selected: &[Choice]) -> Option<Selection> {
    let mut next = None;
    ScrollArea::vertical()
        .id_salt(("set_filter", index))
        .max_height(180.0)
        .show(ui, |ui: &mut Ui| {
            for choice in options {
                let mut checked = selected.contains(choice);
                if ui.checkbox(&mut checked, choice_label(choice)).changed() {
                    next = Some(Selection::Set(toggle_choice(selected, choice, checked)));
                }
            }
        });
    next
}

fn single_widget(ui: &mut Ui, index: usize, options: &[Choice], current: &Choice) -> Option<Selection> {
    let mut next = None;
    egui::ComboBox::from_id_salt(("single_filter", index))
        .selected_text(choice_label(current))
        .show_ui(ui, |ui: &mut Ui| {
            for choice in options {
                if ui
                    .selectable_label(choice == current, choice_label(choice))
                    .clicked()
                    && choice != current
                {
                    next = Some(Selection::Single(choice.clone()));
                }
            }
        });
    next
}

fn search_widget(ui: &mut Ui, phrase: &str) -> Option<Selection> {
    let mut text = phrase.to_string();
    let response = ui.add(TextEdit::singleline(&mut text).hint_text("contém…"));
    response.changed().then(|| Selection::Text(text))
}

/// New set selection after one checkbox flips.
///
/// Ticking "all" clears the individual picks; ticking a value drops "all".
pub fn toggle_choice(selected: &[Choice], choice: &Choice, checked: bool) -> Vec<Choice> {
    match (choice, checked) {
        (Choice::All, true) => vec![Choice::All],
        (Choice::All, false) => Vec::new(),
        (_, true) => selected
            .iter()
            .filter(|c| !c.is_all() && *c != choice)
            .cloned()
            .chain(std::iter::once(choice.clone()))
            .collect(),
        (_, false) => selected.iter().filter(|c| *c != choice).cloned().collect(),
    }
}

pub fn choice_label(choice: &Choice) -> String {
    match choice {
        Choice::All => "Todos".to_string(),
        Choice::Only(value) => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.filtered().is_some(), egui::Button::new("Exportar CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(table)) = (&state.source_name, &state.table) {
            let shown = state.filtered().map_or(0, |t| t.len());
            ui.label(format!("{name}: {} registros, {shown} exibidos", table.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir planilha")
        .add_filter("Planilhas", &["xlsx", "xlsm", "csv"])
        .add_filter("Excel", &["xlsx", "xlsm"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Exportar dados filtrados")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
