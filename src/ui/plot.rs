use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::aggregate::FrequencyResult;

// ---------------------------------------------------------------------------
// Frequency bar chart
// ---------------------------------------------------------------------------

/// One bar per category, coloured by category, named in the legend.
pub fn frequency_chart(ui: &mut Ui, result: &FrequencyResult, colors: Option<&ColorMap>) {
    ui.strong(&result.title);

    // One chart per bar so every category gets its own legend entry.
    let charts: Vec<BarChart> = result
        .counts
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let color = colors
                .map(|cm| cm.color_for(&entry.category))
                .unwrap_or(Color32::LIGHT_BLUE);
            let label = entry.category.to_string();
            let bar = Bar::new(i as f64, entry.count as f64)
                .name(format!("{label}: {}", entry.count))
                .fill(color)
                .width(0.7);
            BarChart::new(vec![bar]).name(label).color(color)
        })
        .collect();

    Plot::new(("frequency_chart", &result.column))
        .legend(Legend::default())
        .height(280.0)
        .y_axis_label("Quantidade")
        .show_x(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
