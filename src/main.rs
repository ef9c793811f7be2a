mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::RustyDashApp;
use clap::{Parser, ValueEnum};
use config::DashboardConfig;
use eframe::egui;

/// Spreadsheet dashboards for service orders and wells.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Built-in dashboard to show.
    #[arg(long, value_enum, default_value_t = Variant::ServiceOrders)]
    variant: Variant,

    /// JSON dashboard configuration; overrides --variant.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spreadsheet (.xlsx or .csv) to open at startup.
    file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Variant {
    ServiceOrders,
    Wells,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => match args.variant {
            Variant::ServiceOrders => DashboardConfig::service_orders(),
            Variant::Wells => DashboardConfig::wells(),
        },
    };
    log::info!("Starting dashboard '{}'", config.title);

    let title = config.title.clone();
    let mut app = RustyDashApp::new(config);
    if let Some(path) = &args.file {
        app.state.open_path(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(&title, options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
