//! Energy Transition Explorer - power plant capacity and climate opinion dashboard.
//!
//! Usage: `energy_transition [CONFIG.toml]`

use anyhow::Context;
use eframe::egui;
use energy_transition::config::AppConfig;
use energy_transition::gui::EnergyApp;
use energy_transition::logging::init_logging;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("failed to load configuration")?;
    let _guard = init_logging(&config.logging)?;

    tracing::info!(
        plants = %config.data.plants_path.display(),
        opinions = %config.data.opinions_path.display(),
        "starting dashboard"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Energy Transition Explorer"),
        ..Default::default()
    };

    eframe::run_native(
        "Energy Transition Explorer",
        options,
        Box::new(|cc| Ok(Box::new(EnergyApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
