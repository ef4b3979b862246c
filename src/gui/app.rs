//! Energy Transition Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{StaticChartRenderer, DEFAULT_SIZE};
use crate::config::AppConfig;
use crate::data::{DataLoader, RawTables};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{Pipeline, Selections};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Main application window.
pub struct EnergyApp {
    pipeline: Pipeline,
    tables: Option<RawTables>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl EnergyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            pipeline: Pipeline::new(&config),
            tables: None,
            control_panel: ControlPanel::new(
                config.data.plants_path.clone(),
                config.data.opinions_path.clone(),
                Selections::from_config(&config.views),
            ),
            chart_viewer: ChartViewer::new(),
        };
        app.handle_reload();
        app
    }

    /// Read both datasets and rebuild every view.
    fn handle_reload(&mut self) {
        self.chart_viewer.clear();
        let plants = self.control_panel.plants_path.clone();
        let opinions = self.control_panel.opinions_path.clone();

        match DataLoader::load_all(&plants, &opinions) {
            Ok(tables) => {
                self.control_panel.set_status(format!(
                    "Loaded {} plants, {} opinion years",
                    tables.plants.len(),
                    tables.opinions.len()
                ));
                self.tables = Some(tables);
                self.handle_selection_changed();
            }
            Err(e) => {
                error!(error = %e, "failed to load datasets");
                self.tables = None;
                self.control_panel.update_choices(Vec::new(), Vec::new(), None);
                self.control_panel.set_error(format!("Error: {}", e));
            }
        }
    }

    fn handle_browse(&mut self, plants: bool) {
        let title = if plants {
            "Power plant database"
        } else {
            "Public opinion survey"
        };
        let Some(path) = rfd::FileDialog::new()
            .set_title(title)
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        if plants {
            self.control_panel.plants_path = path;
        } else {
            self.control_panel.opinions_path = path;
        }
        self.handle_reload();
    }

    /// Re-run cleaning and aggregation for the current selections.
    fn handle_selection_changed(&mut self) {
        let Some(tables) = &self.tables else {
            return;
        };

        match self
            .pipeline
            .run_seeded(tables, &self.control_panel.selections)
        {
            Ok(views) => {
                self.control_panel.update_choices(
                    views.countries.clone(),
                    views.history.country_names(),
                    views.selected_country.clone(),
                );
                self.chart_viewer.set_views(views);
            }
            Err(e) => {
                error!(error = %e, "failed to build views");
                self.control_panel.set_error(format!("Error: {}", e));
            }
        }
    }

    /// Export the trend chart, plus one history chart per compared country.
    fn handle_export_png(&mut self) {
        let Some(views) = &self.chart_viewer.views else {
            self.control_panel.set_error("No charts to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("global_trend.png")
            .save_file()
        else {
            return;
        };

        let mut written: Vec<PathBuf> = Vec::new();
        match StaticChartRenderer::render_trend_png(&views.trend, &output_path, DEFAULT_SIZE) {
            Ok(()) => written.push(output_path.clone()),
            Err(e) => warn!(error = %e, "trend chart not exported"),
        }

        for (country, pivot) in &views.compared {
            let path = Self::sibling_path(&output_path, country);
            match StaticChartRenderer::render_history_png(country, pivot, &path, DEFAULT_SIZE) {
                Ok(()) => written.push(path),
                Err(e) => warn!(error = %e, country = %country, "history chart not exported"),
            }
        }

        match written.first() {
            Some(first) => {
                info!(count = written.len(), "exported charts");
                if let Err(e) = open::that(first) {
                    warn!(error = %e, "could not open exported chart");
                }
                self.control_panel
                    .set_status(format!("Exported {} chart(s)", written.len()));
            }
            None => self.control_panel.set_error("Error: nothing to export"),
        }
    }

    /// `trend.png` → `trend_<country>.png` in the same directory.
    fn sibling_path(base: &Path, country: &str) -> PathBuf {
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "chart".to_string());
        let suffix: String = country
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        base.with_file_name(format!("{}_{}.png", stem, suffix))
    }
}

impl eframe::App for EnergyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowsePlants => self.handle_browse(true),
                        ControlPanelAction::BrowseOpinions => self.handle_browse(false),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::SelectionChanged => self.handle_selection_changed(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_names_are_file_safe() {
        let base = Path::new("/tmp/out/global_trend.png");
        assert_eq!(
            EnergyApp::sibling_path(base, "United States of America"),
            PathBuf::from("/tmp/out/global_trend_United_States_of_America.png")
        );
    }
}
