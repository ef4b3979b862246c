//! Control Panel Widget
//! Left side panel with dataset selection and dashboard filters.

use crate::config::{FIRST_YEAR, LAST_YEAR};
use crate::data::OpinionTrend;
use crate::pipeline::Selections;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::{Path, PathBuf};

/// Comparing more than this many histories squeezes the charts.
const COMPARE_HINT: usize = 2;

/// Left side control panel with file selection and view filters.
pub struct ControlPanel {
    pub plants_path: PathBuf,
    pub opinions_path: PathBuf,
    pub selections: Selections,
    /// Countries offered in the composition picker.
    pub countries: Vec<String>,
    /// Countries with enough dated plants to compare.
    pub history_countries: Vec<String>,
    pub status: String,
    pub status_is_error: bool,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(plants_path: PathBuf, opinions_path: PathBuf, selections: Selections) -> Self {
        Self {
            plants_path,
            opinions_path,
            selections,
            countries: Vec::new(),
            history_countries: Vec::new(),
            status: "Ready".to_string(),
            status_is_error: false,
            export_enabled: false,
        }
    }

    /// Refresh the pickers after a pipeline run.
    pub fn update_choices(
        &mut self,
        countries: Vec<String>,
        history_countries: Vec<String>,
        selected_country: Option<String>,
    ) {
        self.countries = countries;
        self.history_countries = history_countries;
        self.selections.country = selected_country;
        self.export_enabled = !self.countries.is_empty();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let before = self.selections.clone();

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("⚡ Energy Transition")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Power plants and climate opinion")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        if Self::path_row(ui, "Plants", &self.plants_path) {
            action = ControlPanelAction::BrowsePlants;
        }
        ui.add_space(4.0);
        if Self::path_row(ui, "Opinions", &self.opinions_path) {
            action = ControlPanelAction::BrowseOpinions;
        }
        ui.add_space(4.0);
        if ui.small_button("⟳ Reload").clicked() {
            action = ControlPanelAction::Reload;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Composition =====
        ui.label(RichText::new("🌍 Country").size(14.0).strong());
        ui.add_space(5.0);

        let selected_text = self.selections.country.clone().unwrap_or_default();
        ComboBox::from_id_salt("composition_country")
            .width(260.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for country in &self.countries {
                    let selected = self.selections.country.as_deref() == Some(country.as_str());
                    if ui.selectable_label(selected, country).clicked() {
                        self.selections.country = Some(country.clone());
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Comparison =====
        ui.label(RichText::new("📈 Compare Histories").size(14.0).strong());
        ui.label(
            RichText::new(format!("Pick up to {} countries", COMPARE_HINT))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    for country in &self.history_countries {
                        let mut checked = self.selections.compare.contains(country);
                        if ui.checkbox(&mut checked, country).changed() {
                            if checked {
                                self.selections.compare.push(country.clone());
                            } else {
                                self.selections.compare.retain(|c| c != country);
                            }
                        }
                    }
                });
            });

        if self.selections.compare.len() > COMPARE_HINT {
            ui.label(
                RichText::new("Comparing more than two countries gets crowded")
                    .size(11.0)
                    .color(Color32::from_rgb(255, 193, 7)),
            );
        }
        if ui.small_button("Clear").clicked() {
            self.selections.compare.clear();
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Global Trend =====
        ui.label(RichText::new("📅 Global Trend").size(14.0).strong());
        ui.add_space(5.0);
        ui.add(
            egui::Slider::new(&mut self.selections.end_year, FIRST_YEAR..=LAST_YEAR)
                .text("End year"),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Opinion Trends =====
        ui.label(RichText::new("💬 Climate Opinion").size(14.0).strong());
        ui.add_space(5.0);
        for trend in OpinionTrend::ALL {
            let mut checked = self.selections.trends.contains(&trend);
            if ui.checkbox(&mut checked, trend.column()).changed() {
                if checked {
                    self.selections.trends.push(trend);
                    self.selections.trends.sort();
                } else {
                    self.selections.trends.retain(|t| *t != trend);
                }
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if action == ControlPanelAction::None && self.selections != before {
            action = ControlPanelAction::SelectionChanged;
        }
        action
    }

    /// File name with a browse button; true when browse was clicked.
    fn path_row(ui: &mut egui::Ui, label: &str, path: &Path) -> bool {
        let mut clicked = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    let color = if path.is_file() {
                        Color32::WHITE
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(format!("{}:", label)).size(12.0).strong());
                    ui.label(RichText::new(name).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            clicked = true;
                        }
                    });
                });
            });
        clicked
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowsePlants,
    BrowseOpinions,
    Reload,
    SelectionChanged,
    ExportPng,
}
