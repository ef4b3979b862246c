//! Chart Viewer Widget
//! Right side scrollable panel with the dashboard sections, top to bottom.

use crate::charts::ChartPlotter;
use crate::pipeline::DashboardViews;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const CHART_HEIGHT: f32 = 380.0;
const COMPARE_HEIGHT: f32 = 320.0;

/// Scrollable dashboard built from the latest pipeline run.
#[derive(Default)]
pub struct ChartViewer {
    pub views: Option<DashboardViews>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.views = None;
    }

    pub fn set_views(&mut self, views: DashboardViews) {
        self.views = Some(views);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(views) = &self.views else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::section(ui, "Global Energy Generation Capacity by Country and Fuel");
                ChartPlotter::draw_geography_tree(ui, &views.geography);
                ui.add_space(SECTION_SPACING);

                let country = views.selected_country.as_deref().unwrap_or_default();
                Self::section(ui, &format!("Energy Composition: {}", country));
                if views.composition.is_empty() {
                    Self::placeholder(ui, "No plants for the selected country");
                } else {
                    ChartPlotter::draw_composition_chart(
                        ui,
                        country,
                        &views.composition,
                        CHART_HEIGHT,
                    );
                }
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "Power Plant Commissioning History");
                Self::draw_compared(ui, views);
                ui.add_space(SECTION_SPACING);

                Self::section(
                    ui,
                    &format!(
                        "Global Trend in Energy Generation Capacity (up to {})",
                        views.trend.end_year
                    ),
                );
                if views.trend.pivot.is_empty() {
                    Self::placeholder(ui, "No dated plants before the end year");
                } else {
                    ChartPlotter::draw_trend_chart(ui, &views.trend, CHART_HEIGHT);
                }
                ui.add_space(SECTION_SPACING);

                Self::section(
                    ui,
                    &format!(
                        "Climate Opinion and New Capacity: {}",
                        views.overlay.country_code
                    ),
                );
                if views.overlay.capacity.is_empty() && views.overlay.trends.is_empty() {
                    Self::placeholder(ui, "No capacity or opinion data to overlay");
                } else {
                    ChartPlotter::draw_overlay_chart(ui, &views.overlay, CHART_HEIGHT);
                }
                ui.add_space(SECTION_SPACING);

                Self::draw_report(ui, views);
            });
    }

    fn draw_compared(ui: &mut egui::Ui, views: &DashboardViews) {
        if !views.history.excluded.is_empty() {
            ui.label(
                RichText::new(format!(
                    "{} countries hidden: fewer than two thirds of their plants are dated",
                    views.history.excluded.len()
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }

        if views.compared.is_empty() {
            Self::placeholder(ui, "Select countries to compare");
            return;
        }

        ui.columns(views.compared.len(), |columns| {
            for (column, (country, pivot)) in columns.iter_mut().zip(&views.compared) {
                column.label(RichText::new(country).size(14.0).strong());
                ChartPlotter::draw_history_chart(column, country, pivot, COMPARE_HEIGHT);
            }
        });
    }

    fn draw_report(ui: &mut egui::Ui, views: &DashboardViews) {
        let report = &views.report;
        egui::CollapsingHeader::new("Data cleaning")
            .default_open(false)
            .show(ui, |ui| {
                ui.label(format!("Rows read: {}", report.input_rows));
                ui.label(format!("Storage plants dropped: {}", report.storage_dropped));
                for (fuel, count) in &report.imputed {
                    ui.label(format!("{} years imputed: {}", fuel, count));
                }
                if !report.join_misses.is_empty() {
                    ui.label(format!(
                        "Countries without a continent: {}",
                        report.join_misses.len()
                    ));
                    for (code, name) in &report.join_misses {
                        ui.label(
                            RichText::new(format!("{} ({})", name, code))
                                .size(11.0)
                                .color(Color32::GRAY),
                        );
                    }
                }
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn placeholder(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(12.0).color(Color32::GRAY));
    }
}
