//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::data::{OpinionTrend, PrimaryFuel};
use crate::views::{GeographyRow, GlobalTrend, OpinionOverlay, YearlyPivot};
use egui::{Color32, RichText};
use egui_plot::{AxisHints, Bar, BarChart, HPlacement, Legend, Line, Plot, PlotPoints};
use std::collections::BTreeMap;

/// Fuels drawn in the global trend chart.
pub const TREND_FUELS: [PrimaryFuel; 6] = [
    PrimaryFuel::Coal,
    PrimaryFuel::Hydro,
    PrimaryFuel::Nuclear,
    PrimaryFuel::Gas,
    PrimaryFuel::Solar,
    PrimaryFuel::Wind,
];

const BAR_WIDTH: f64 = 0.8;
const UNASSIGNED_CONTINENT: &str = "(no continent)";

/// Draws the dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn fuel_color(fuel: PrimaryFuel) -> Color32 {
        let (r, g, b) = fuel.rgb();
        Color32::from_rgb(r, g, b)
    }

    pub fn trend_color(trend: OpinionTrend) -> Color32 {
        let (r, g, b) = trend.rgb();
        Color32::from_rgb(r, g, b)
    }

    /// Continent → country → fuel breakdown with capacity shares.
    pub fn draw_geography_tree(ui: &mut egui::Ui, geography: &[GeographyRow]) {
        let world_total: f64 = geography.iter().map(|r| r.capacity_mw).sum();
        if world_total <= 0.0 {
            ui.label(RichText::new("No capacity data").color(Color32::GRAY));
            return;
        }

        let mut tree: BTreeMap<&str, BTreeMap<&str, Vec<&GeographyRow>>> = BTreeMap::new();
        for row in geography {
            let continent = row.continent.as_deref().unwrap_or(UNASSIGNED_CONTINENT);
            tree.entry(continent)
                .or_default()
                .entry(row.country.as_str())
                .or_default()
                .push(row);
        }

        ui.label(
            RichText::new(format!("World: {}", Self::format_mw(world_total)))
                .size(14.0)
                .strong(),
        );

        for (continent, countries) in &tree {
            let continent_total: f64 = countries
                .values()
                .flatten()
                .map(|r| r.capacity_mw)
                .sum();
            let header = format!(
                "{}  {}  ({:.1}%)",
                continent,
                Self::format_mw(continent_total),
                continent_total / world_total * 100.0
            );

            egui::CollapsingHeader::new(header)
                .default_open(false)
                .show(ui, |ui| {
                    for (country, rows) in countries {
                        let country_total: f64 = rows.iter().map(|r| r.capacity_mw).sum();
                        egui::CollapsingHeader::new(format!(
                            "{}  {}",
                            country,
                            Self::format_mw(country_total)
                        ))
                        .default_open(false)
                        .show(ui, |ui| {
                            for row in rows {
                                Self::draw_share_line(
                                    ui,
                                    row.fuel,
                                    row.capacity_mw,
                                    row.capacity_mw / country_total.max(f64::EPSILON),
                                );
                            }
                        });
                    }
                });
        }
    }

    /// Horizontal bars of one country's fuel mix.
    pub fn draw_composition_chart(
        ui: &mut egui::Ui,
        country: &str,
        mix: &[(PrimaryFuel, f64)],
        height: f32,
    ) {
        let total: f64 = mix.iter().map(|(_, mw)| mw).sum();
        let labels: Vec<String> = mix.iter().map(|(fuel, _)| fuel.label().to_string()).collect();

        let charts: Vec<BarChart> = mix
            .iter()
            .enumerate()
            .map(|(i, (fuel, mw))| {
                let share = if total > 0.0 { mw / total * 100.0 } else { 0.0 };
                BarChart::new(vec![Bar::new(i as f64, *mw)
                    .width(BAR_WIDTH)
                    .name(format!("{} {:.1}%", fuel, share))])
                .horizontal()
                .color(Self::fuel_color(*fuel))
                .name(fuel.label())
            })
            .collect();

        Plot::new(format!("composition_{}", country))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Capacity (MW)")
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Stacked bars of capacity commissioned per year and fuel.
    pub fn draw_history_chart(ui: &mut egui::Ui, id: &str, pivot: &YearlyPivot, height: f32) {
        let charts = Self::stacked_bars(pivot, 1.0);

        Plot::new(format!("history_{}", id))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Commissioning Year")
            .y_axis_label("Capacity (MW)")
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Moving-average lines of the global trend.
    pub fn draw_trend_chart(ui: &mut egui::Ui, trend: &GlobalTrend, height: f32) {
        let window = trend.window;

        Plot::new("global_trend")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Commissioning Year")
            .y_axis_label(format!("{} Year Moving Average of Capacity (MW)", window))
            .show(ui, |plot_ui| {
                for fuel in TREND_FUELS {
                    let Some(averages) = trend.moving_average(fuel) else {
                        continue;
                    };
                    let points: PlotPoints = trend
                        .pivot
                        .years
                        .iter()
                        .zip(averages)
                        .filter_map(|(year, avg)| avg.map(|v| [*year as f64, v]))
                        .collect();

                    plot_ui.line(
                        Line::new(points)
                            .color(Self::fuel_color(fuel))
                            .width(2.0)
                            .name(format!("{}_{} Year Moving Average", fuel, window)),
                    );
                }
            });
    }

    /// Stacked yearly bars with opinion trends on a percentage axis to the right.
    ///
    /// Percentages are scaled onto the capacity axis so 100% meets the tallest bar.
    pub fn draw_overlay_chart(ui: &mut egui::Ui, overlay: &OpinionOverlay, height: f32) {
        let scale = overlay.capacity.max_total().max(1.0);
        let charts = Self::stacked_bars(&overlay.capacity, 0.5);

        let axes = vec![
            AxisHints::new_y().label("Capacity (MW)"),
            AxisHints::new_y()
                .label(Self::opinion_axis_label(&overlay.country_code))
                .placement(HPlacement::Right)
                .formatter(move |mark, _range| format!("{:.0}%", mark.value / scale * 100.0)),
        ];

        Plot::new(format!("overlay_{}", overlay.country_code))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Commissioning Year")
            .custom_y_axes(axes)
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
                for series in &overlay.trends {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .map(|(year, pct)| [*year as f64, pct / 100.0 * scale])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(Self::trend_color(series.trend))
                            .width(2.0)
                            .name(series.trend.column()),
                    );
                }
            });
    }

    /// One bar chart per fuel, each stacked on the ones before it.
    ///
    /// Stacking pairs bars by index, so every chart carries one bar per pivot year.
    fn stacked_bars(pivot: &YearlyPivot, opacity: f32) -> Vec<BarChart> {
        let mut charts: Vec<BarChart> = Vec::new();

        for (fuel, values) in &pivot.columns {
            let color = Self::fuel_color(*fuel).gamma_multiply(opacity);
            let bars: Vec<Bar> = pivot
                .years
                .iter()
                .zip(values)
                .map(|(year, mw)| Bar::new(*year as f64, *mw).width(BAR_WIDTH))
                .collect();

            let below: Vec<&BarChart> = charts.iter().collect();
            let chart = BarChart::new(bars)
                .color(color)
                .name(fuel.label())
                .stack_on(&below);
            charts.push(chart);
        }

        charts
    }

    fn draw_share_line(ui: &mut egui::Ui, fuel: PrimaryFuel, capacity_mw: f64, share: f64) {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, Self::fuel_color(fuel));
            ui.label(RichText::new(fuel.label()).size(12.0));
            ui.label(
                RichText::new(format!(
                    "{}  ({:.1}%)",
                    Self::format_mw(capacity_mw),
                    share * 100.0
                ))
                .size(12.0)
                .color(Color32::GRAY),
            );
        });
    }

    /// Right-hand axis title of the opinion overlay.
    pub fn opinion_axis_label(country_code: &str) -> String {
        format!("Percentage of respondents ({})", country_code)
    }

    pub fn format_mw(mw: f64) -> String {
        if mw >= 1_000_000.0 {
            format!("{:.2} TW", mw / 1_000_000.0)
        } else if mw >= 1_000.0 {
            format!("{:.1} GW", mw / 1_000.0)
        } else {
            format!("{:.1} MW", mw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_units_scale() {
        assert_eq!(ChartPlotter::format_mw(12.345), "12.3 MW");
        assert_eq!(ChartPlotter::format_mw(4_500.0), "4.5 GW");
        assert_eq!(ChartPlotter::format_mw(2_000_000.0), "2.00 TW");
    }

    #[test]
    fn opinion_axis_names_the_overlay_country() {
        assert_eq!(
            ChartPlotter::opinion_axis_label("DEU"),
            "Percentage of respondents (DEU)"
        );
    }

    #[test]
    fn colors_follow_fuel_palette() {
        assert_eq!(
            ChartPlotter::fuel_color(PrimaryFuel::Solar),
            Color32::from_rgb(0xFF, 0xDB, 0x1A)
        );
    }
}
