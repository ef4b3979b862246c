//! Static Chart Renderer
//! Writes the trend and history charts to PNG files with plotters.

use crate::charts::plotter::TREND_FUELS;
use crate::data::PrimaryFuel;
use crate::views::{GlobalTrend, YearlyPivot};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_SIZE: (u32, u32) = (1400, 800);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw: {0}")]
    Empty(&'static str),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn fuel_rgb(fuel: PrimaryFuel) -> RGBColor {
    let (r, g, b) = fuel.rgb();
    RGBColor(r, g, b)
}

/// Year axis spanning the pivot with half a bar of padding.
fn year_range(years: &[i32]) -> Option<std::ops::Range<f64>> {
    let first = *years.first()?;
    let last = *years.last()?;
    Some(first as f64 - 0.5..last as f64 + 0.5)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Moving-average lines for the trend fuels.
    pub fn render_trend_png(
        trend: &GlobalTrend,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let x_range = year_range(&trend.pivot.years).ok_or(RenderError::Empty("global trend"))?;

        let series: Vec<(PrimaryFuel, Vec<(f64, f64)>)> = TREND_FUELS
            .into_iter()
            .filter_map(|fuel| {
                let averages = trend.moving_average(fuel)?;
                let points = trend
                    .pivot
                    .years
                    .iter()
                    .zip(averages)
                    .filter_map(|(year, avg)| avg.map(|v| (*year as f64, v)))
                    .collect::<Vec<_>>();
                Some((fuel, points))
            })
            .collect();

        let y_max = series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|(_, y)| *y))
            .fold(0.0_f64, f64::max)
            .max(1.0)
            * 1.05;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!(
                    "Global Trend in Energy Generation Capacity ({}-{})",
                    trend.pivot.years[0], trend.end_year
                ),
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, 0.0..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Commissioning Year")
            .y_desc(format!(
                "{} Year Moving Average of Capacity (MW)",
                trend.window
            ))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()
            .map_err(draw_err)?;

        for (fuel, points) in series {
            let color = fuel_rgb(fuel);
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(draw_err)?
                .label(format!("{}_{} Year Moving Average", fuel, trend.window))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        tracing::info!(path = %path.display(), "rendered trend chart");
        Ok(())
    }

    /// Stacked yearly bars of one country's commissioning history.
    pub fn render_history_png(
        country: &str,
        pivot: &YearlyPivot,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let x_range = year_range(&pivot.years).ok_or(RenderError::Empty("commissioning history"))?;
        let y_max = pivot.max_total().max(1.0) * 1.05;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Power Plant Commissioning History: {}", country),
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, 0.0..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Commissioning Year")
            .y_desc("Capacity (MW)")
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()
            .map_err(draw_err)?;

        let mut base = vec![0.0; pivot.years.len()];
        for (fuel, values) in &pivot.columns {
            let color = fuel_rgb(*fuel);
            let bars: Vec<Rectangle<(f64, f64)>> = pivot
                .years
                .iter()
                .zip(values)
                .zip(base.iter_mut())
                .filter(|((_, mw), _)| **mw > 0.0)
                .map(|((year, mw), bottom)| {
                    let x = *year as f64;
                    let rect =
                        Rectangle::new([(x - 0.4, *bottom), (x + 0.4, *bottom + mw)], color.filled());
                    *bottom += mw;
                    rect
                })
                .collect();

            chart
                .draw_series(bars)
                .map_err(draw_err)?
                .label(fuel.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        tracing::info!(path = %path.display(), country, "rendered history chart");
        Ok(())
    }
}
