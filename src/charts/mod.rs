//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, TREND_FUELS};
pub use renderer::{RenderError, StaticChartRenderer, DEFAULT_SIZE};
