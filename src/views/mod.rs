//! Views module - aggregations consumed by the dashboard

mod aggregator;
mod pivot;

pub use aggregator::{
    Aggregator, CommissioningHistory, GeographyRow, GlobalTrend, HistoryRow, OpinionOverlay,
    TrendSeries, ViewError, DEFAULT_COVERAGE_THRESHOLD,
};
pub use pivot::{moving_average, YearlyPivot, DEFAULT_WINDOW};
