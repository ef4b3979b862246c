//! Year × fuel pivot and trailing moving average.

use super::aggregator::HistoryRow;
use crate::data::PrimaryFuel;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Window used by the global trend view.
pub const DEFAULT_WINDOW: usize = 10;

/// One row per distinct year (ascending), one dense column per fuel.
///
/// Every column has the same length as `years`; a fuel with no capacity in a
/// given year holds `0.0` there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearlyPivot {
    pub years: Vec<i32>,
    pub columns: BTreeMap<PrimaryFuel, Vec<f64>>,
}

impl YearlyPivot {
    pub fn from_rows(rows: &[HistoryRow]) -> Self {
        let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();

        let index: BTreeMap<i32, usize> = years
            .iter()
            .enumerate()
            .map(|(i, year)| (*year, i))
            .collect();

        let mut columns: BTreeMap<PrimaryFuel, Vec<f64>> = BTreeMap::new();
        for row in rows {
            let column = columns
                .entry(row.fuel)
                .or_insert_with(|| vec![0.0; years.len()]);
            column[index[&row.year]] += row.capacity_mw;
        }

        Self { years, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn column(&self, fuel: PrimaryFuel) -> Option<&[f64]> {
        self.columns.get(&fuel).map(Vec::as_slice)
    }

    /// Capacity commissioned in the year at `idx`, all fuels combined.
    pub fn total_at(&self, idx: usize) -> f64 {
        self.columns
            .values()
            .filter_map(|column| column.get(idx))
            .sum()
    }

    /// Largest single-year total, used to scale chart axes.
    pub fn max_total(&self) -> f64 {
        (0..self.years.len())
            .map(|idx| self.total_at(idx))
            .fold(0.0, f64::max)
    }
}

/// Trailing moving average over `window` consecutive values.
///
/// The first `window - 1` entries are `None` because the window is not full.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                Some(values[i + 1 - window..=i].iter().mean())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, fuel: PrimaryFuel, capacity_mw: f64) -> HistoryRow {
        HistoryRow {
            year,
            fuel,
            capacity_mw,
        }
    }

    #[test]
    fn pivot_fills_missing_cells_with_zero() {
        let pivot = YearlyPivot::from_rows(&[
            row(2005, PrimaryFuel::Coal, 50.0),
            row(2000, PrimaryFuel::Coal, 100.0),
            row(2010, PrimaryFuel::Wind, 30.0),
        ]);

        assert_eq!(pivot.years, vec![2000, 2005, 2010]);
        assert_eq!(pivot.column(PrimaryFuel::Coal), Some(&[100.0, 50.0, 0.0][..]));
        assert_eq!(pivot.column(PrimaryFuel::Wind), Some(&[0.0, 0.0, 30.0][..]));
        assert_eq!(pivot.column(PrimaryFuel::Gas), None);
        assert_eq!(pivot.max_total(), 100.0);
    }

    #[test]
    fn moving_average_needs_a_full_window() {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let averaged = moving_average(&values, 10);

        assert!(averaged[..9].iter().all(Option::is_none));
        let expected = [5.5, 6.5, 7.5];
        for (got, want) in averaged[9..].iter().zip(expected) {
            assert!((got.unwrap() - want).abs() < 1e-9);
        }
    }

    #[test]
    fn moving_average_shorter_than_window_is_all_none() {
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 10), vec![None, None, None]);
        assert_eq!(moving_average(&[1.0, 3.0], 1), vec![Some(1.0), Some(3.0)]);
    }
}
