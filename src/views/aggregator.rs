//! Aggregator Module
//! Read-only queries over the enriched plant table, grouped with Polars.

use super::pivot::{moving_average, YearlyPivot};
use crate::data::{EnrichedPlant, OpinionRecord, OpinionTrend, PrimaryFuel, UnknownFuel};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// Share of dated records a country needs to appear in the history view.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 2.0 / 3.0;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    UnknownFuel(#[from] UnknownFuel),
}

/// Summed capacity for one (continent, country, fuel) key.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographyRow {
    pub continent: Option<String>,
    pub country: String,
    pub fuel: PrimaryFuel,
    pub capacity_mw: f64,
}

/// Summed capacity commissioned in one (year, fuel) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow {
    pub year: i32,
    pub fuel: PrimaryFuel,
    pub capacity_mw: f64,
}

/// Per-country commissioning history of the countries with enough dated plants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommissioningHistory {
    pub countries: BTreeMap<String, Vec<HistoryRow>>,
    /// Countries dropped for insufficient coverage, sorted.
    pub excluded: Vec<String>,
}

impl CommissioningHistory {
    pub fn country_names(&self) -> Vec<String> {
        self.countries.keys().cloned().collect()
    }

    pub fn rows(&self, country: &str) -> Option<&[HistoryRow]> {
        self.countries.get(country).map(Vec::as_slice)
    }
}

/// Global capacity by year and fuel, with its trailing moving averages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalTrend {
    pub end_year: i32,
    pub window: usize,
    pub pivot: YearlyPivot,
    pub moving_averages: BTreeMap<PrimaryFuel, Vec<Option<f64>>>,
}

impl GlobalTrend {
    pub fn moving_average(&self, fuel: PrimaryFuel) -> Option<&[Option<f64>]> {
        self.moving_averages.get(&fuel).map(Vec::as_slice)
    }
}

/// (year, percentage) points of one opinion trend; years without a poll are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub trend: OpinionTrend,
    pub points: Vec<(i32, f64)>,
}

/// One country's yearly commissioning next to the selected opinion trends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpinionOverlay {
    pub country_code: String,
    pub capacity: YearlyPivot,
    pub trends: Vec<TrendSeries>,
}

/// Stateless queries over the enriched table.
pub struct Aggregator;

impl Aggregator {
    /// Capacity grouped by (continent, country, fuel).
    ///
    /// Sorted by continent, country then fuel; rows without a continent come last.
    pub fn capacity_by_geography(plants: &[EnrichedPlant]) -> Result<Vec<GeographyRow>, ViewError> {
        let grouped = Self::to_dataframe(plants)?
            .lazy()
            .group_by([col("continent"), col("country_long"), col("primary_fuel")])
            .agg([col("capacity_mw").sum()])
            .collect()?;

        let continents = Self::str_values(&grouped, "continent")?;
        let countries = Self::str_values(&grouped, "country_long")?;
        let fuels = Self::fuel_values(&grouped)?;
        let capacities = Self::f64_values(&grouped, "capacity_mw")?;

        let mut rows: Vec<GeographyRow> = continents
            .into_iter()
            .zip(countries)
            .zip(fuels)
            .zip(capacities)
            .map(|(((continent, country), fuel), capacity_mw)| GeographyRow {
                continent,
                country: country.unwrap_or_default(),
                fuel,
                capacity_mw,
            })
            .collect();

        rows.sort_by(|a, b| {
            Self::cmp_continent(&a.continent, &b.continent)
                .then_with(|| a.country.cmp(&b.country))
                .then_with(|| a.fuel.cmp(&b.fuel))
        });
        Ok(rows)
    }

    /// Fuel mix of one country, largest first. Empty if the country is unknown.
    pub fn energy_composition(geography: &[GeographyRow], country: &str) -> Vec<(PrimaryFuel, f64)> {
        let mut mix: Vec<(PrimaryFuel, f64)> = geography
            .iter()
            .filter(|row| row.country == country)
            .map(|row| (row.fuel, row.capacity_mw))
            .collect();
        mix.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        mix
    }

    /// Sorted distinct country names of the geography view.
    pub fn countries(geography: &[GeographyRow]) -> Vec<String> {
        let mut names: Vec<String> = geography.iter().map(|row| row.country.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Commissioning history per country.
    ///
    /// A country is kept only if at least `threshold` of its records carry a
    /// cleaned commissioning year; the denominator is every record of that
    /// country in the enriched (storage-free) table.
    pub fn commissioning_history(
        plants: &[EnrichedPlant],
        threshold: f64,
    ) -> Result<CommissioningHistory, ViewError> {
        let mut coverage: HashMap<&str, (usize, usize)> = HashMap::new();
        for plant in plants {
            let entry = coverage.entry(plant.record.country_long.as_str()).or_default();
            entry.1 += 1;
            if plant.year().is_some() {
                entry.0 += 1;
            }
        }

        let mut excluded: Vec<String> = coverage
            .iter()
            .filter(|(_, (dated, total))| !Self::has_coverage(*dated, *total, threshold))
            .map(|(country, _)| country.to_string())
            .collect();
        excluded.sort();

        let kept: Vec<&EnrichedPlant> = plants
            .iter()
            .filter(|p| p.year().is_some())
            .filter(|p| {
                coverage
                    .get(p.record.country_long.as_str())
                    .is_some_and(|(dated, total)| Self::has_coverage(*dated, *total, threshold))
            })
            .collect();

        let grouped = Self::to_dataframe(kept)?
            .lazy()
            .group_by([col("country_long"), col("year"), col("primary_fuel")])
            .agg([col("capacity_mw").sum()])
            .collect()?;

        let countries = Self::str_values(&grouped, "country_long")?;
        let years = Self::i32_values(&grouped, "year")?;
        let fuels = Self::fuel_values(&grouped)?;
        let capacities = Self::f64_values(&grouped, "capacity_mw")?;

        let mut history: BTreeMap<String, Vec<HistoryRow>> = BTreeMap::new();
        for (((country, year), fuel), capacity_mw) in
            countries.into_iter().zip(years).zip(fuels).zip(capacities)
        {
            let (Some(country), Some(year)) = (country, year) else {
                continue;
            };
            history.entry(country).or_default().push(HistoryRow {
                year,
                fuel,
                capacity_mw,
            });
        }
        for rows in history.values_mut() {
            Self::sort_history(rows);
        }

        debug!(
            kept = history.len(),
            excluded = excluded.len(),
            threshold,
            "built commissioning history"
        );
        Ok(CommissioningHistory {
            countries: history,
            excluded,
        })
    }

    /// Global capacity by year and fuel up to `end_year` (inclusive), with a
    /// trailing moving average of `window` rows per fuel.
    pub fn global_trend(
        plants: &[EnrichedPlant],
        end_year: i32,
        window: usize,
    ) -> Result<GlobalTrend, ViewError> {
        let rows = Self::yearly_rows(
            plants
                .iter()
                .filter(|p| p.year().is_some_and(|year| year <= end_year)),
        )?;
        let pivot = YearlyPivot::from_rows(&rows);

        let moving_averages = pivot
            .columns
            .iter()
            .map(|(fuel, values)| (*fuel, moving_average(values, window)))
            .collect();

        debug!(end_year, years = pivot.years.len(), "built global trend");
        Ok(GlobalTrend {
            end_year,
            window,
            pivot,
            moving_averages,
        })
    }

    /// Yearly commissioning of one country by ISO-3 code, without a coverage threshold.
    pub fn country_history(
        plants: &[EnrichedPlant],
        country_code: &str,
    ) -> Result<Vec<HistoryRow>, ViewError> {
        Self::yearly_rows(
            plants
                .iter()
                .filter(|p| p.record.country == country_code && p.year().is_some()),
        )
    }

    /// Commissioning of `country_code` alongside the selected opinion trends.
    pub fn opinion_overlay(
        plants: &[EnrichedPlant],
        opinions: &[OpinionRecord],
        country_code: &str,
        trends: &[OpinionTrend],
    ) -> Result<OpinionOverlay, ViewError> {
        let capacity = YearlyPivot::from_rows(&Self::country_history(plants, country_code)?);

        let trends = trends
            .iter()
            .map(|trend| {
                let mut points: Vec<(i32, f64)> = opinions
                    .iter()
                    .filter_map(|record| record.value(*trend).map(|pct| (record.year, pct)))
                    .collect();
                points.sort_by_key(|(year, _)| *year);
                TrendSeries {
                    trend: *trend,
                    points,
                }
            })
            .collect();

        Ok(OpinionOverlay {
            country_code: country_code.to_string(),
            capacity,
            trends,
        })
    }

    /// Materialise enriched plants as a frame with one column per grouping key.
    pub fn to_dataframe<'a>(
        plants: impl IntoIterator<Item = &'a EnrichedPlant>,
    ) -> Result<DataFrame, ViewError> {
        let mut continents: Vec<Option<&str>> = Vec::new();
        let mut codes: Vec<&str> = Vec::new();
        let mut countries: Vec<&str> = Vec::new();
        let mut fuels: Vec<&str> = Vec::new();
        let mut capacities: Vec<f64> = Vec::new();
        let mut years: Vec<Option<i32>> = Vec::new();

        for plant in plants {
            continents.push(plant.continent.as_deref());
            codes.push(plant.record.country.as_str());
            countries.push(plant.record.country_long.as_str());
            fuels.push(plant.record.primary_fuel.label());
            capacities.push(plant.record.capacity_mw);
            years.push(plant.year());
        }

        let df = DataFrame::new(vec![
            Column::new("continent".into(), continents),
            Column::new("country".into(), codes),
            Column::new("country_long".into(), countries),
            Column::new("primary_fuel".into(), fuels),
            Column::new("capacity_mw".into(), capacities),
            Column::new("year".into(), years),
        ])?;
        Ok(df)
    }

    fn yearly_rows<'a>(
        plants: impl IntoIterator<Item = &'a EnrichedPlant>,
    ) -> Result<Vec<HistoryRow>, ViewError> {
        let grouped = Self::to_dataframe(plants)?
            .lazy()
            .filter(col("year").is_not_null())
            .group_by([col("year"), col("primary_fuel")])
            .agg([col("capacity_mw").sum()])
            .collect()?;

        let years = Self::i32_values(&grouped, "year")?;
        let fuels = Self::fuel_values(&grouped)?;
        let capacities = Self::f64_values(&grouped, "capacity_mw")?;

        let mut rows: Vec<HistoryRow> = years
            .into_iter()
            .zip(fuels)
            .zip(capacities)
            .filter_map(|((year, fuel), capacity_mw)| {
                year.map(|year| HistoryRow {
                    year,
                    fuel,
                    capacity_mw,
                })
            })
            .collect();
        Self::sort_history(&mut rows);
        Ok(rows)
    }

    fn has_coverage(dated: usize, total: usize, threshold: f64) -> bool {
        total > 0 && dated as f64 + 1e-9 >= threshold * total as f64
    }

    fn sort_history(rows: &mut [HistoryRow]) {
        rows.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.fuel.cmp(&b.fuel)));
    }

    fn cmp_continent(a: &Option<String>, b: &Option<String>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ViewError> {
        let values = df
            .column(name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    fn i32_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>, ViewError> {
        Ok(df.column(name)?.as_materialized_series().i32()?.into_iter().collect())
    }

    fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ViewError> {
        let values = df
            .column(name)?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();
        Ok(values)
    }

    fn fuel_values(df: &DataFrame) -> Result<Vec<PrimaryFuel>, ViewError> {
        Self::str_values(df, "primary_fuel")?
            .into_iter()
            .map(|v| {
                v.unwrap_or_default()
                    .parse::<PrimaryFuel>()
                    .map_err(ViewError::from)
            })
            .collect()
    }
}
