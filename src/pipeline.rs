//! Pipeline Module
//! One full cleaner → aggregator run from the raw tables and the current selections.

use crate::config::{AppConfig, ViewConfig, FIRST_YEAR, LAST_YEAR};
use crate::data::{
    Cleaner, CleaningReport, CountryReference, ImputationPolicy, OpinionTrend, PrimaryFuel,
    RawTables, RngSampler, YearSampler,
};
use crate::views::{
    Aggregator, CommissioningHistory, GeographyRow, GlobalTrend, OpinionOverlay, ViewError,
    YearlyPivot,
};
use tracing::{debug, info_span};

/// What the user picked in the control panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    /// Country for the composition view; first country when unset or unknown.
    pub country: Option<String>,
    /// Countries whose commissioning history is shown side by side.
    pub compare: Vec<String>,
    pub end_year: i32,
    pub trends: Vec<OpinionTrend>,
}

impl Selections {
    pub fn from_config(views: &ViewConfig) -> Self {
        Self {
            country: views.default_country.clone(),
            compare: views.compare_countries.clone(),
            end_year: views.end_year,
            trends: views.selected_trends(),
        }
    }

    pub fn clamped_end_year(&self) -> i32 {
        self.end_year.clamp(FIRST_YEAR, LAST_YEAR)
    }
}

/// Everything the dashboard draws.
#[derive(Debug, Clone, Default)]
pub struct DashboardViews {
    pub report: CleaningReport,
    pub geography: Vec<GeographyRow>,
    pub countries: Vec<String>,
    pub selected_country: Option<String>,
    pub composition: Vec<(PrimaryFuel, f64)>,
    pub history: CommissioningHistory,
    /// Pivoted history of the compared countries that passed the coverage threshold.
    pub compared: Vec<(String, YearlyPivot)>,
    pub trend: GlobalTrend,
    pub overlay: OpinionOverlay,
}

/// Cleaner and aggregator settings for repeated runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    cleaner: Cleaner,
    seed: Option<u64>,
    coverage_threshold: f64,
    window: usize,
    overlay_country: String,
}

impl Pipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            cleaner: Cleaner::new(
                ImputationPolicy::default(),
                CountryReference::natural_earth(),
                config.cleaning.overrides(),
            ),
            seed: config.cleaning.seed,
            coverage_threshold: config.views.coverage_threshold,
            window: config.views.moving_average_window,
            overlay_country: config.views.overlay_country.clone(),
        }
    }

    /// Run with a fresh sampler built from the configured seed.
    pub fn run_seeded(
        &self,
        tables: &RawTables,
        selections: &Selections,
    ) -> Result<DashboardViews, ViewError> {
        let mut sampler = RngSampler::from_seed(self.seed);
        self.run(tables, selections, &mut sampler)
    }

    pub fn run<S>(
        &self,
        tables: &RawTables,
        selections: &Selections,
        sampler: &mut S,
    ) -> Result<DashboardViews, ViewError>
    where
        S: YearSampler + ?Sized,
    {
        let _span = info_span!("pipeline", end_year = selections.end_year).entered();

        let cleaned = self.cleaner.clean(&tables.plants, sampler);
        let plants = &cleaned.plants;

        let geography = Aggregator::capacity_by_geography(plants)?;
        let countries = Aggregator::countries(&geography);
        let selected_country = selections
            .country
            .as_ref()
            .filter(|c| countries.contains(c))
            .or_else(|| countries.first())
            .cloned();
        let composition = selected_country
            .as_deref()
            .map(|country| Aggregator::energy_composition(&geography, country))
            .unwrap_or_default();

        let history = Aggregator::commissioning_history(plants, self.coverage_threshold)?;
        let compared = selections
            .compare
            .iter()
            .filter_map(|country| match history.rows(country) {
                Some(rows) => Some((country.clone(), YearlyPivot::from_rows(rows))),
                None => {
                    debug!(country = %country, "no commissioning history to compare");
                    None
                }
            })
            .collect();

        let trend = Aggregator::global_trend(plants, selections.clamped_end_year(), self.window)?;
        let overlay = Aggregator::opinion_overlay(
            plants,
            &tables.opinions,
            &self.overlay_country,
            &selections.trends,
        )?;

        Ok(DashboardViews {
            report: cleaned.report,
            geography,
            countries,
            selected_country,
            composition,
            history,
            compared,
            trend,
            overlay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{plant, FixedYear};
    use crate::data::{OpinionRecord, PrimaryFuel};

    fn tables() -> RawTables {
        RawTables {
            plants: vec![
                plant("USA", "United States of America", PrimaryFuel::Coal, 100.0, Some(2000.0)),
                plant("USA", "United States of America", PrimaryFuel::Coal, 50.0, Some(2005.0)),
                plant("USA", "United States of America", PrimaryFuel::Wind, 30.0, None),
                plant("USA", "United States of America", PrimaryFuel::Storage, 8.0, None),
                plant("FRA", "France", PrimaryFuel::Nuclear, 900.0, None),
                plant("FRA", "France", PrimaryFuel::Hydro, 10.0, None),
                plant("FRA", "France", PrimaryFuel::Gas, 10.0, None),
            ],
            opinions: vec![OpinionRecord {
                year: 2010,
                values: [Some(60.0), Some(50.0), None, None],
            }],
        }
    }

    #[test]
    fn run_builds_every_view() {
        let config = AppConfig::default();
        let pipeline = Pipeline::new(&config);
        let mut selections = Selections::from_config(&config.views);
        selections.country = Some("France".to_string());
        selections.compare = vec!["United States of America".into(), "France".into()];

        let views = pipeline
            .run(&tables(), &selections, &mut FixedYear(2010))
            .unwrap();

        assert_eq!(views.report.storage_dropped, 1);
        assert_eq!(views.countries, vec!["France", "United States of America"]);
        assert_eq!(views.selected_country.as_deref(), Some("France"));
        assert_eq!(views.composition[0], (PrimaryFuel::Nuclear, 900.0));
        // France: 1 of 3 plants dated.
        assert_eq!(views.history.excluded, vec!["France".to_string()]);
        assert_eq!(views.compared.len(), 1);
        assert_eq!(views.compared[0].0, "United States of America");
        assert_eq!(views.trend.pivot.years, vec![2000, 2005, 2010]);
        assert_eq!(views.overlay.capacity.years, vec![2000, 2005, 2010]);
        assert_eq!(views.overlay.trends.len(), 1);
        assert_eq!(views.overlay.trends[0].points, vec![(2010, 60.0)]);
    }

    #[test]
    fn unknown_country_falls_back_to_first() {
        let config = AppConfig::default();
        let mut selections = Selections::from_config(&config.views);
        selections.country = Some("Narnia".to_string());
        selections.end_year = 1800;

        let views = Pipeline::new(&config)
            .run(&tables(), &selections, &mut FixedYear(2010))
            .unwrap();
        assert_eq!(views.selected_country.as_deref(), Some("France"));
        assert_eq!(selections.clamped_end_year(), FIRST_YEAR);
        assert!(views.trend.pivot.is_empty());
    }

    #[test]
    fn seeded_runs_agree() {
        let config = AppConfig::default();
        let pipeline = Pipeline::new(&config);
        let selections = Selections::from_config(&config.views);

        let first = pipeline.run_seeded(&tables(), &selections).unwrap();
        let second = pipeline.run_seeded(&tables(), &selections).unwrap();
        assert_eq!(first.geography, second.geography);
        assert_eq!(first.trend, second.trend);
    }
}
