//! End-to-end runs from CSV files on disk to dashboard views.

use energy_transition::config::AppConfig;
use energy_transition::data::{DataLoader, OpinionTrend, PrimaryFuel, YearSampler};
use energy_transition::pipeline::{Pipeline, Selections};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use tempfile::tempdir;

struct Always(i32);

impl YearSampler for Always {
    fn sample_year(&mut self, range: &RangeInclusive<i32>) -> i32 {
        self.0.clamp(*range.start(), *range.end())
    }
}

const PLANTS: &str = "\
country,country_long,name,primary_fuel,capacity_mw,commissioning_year
USA,United States of America,Alpha,Coal,100,2000
USA,United States of America,Beta,Coal,50,2005
USA,United States of America,Gamma,Wind,30,
USA,United States of America,Delta,Storage,5,2015
DEU,Germany,G1,Coal,10,1990
DEU,Germany,G2,Coal,10,1991
DEU,Germany,G3,Coal,10,1992
DEU,Germany,G4,Coal,10,1993
DEU,Germany,G5,Coal,10,1994
DEU,Germany,G6,Coal,10,1995
DEU,Germany,G7,Coal,10,
DEU,Germany,G8,Coal,10,
DEU,Germany,G9,Coal,10,
DEU,Germany,G10,Coal,10,
";

fn write_inputs(dir: &Path) -> AppConfig {
    let plants = dir.join("plants.csv");
    let opinions = dir.join("opinions.csv");
    fs::write(&plants, PLANTS).unwrap();

    let mut header = vec!["Year".to_string()];
    header.extend(OpinionTrend::ALL.iter().map(|t| format!("\"{}\"", t.column())));
    let csv = format!("{}\n2000,55,40,,\n2010,62,48,,30\n", header.join(","));
    fs::write(&opinions, csv).unwrap();

    let mut config = AppConfig::default();
    config.data.plants_path = plants;
    config.data.opinions_path = opinions;
    config
}

#[test]
fn csv_to_views() {
    let dir = tempdir().unwrap();
    let config = write_inputs(dir.path());
    let tables = DataLoader::load_all(&config.data.plants_path, &config.data.opinions_path).unwrap();
    assert_eq!(tables.plants.len(), 14);
    assert_eq!(tables.opinions.len(), 2);

    let mut selections = Selections::from_config(&config.views);
    selections.compare = vec!["United States of America".into(), "Germany".into()];
    selections.trends = vec![OpinionTrend::KnowsAboutClimateChange];

    let views = Pipeline::new(&config)
        .run(&tables, &selections, &mut Always(2010))
        .unwrap();

    assert_eq!(views.report.storage_dropped, 1);
    assert_eq!(views.report.imputed.get(&PrimaryFuel::Wind), Some(&1));

    let usa: Vec<_> = views
        .geography
        .iter()
        .filter(|row| row.country == "United States of America")
        .map(|row| (row.fuel, row.capacity_mw))
        .collect();
    assert_eq!(usa, vec![(PrimaryFuel::Coal, 150.0), (PrimaryFuel::Wind, 30.0)]);

    // Germany has 6 of 10 plants dated and drops out of the comparison.
    assert_eq!(views.history.excluded, vec!["Germany".to_string()]);
    assert_eq!(views.compared.len(), 1);
    let (country, pivot) = &views.compared[0];
    assert_eq!(country, "United States of America");
    assert_eq!(pivot.years, vec![2000, 2005, 2010]);

    // Germany's dated plants still feed the global trend.
    let trend = &views.trend.pivot;
    assert_eq!(
        trend.years,
        vec![1990, 1991, 1992, 1993, 1994, 1995, 2000, 2005, 2010]
    );
    assert_eq!(
        trend.column(PrimaryFuel::Wind).unwrap(),
        &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 30.0]
    );
    assert_eq!(&trend.column(PrimaryFuel::Coal).unwrap()[6..], &[100.0, 50.0, 0.0]);

    assert_eq!(views.overlay.country_code, "USA");
    assert_eq!(views.overlay.trends.len(), 1);
    assert_eq!(
        views.overlay.trends[0].points,
        vec![(2000, 55.0), (2010, 62.0)]
    );
}

#[test]
fn end_year_clips_the_trend() {
    let dir = tempdir().unwrap();
    let config = write_inputs(dir.path());
    let tables = DataLoader::load_all(&config.data.plants_path, &config.data.opinions_path).unwrap();

    let mut selections = Selections::from_config(&config.views);
    selections.end_year = 2009;

    let views = Pipeline::new(&config)
        .run(&tables, &selections, &mut Always(2010))
        .unwrap();
    assert_eq!(views.trend.end_year, 2009);
    assert_eq!(views.trend.pivot.years.last(), Some(&2005));
    assert!(views.trend.pivot.column(PrimaryFuel::Wind).is_none());
}
