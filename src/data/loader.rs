//! CSV Data Loader Module
//! Reads the power-plant and public-opinion datasets into typed tables using Polars.

use super::records::{OpinionRecord, OpinionTable, OpinionTrend, PlantRecord, PlantTable, PrimaryFuel};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Columns the plant loader requires.
pub const PLANT_COLUMNS: [&str; 5] = [
    "country",
    "country_long",
    "primary_fuel",
    "capacity_mw",
    "commissioning_year",
];

pub const YEAR_COLUMN: &str = "Year";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Malformed row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// Both input tables, as read from disk.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub plants: PlantTable,
    pub opinions: OpinionTable,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load both datasets.
    pub fn load_all(plants_path: &Path, opinions_path: &Path) -> Result<RawTables, LoadError> {
        Ok(RawTables {
            plants: Self::load_plants(plants_path)?,
            opinions: Self::load_opinions(opinions_path)?,
        })
    }

    /// Load the power-plant table.
    pub fn load_plants(path: &Path) -> Result<PlantTable, LoadError> {
        let df = Self::read_csv(path)?;
        Self::require_columns(&df, &PLANT_COLUMNS)?;

        let countries = Self::string_values(&df, "country")?;
        let names_long = Self::string_values(&df, "country_long")?;
        let fuels = Self::string_values(&df, "primary_fuel")?;
        let capacities = Self::float_values(&df, "capacity_mw")?;
        let years = Self::float_values(&df, "commissioning_year")?;
        let plant_names = if df.get_column_index("name").is_some() {
            Self::string_values(&df, "name")?
        } else {
            vec![None; df.height()]
        };

        let mut plants = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let row = i + 1;
            let country = countries[i]
                .clone()
                .ok_or_else(|| Self::malformed(row, "missing country code"))?;
            let country_long = names_long[i]
                .clone()
                .ok_or_else(|| Self::malformed(row, "missing country name"))?;
            let primary_fuel = fuels[i]
                .as_deref()
                .ok_or_else(|| Self::malformed(row, "missing primary fuel"))?
                .parse::<PrimaryFuel>()
                .map_err(|e| Self::malformed(row, &e.to_string()))?;
            let capacity_mw = capacities[i]
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| Self::malformed(row, "capacity_mw must be a non-negative number"))?;
            let commissioning_year = match years[i] {
                Some(year) if !year.is_finite() => {
                    return Err(Self::malformed(row, "commissioning_year must be finite"));
                }
                year => year,
            };

            plants.push(PlantRecord {
                country,
                country_long,
                name: plant_names[i].clone(),
                primary_fuel,
                capacity_mw,
                commissioning_year,
            });
        }

        info!(rows = plants.len(), path = %path.display(), "loaded power plant dataset");
        Ok(plants)
    }

    /// Load the public-opinion table.
    pub fn load_opinions(path: &Path) -> Result<OpinionTable, LoadError> {
        let df = Self::read_csv(path)?;
        let mut required = vec![YEAR_COLUMN];
        required.extend(OpinionTrend::ALL.iter().map(|t| t.column()));
        Self::require_columns(&df, &required)?;

        let years = Self::float_values(&df, YEAR_COLUMN)?;
        let mut trend_values = Vec::with_capacity(OpinionTrend::ALL.len());
        for trend in OpinionTrend::ALL {
            trend_values.push(Self::float_values(&df, trend.column())?);
        }

        let mut opinions = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let row = i + 1;
            let year = years[i]
                .filter(|y| y.is_finite() && y.fract() == 0.0)
                .ok_or_else(|| Self::malformed(row, "Year must be an integer"))?
                as i32;

            let mut values = [None; 4];
            for (slot, column) in values.iter_mut().zip(trend_values.iter()) {
                let value = column[i];
                if let Some(pct) = value {
                    if !(0.0..=100.0).contains(&pct) {
                        return Err(Self::malformed(
                            row,
                            &format!("percentage {} outside 0-100", pct),
                        ));
                    }
                }
                *slot = value;
            }

            opinions.push(OpinionRecord { year, values });
        }

        info!(rows = opinions.len(), path = %path.display(), "loaded public opinion dataset");
        Ok(opinions)
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
        if !path.is_file() {
            return Err(LoadError::Missing(path.to_path_buf()));
        }

        debug!(path = %path.display(), "reading csv");
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), LoadError> {
        for column in columns {
            if df.get_column_index(column).is_none() {
                return Err(LoadError::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }

    fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoadError> {
        let column = df.column(name)?.cast(&DataType::String)?;
        let values = column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect();
        Ok(values)
    }

    /// Numeric column as floats. A cell that is present but does not parse is
    /// reported as malformed instead of becoming null.
    fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoadError> {
        let raw = df.column(name)?;
        let column = raw.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = column.as_materialized_series().f64()?.into_iter().collect();

        let raw_nulls = raw.as_materialized_series().is_null();
        for (i, (value, was_null)) in values.iter().zip(raw_nulls.into_iter()).enumerate() {
            if value.is_none() && was_null == Some(false) {
                return Err(Self::malformed(i + 1, &format!("{} is not a number", name)));
            }
        }
        Ok(values)
    }

    fn malformed(row: usize, reason: &str) -> LoadError {
        LoadError::Malformed {
            row,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PLANTS_CSV: &str = "\
country,country_long,name,primary_fuel,capacity_mw,commissioning_year
USA,United States of America,Plant A,Coal,100.0,2000
USA,United States of America,Plant B,Wind,30.5,
FRA,France,Plant C,Nuclear,900,1985.5
";

    fn opinion_header() -> String {
        let mut header = vec![YEAR_COLUMN.to_string()];
        header.extend(OpinionTrend::ALL.iter().map(|t| format!("\"{}\"", t.column())));
        header.join(",")
    }

    #[test]
    fn loads_plant_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plants.csv");
        fs::write(&path, PLANTS_CSV).unwrap();

        let plants = DataLoader::load_plants(&path).unwrap();
        assert_eq!(plants.len(), 3);
        assert_eq!(plants[0].primary_fuel, PrimaryFuel::Coal);
        assert_eq!(plants[0].commissioning_year, Some(2000.0));
        assert_eq!(plants[1].commissioning_year, None);
        assert_eq!(plants[1].capacity_mw, 30.5);
        assert_eq!(plants[2].country_long, "France");
        assert_eq!(plants[2].commissioning_year, Some(1985.5));
        assert_eq!(plants[2].name.as_deref(), Some("Plant C"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = DataLoader::load_plants(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Missing(_)));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plants.csv");
        fs::write(&path, "country,country_long,primary_fuel\nUSA,United States,Coal\n").unwrap();

        let err = DataLoader::load_plants(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "capacity_mw"));
    }

    #[test]
    fn unknown_fuel_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plants.csv");
        fs::write(
            &path,
            "country,country_long,primary_fuel,capacity_mw,commissioning_year\n\
             USA,United States,Coal,1,2000\n\
             USA,United States,Fusion,1,2001\n",
        )
        .unwrap();

        let err = DataLoader::load_plants(&path).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }));
    }

    #[test]
    fn loads_opinion_rows_with_gaps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("opinion.csv");
        let csv = format!("{}\n2010,70,,55,\n2013,72,60,,40\n", opinion_header());
        fs::write(&path, csv).unwrap();

        let opinions = DataLoader::load_opinions(&path).unwrap();
        assert_eq!(opinions.len(), 2);
        assert_eq!(opinions[0].year, 2010);
        assert_eq!(
            opinions[0].value(OpinionTrend::KnowsAboutClimateChange),
            Some(70.0)
        );
        assert_eq!(opinions[0].value(OpinionTrend::WorriesAboutClimateChange), None);
        assert_eq!(opinions[1].value(OpinionTrend::SeesMajorThreat), Some(40.0));
    }

    #[test]
    fn percentage_out_of_range_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("opinion.csv");
        let csv = format!("{}\n2010,170,1,2,3\n", opinion_header());
        fs::write(&path, csv).unwrap();

        let err = DataLoader::load_opinions(&path).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { row: 1, .. }));
    }

    const PLANT_HEADER: &str = "country,country_long,primary_fuel,capacity_mw,commissioning_year";

    fn plant_error(rows: &str) -> LoadError {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plants.csv");
        fs::write(&path, format!("{}\n{}", PLANT_HEADER, rows)).unwrap();
        DataLoader::load_plants(&path).unwrap_err()
    }

    fn opinion_error(rows: &str) -> LoadError {
        let dir = tempdir().unwrap();
        let path = dir.path().join("opinion.csv");
        fs::write(&path, format!("{}\n{}", opinion_header(), rows)).unwrap();
        DataLoader::load_opinions(&path).unwrap_err()
    }

    #[test]
    fn unparseable_commissioning_year_is_malformed() {
        let err = plant_error("USA,United States,Coal,1,2000\nUSA,United States,Wind,1,not-a-year\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn unparseable_capacity_is_malformed() {
        let err = plant_error("USA,United States,Coal,1,2000\nUSA,United States,Coal,lots,2001\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn negative_capacity_is_malformed() {
        let err = plant_error("USA,United States,Coal,1,2000\nUSA,United States,Coal,-5,2001\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn non_finite_capacity_is_malformed() {
        let err = plant_error("USA,United States,Coal,1,2000\nUSA,United States,Coal,inf,2001\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn missing_key_fields_are_malformed() {
        let err = plant_error("USA,United States,Coal,1,2000\n,United States,Coal,1,2001\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");

        let err = plant_error("USA,United States,Coal,1,2000\nUSA,,Coal,1,2001\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");

        let err = plant_error("USA,United States,Coal,1,2000\nUSA,United States,,1,2001\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn ragged_plant_row_is_a_csv_error() {
        let err = plant_error("USA,United States,Coal,1,2000\nUSA,United States,Coal,1,2001,extra,fields\n");
        assert!(matches!(err, LoadError::CsvError(_)), "{err}");
    }

    #[test]
    fn unparseable_percentage_is_malformed() {
        let err = opinion_error("2009,68,50,1,2\n2010,70,n/a,1,2\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn missing_survey_year_is_malformed() {
        let err = opinion_error("2009,68,50,1,2\n,70,50,1,2\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }

    #[test]
    fn fractional_survey_year_is_malformed() {
        let err = opinion_error("2009,68,50,1,2\n2010.5,70,50,1,2\n");
        assert!(matches!(err, LoadError::Malformed { row: 2, .. }), "{err}");
    }
}
