//! Record Types
//! Typed rows for the power-plant and public-opinion tables.

use std::fmt;
use std::str::FromStr;

/// Dominant energy source of a power plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimaryFuel {
    Oil,
    Hydro,
    Coal,
    Nuclear,
    Gas,
    Wind,
    Solar,
    Waste,
    Petcoke,
    Biomass,
    Other,
    WaveAndTidal,
    Geothermal,
    Cogeneration,
    Storage,
}

impl PrimaryFuel {
    pub const ALL: [PrimaryFuel; 15] = [
        PrimaryFuel::Oil,
        PrimaryFuel::Hydro,
        PrimaryFuel::Coal,
        PrimaryFuel::Nuclear,
        PrimaryFuel::Gas,
        PrimaryFuel::Wind,
        PrimaryFuel::Solar,
        PrimaryFuel::Waste,
        PrimaryFuel::Petcoke,
        PrimaryFuel::Biomass,
        PrimaryFuel::Other,
        PrimaryFuel::WaveAndTidal,
        PrimaryFuel::Geothermal,
        PrimaryFuel::Cogeneration,
        PrimaryFuel::Storage,
    ];

    /// Label as it appears in the `primary_fuel` column.
    pub fn label(self) -> &'static str {
        match self {
            PrimaryFuel::Oil => "Oil",
            PrimaryFuel::Hydro => "Hydro",
            PrimaryFuel::Coal => "Coal",
            PrimaryFuel::Nuclear => "Nuclear",
            PrimaryFuel::Gas => "Gas",
            PrimaryFuel::Wind => "Wind",
            PrimaryFuel::Solar => "Solar",
            PrimaryFuel::Waste => "Waste",
            PrimaryFuel::Petcoke => "Petcoke",
            PrimaryFuel::Biomass => "Biomass",
            PrimaryFuel::Other => "Other",
            PrimaryFuel::WaveAndTidal => "Wave and Tidal",
            PrimaryFuel::Geothermal => "Geothermal",
            PrimaryFuel::Cogeneration => "Cogeneration",
            PrimaryFuel::Storage => "Storage",
        }
    }

    /// Display colour (RGB) shared by the interactive and static charts.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PrimaryFuel::Oil => (0x34, 0x35, 0x40),
            PrimaryFuel::Hydro => (0x1F, 0x66, 0xE5),
            PrimaryFuel::Coal => (0xA8, 0x9B, 0x8D),
            PrimaryFuel::Nuclear => (0xC7, 0x48, 0x48),
            PrimaryFuel::Gas => (0x7F, 0x1E, 0xD9),
            PrimaryFuel::Wind => (0x20, 0xAE, 0xB2),
            PrimaryFuel::Solar => (0xFF, 0xDB, 0x1A),
            PrimaryFuel::Waste => (0xD9, 0xD9, 0x32),
            PrimaryFuel::Petcoke => (0x21, 0x21, 0x24),
            PrimaryFuel::Biomass => (0x9D, 0xE3, 0x81),
            PrimaryFuel::Other => (0x6B, 0xBD, 0xB7),
            PrimaryFuel::WaveAndTidal => (0xAC, 0xBE, 0xE8),
            PrimaryFuel::Geothermal => (0x7D, 0x40, 0x0A),
            PrimaryFuel::Cogeneration => (0xAB, 0xAF, 0xC7),
            PrimaryFuel::Storage => (0x70, 0x80, 0x92),
        }
    }
}

impl fmt::Display for PrimaryFuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFuel(pub String);

impl fmt::Display for UnknownFuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown primary fuel '{}'", self.0)
    }
}

impl std::error::Error for UnknownFuel {}

impl FromStr for PrimaryFuel {
    type Err = UnknownFuel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PrimaryFuel::ALL
            .into_iter()
            .find(|fuel| fuel.label() == trimmed)
            .ok_or_else(|| UnknownFuel(trimmed.to_string()))
    }
}

/// One row of the power-plant dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantRecord {
    /// ISO-3 country code
    pub country: String,
    /// Country display name
    pub country_long: String,
    pub name: Option<String>,
    pub primary_fuel: PrimaryFuel,
    pub capacity_mw: f64,
    /// Raw commissioning year; fractional values occur for multi-unit plants.
    pub commissioning_year: Option<f64>,
}

/// A plant record after imputation and continent lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPlant {
    pub record: PlantRecord,
    pub cleaned_commissioning_year: Option<f64>,
    pub continent: Option<String>,
}

impl EnrichedPlant {
    /// Cleaned year truncated to year granularity.
    pub fn year(&self) -> Option<i32> {
        self.cleaned_commissioning_year.map(|y| y.trunc() as i32)
    }
}

/// The four tracked public-opinion series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpinionTrend {
    KnowsAboutClimateChange,
    WorriesAboutClimateChange,
    ExpectsSeriousProblem,
    SeesMajorThreat,
}

impl OpinionTrend {
    pub const ALL: [OpinionTrend; 4] = [
        OpinionTrend::KnowsAboutClimateChange,
        OpinionTrend::WorriesAboutClimateChange,
        OpinionTrend::ExpectsSeriousProblem,
        OpinionTrend::SeesMajorThreat,
    ];

    /// Column header in the opinion CSV, also used as the legend label.
    pub fn column(self) -> &'static str {
        match self {
            OpinionTrend::KnowsAboutClimateChange => {
                "Knows about climate change very well or fairly well"
            }
            OpinionTrend::WorriesAboutClimateChange => {
                "Worry about climate change a great deal or fair amount"
            }
            OpinionTrend::ExpectsSeriousProblem => {
                "Believe that global warming will be a serious problem"
            }
            OpinionTrend::SeesMajorThreat => "Climate change is major threat to our country",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            OpinionTrend::KnowsAboutClimateChange => (0xD4, 0x0D, 0x3B),
            OpinionTrend::WorriesAboutClimateChange => (0x0E, 0xEB, 0xE7),
            OpinionTrend::ExpectsSeriousProblem => (0x0E, 0xE8, 0x3A),
            OpinionTrend::SeesMajorThreat => (0x15, 0x14, 0x17),
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        OpinionTrend::ALL
            .into_iter()
            .find(|trend| trend.column() == column.trim())
    }
}

impl fmt::Display for OpinionTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One survey year of the opinion dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct OpinionRecord {
    pub year: i32,
    /// Percentages indexed in `OpinionTrend::ALL` order.
    pub values: [Option<f64>; 4],
}

impl OpinionRecord {
    pub fn value(&self, trend: OpinionTrend) -> Option<f64> {
        let idx = OpinionTrend::ALL.iter().position(|t| *t == trend)?;
        self.values[idx]
    }
}

pub type PlantTable = Vec<PlantRecord>;
pub type OpinionTable = Vec<OpinionRecord>;
