//! Data module - CSV loading, cleaning and enrichment

mod cleaner;
mod loader;
mod records;
mod reference;

pub use cleaner::{
    CleanedTable, Cleaner, CleaningReport, ImputationPolicy, RngSampler, YearSampler,
};
pub use loader::{DataLoader, LoadError, RawTables, PLANT_COLUMNS, YEAR_COLUMN};
pub use records::{
    EnrichedPlant, OpinionRecord, OpinionTable, OpinionTrend, PlantRecord, PlantTable,
    PrimaryFuel, UnknownFuel,
};
pub use reference::{ContinentOverrides, CountryReference, DEFAULT_CONTINENT_OVERRIDES};
