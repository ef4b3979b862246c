//! Country Reference Module
//! Static ISO-3 → continent lookup and the display-name override table.

use std::collections::HashMap;

/// Natural Earth (1:110m) country codes and continents.
///
/// Countries without a usable ISO-3 code in that dataset (France, Norway,
/// Kosovo) and territories too small to appear in it are deliberately absent;
/// they are resolved through [`ContinentOverrides`].
const NATURAL_EARTH: &[(&str, &str)] = &[
    ("AFG", "Asia"),
    ("AGO", "Africa"),
    ("ALB", "Europe"),
    ("ARE", "Asia"),
    ("ARG", "South America"),
    ("ARM", "Asia"),
    ("ATA", "Antarctica"),
    ("ATF", "Seven seas (open ocean)"),
    ("AUS", "Oceania"),
    ("AUT", "Europe"),
    ("AZE", "Asia"),
    ("BDI", "Africa"),
    ("BEL", "Europe"),
    ("BEN", "Africa"),
    ("BFA", "Africa"),
    ("BGD", "Asia"),
    ("BGR", "Europe"),
    ("BHS", "North America"),
    ("BIH", "Europe"),
    ("BLR", "Europe"),
    ("BLZ", "North America"),
    ("BOL", "South America"),
    ("BRA", "South America"),
    ("BRN", "Asia"),
    ("BTN", "Asia"),
    ("BWA", "Africa"),
    ("CAF", "Africa"),
    ("CAN", "North America"),
    ("CHE", "Europe"),
    ("CHL", "South America"),
    ("CHN", "Asia"),
    ("CIV", "Africa"),
    ("CMR", "Africa"),
    ("COD", "Africa"),
    ("COG", "Africa"),
    ("COL", "South America"),
    ("CRI", "North America"),
    ("CUB", "North America"),
    ("CYP", "Asia"),
    ("CZE", "Europe"),
    ("DEU", "Europe"),
    ("DJI", "Africa"),
    ("DNK", "Europe"),
    ("DOM", "North America"),
    ("DZA", "Africa"),
    ("ECU", "South America"),
    ("EGY", "Africa"),
    ("ERI", "Africa"),
    ("ESH", "Africa"),
    ("ESP", "Europe"),
    ("EST", "Europe"),
    ("ETH", "Africa"),
    ("FIN", "Europe"),
    ("FJI", "Oceania"),
    ("FLK", "South America"),
    ("GAB", "Africa"),
    ("GBR", "Europe"),
    ("GEO", "Asia"),
    ("GHA", "Africa"),
    ("GIN", "Africa"),
    ("GMB", "Africa"),
    ("GNB", "Africa"),
    ("GNQ", "Africa"),
    ("GRC", "Europe"),
    ("GRL", "North America"),
    ("GTM", "North America"),
    ("GUY", "South America"),
    ("HND", "North America"),
    ("HRV", "Europe"),
    ("HTI", "North America"),
    ("HUN", "Europe"),
    ("IDN", "Asia"),
    ("IND", "Asia"),
    ("IRL", "Europe"),
    ("IRN", "Asia"),
    ("IRQ", "Asia"),
    ("ISL", "Europe"),
    ("ISR", "Asia"),
    ("ITA", "Europe"),
    ("JAM", "North America"),
    ("JOR", "Asia"),
    ("JPN", "Asia"),
    ("KAZ", "Asia"),
    ("KEN", "Africa"),
    ("KGZ", "Asia"),
    ("KHM", "Asia"),
    ("KOR", "Asia"),
    ("KWT", "Asia"),
    ("LAO", "Asia"),
    ("LBN", "Asia"),
    ("LBR", "Africa"),
    ("LBY", "Africa"),
    ("LKA", "Asia"),
    ("LSO", "Africa"),
    ("LTU", "Europe"),
    ("LUX", "Europe"),
    ("LVA", "Europe"),
    ("MAR", "Africa"),
    ("MDA", "Europe"),
    ("MDG", "Africa"),
    ("MEX", "North America"),
    ("MKD", "Europe"),
    ("MLI", "Africa"),
    ("MMR", "Asia"),
    ("MNE", "Europe"),
    ("MNG", "Asia"),
    ("MOZ", "Africa"),
    ("MRT", "Africa"),
    ("MWI", "Africa"),
    ("MYS", "Asia"),
    ("NAM", "Africa"),
    ("NCL", "Oceania"),
    ("NER", "Africa"),
    ("NGA", "Africa"),
    ("NIC", "North America"),
    ("NLD", "Europe"),
    ("NPL", "Asia"),
    ("NZL", "Oceania"),
    ("OMN", "Asia"),
    ("PAK", "Asia"),
    ("PAN", "North America"),
    ("PER", "South America"),
    ("PHL", "Asia"),
    ("PNG", "Oceania"),
    ("POL", "Europe"),
    ("PRI", "North America"),
    ("PRK", "Asia"),
    ("PRT", "Europe"),
    ("PRY", "South America"),
    ("PSE", "Asia"),
    ("QAT", "Asia"),
    ("ROU", "Europe"),
    ("RUS", "Europe"),
    ("RWA", "Africa"),
    ("SAU", "Asia"),
    ("SDN", "Africa"),
    ("SEN", "Africa"),
    ("SLB", "Oceania"),
    ("SLE", "Africa"),
    ("SLV", "North America"),
    ("SOM", "Africa"),
    ("SRB", "Europe"),
    ("SSD", "Africa"),
    ("SUR", "South America"),
    ("SVK", "Europe"),
    ("SVN", "Europe"),
    ("SWE", "Europe"),
    ("SWZ", "Africa"),
    ("SYR", "Asia"),
    ("TCD", "Africa"),
    ("TGO", "Africa"),
    ("THA", "Asia"),
    ("TJK", "Asia"),
    ("TKM", "Asia"),
    ("TLS", "Asia"),
    ("TTO", "North America"),
    ("TUN", "Africa"),
    ("TUR", "Asia"),
    ("TWN", "Asia"),
    ("TZA", "Africa"),
    ("UGA", "Africa"),
    ("UKR", "Europe"),
    ("URY", "South America"),
    ("USA", "North America"),
    ("UZB", "Asia"),
    ("VEN", "South America"),
    ("VNM", "Asia"),
    ("VUT", "Oceania"),
    ("YEM", "Asia"),
    ("ZAF", "Africa"),
    ("ZMB", "Africa"),
    ("ZWE", "Africa"),
];

/// Continents assigned by country display name after the code join.
pub const DEFAULT_CONTINENT_OVERRIDES: &[(&str, &str)] = &[
    ("Bahrain", "Asia"),
    ("Cape Verde", "Africa"),
    ("France", "Europe"),
    ("French Guiana", "South America"),
    ("Kosovo", "Europe"),
    ("Mauritius", "Africa"),
    ("Norway", "Europe"),
    ("Singapore", "Asia"),
];

/// ISO-3 country code → continent.
#[derive(Debug, Clone)]
pub struct CountryReference {
    continents: HashMap<String, String>,
}

impl Default for CountryReference {
    fn default() -> Self {
        Self::natural_earth()
    }
}

impl CountryReference {
    /// The embedded Natural Earth table.
    pub fn natural_earth() -> Self {
        Self::from_pairs(NATURAL_EARTH.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            continents: pairs
                .into_iter()
                .map(|(code, continent)| (code.to_string(), continent.to_string()))
                .collect(),
        }
    }

    pub fn continent(&self, iso_a3: &str) -> Option<&str> {
        self.continents.get(iso_a3).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.continents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }
}

/// Country display name → continent, applied on top of the code lookup.
#[derive(Debug, Clone)]
pub struct ContinentOverrides {
    by_name: HashMap<String, String>,
}

impl Default for ContinentOverrides {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_CONTINENT_OVERRIDES.iter().copied())
    }
}

impl ContinentOverrides {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut overrides = Self {
            by_name: HashMap::new(),
        };
        overrides.extend(pairs);
        overrides
    }

    /// Add or replace entries; later entries win.
    pub fn extend<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (country, continent) in pairs {
            self.by_name
                .insert(country.to_string(), continent.to_string());
        }
    }

    pub fn continent(&self, country_long: &str) -> Option<&str> {
        self.by_name.get(country_long).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
