//! Source locations, resolved from the environment with dataset defaults.

use std::path::PathBuf;

pub const DEFAULT_VACCINATIONS: &str = "datasets/country_vaccinations.csv";
pub const DEFAULT_COORDINATES: &str = "datasets/countries_codes_and_coordinates.csv";
pub const DEFAULT_CONTINENTS: &str = "datasets/country-and-continent-codes-list-csv_csv.csv";

/// Paths of the three tabular sources read by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub vaccinations: PathBuf,
    pub coordinates: PathBuf,
    pub continents: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            vaccinations: DEFAULT_VACCINATIONS.into(),
            coordinates: DEFAULT_COORDINATES.into(),
            continents: DEFAULT_CONTINENTS.into(),
        }
    }
}

impl SourcePaths {
    /// Reads `VAX_VACCINATIONS_CSV`, `VAX_COORDINATES_CSV` and
    /// `VAX_CONTINENTS_CSV`. A `.env` file is expected to have been loaded
    /// by the caller.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, default: &str| -> PathBuf {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
                .into()
        };
        Self {
            vaccinations: pick("VAX_VACCINATIONS_CSV", DEFAULT_VACCINATIONS),
            coordinates: pick("VAX_COORDINATES_CSV", DEFAULT_COORDINATES),
            continents: pick("VAX_CONTINENTS_CSV", DEFAULT_CONTINENTS),
        }
    }

    /// Replaces each path for which an override is given.
    pub fn with_overrides(
        mut self,
        vaccinations: Option<PathBuf>,
        coordinates: Option<PathBuf>,
        continents: Option<PathBuf>,
    ) -> Self {
        if let Some(p) = vaccinations {
            self.vaccinations = p;
        }
        if let Some(p) = coordinates {
            self.coordinates = p;
        }
        if let Some(p) = continents {
            self.continents = p;
        }
        self
    }
}
