//! "Latest total" figures for countries and continents.

use crate::error::{AtlasError, Result};
use crate::hierarchy::Atlas;
use crate::location::{Continent, Country, Location};

/// Count at the greatest date of the country's own series.
pub fn country_latest_total(country: &Country) -> Result<u64> {
    country
        .series()
        .latest()
        .map(|p| p.count)
        .ok_or_else(|| AtlasError::EmptySeries {
            name: country.name().to_string(),
        })
}

/// Sum of the members' latest totals.
///
/// This is deliberately not the tail of the continent's own aggregate
/// series: each member contributes the value at its own latest date.
pub fn continent_latest_total(atlas: &Atlas, continent: &Continent) -> Result<u64> {
    if continent.series().is_empty() {
        return Err(AtlasError::EmptySeries {
            name: continent.name().to_string(),
        });
    }

    continent
        .member_indices()
        .iter()
        .try_fold(0u64, |total, &idx| {
            let country = atlas.countries.get(idx).ok_or_else(|| {
                AtlasError::invalid_location(format!(
                    "continent '{}' refers to missing country #{idx}",
                    continent.name()
                ))
            })?;
            Ok::<_, AtlasError>(total.saturating_add(country_latest_total(country)?))
        })
}

pub fn latest_total(atlas: &Atlas, location: Location<'_>) -> Result<u64> {
    match location {
        Location::Country(country) => country_latest_total(country),
        Location::Continent(continent) => continent_latest_total(atlas, continent),
    }
}

impl Atlas {
    /// See [`latest_total`].
    pub fn latest_total(&self, location: Location<'_>) -> Result<u64> {
        latest_total(self, location)
    }
}
