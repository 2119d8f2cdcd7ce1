//! Construction of countries and continents from parsed sources.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::Atlas;
use super::centroids::centroid;
use crate::error::{AtlasError, Result};
use crate::imputer::sum_forward_filled;
use crate::location::{Continent, Coordinates, Country};
use crate::reader::{ContinentMembership, VaccinationTable};

/// Builds one [`Country`] per vaccination code that also has a coordinate
/// entry, in vaccination-source order. Codes without coordinates, including
/// rows that had a blank code, are dropped.
pub fn build_countries(
    vaccinations: VaccinationTable,
    coordinates: &HashMap<String, Coordinates>,
) -> Result<Vec<Country>> {
    let mut countries = Vec::with_capacity(vaccinations.len());
    let mut dropped = 0usize;

    for (code, name, series) in vaccinations.into_entries() {
        let Some(&coords) = coordinates.get(&code).filter(|_| !code.is_empty()) else {
            debug!(code = %code, "No coordinates for country, excluding");
            dropped += 1;
            continue;
        };
        countries.push(Country::new(name, code, coords, series)?);
    }

    info!(kept = countries.len(), dropped, "Countries built");
    Ok(countries)
}

/// Aggregates `countries` into continents following `membership`.
///
/// Member order follows `countries`. Continents with no resolved members
/// are left out; membership codes with no matching country are ignored.
pub fn build_continents(
    countries: &[Country],
    membership: &ContinentMembership,
) -> Result<Vec<Continent>> {
    let mut continents = Vec::with_capacity(membership.len());

    for (name, codes) in membership.iter() {
        let wanted: HashSet<&str> = codes.iter().map(String::as_str).collect();
        let members: Vec<usize> = countries
            .iter()
            .enumerate()
            .filter(|(_, c)| wanted.contains(c.code()))
            .map(|(idx, _)| idx)
            .collect();

        let unmatched = codes.len().saturating_sub(members.len());
        if unmatched > 0 {
            debug!(continent = name, unmatched, "Membership codes without a country");
        }
        if members.is_empty() {
            debug!(continent = name, "No resolved members, skipping continent");
            continue;
        }

        let coords = centroid(name).ok_or_else(|| {
            AtlasError::invalid_location(format!("no centroid for continent '{name}'"))
        })?;
        let series: Vec<_> = members.iter().map(|&idx| countries[idx].series()).collect();
        let aggregate = sum_forward_filled(&series);

        debug!(
            continent = name,
            members = members.len(),
            dates = aggregate.len(),
            "Continent aggregated"
        );
        continents.push(Continent::new(name, coords, aggregate, members)?);
    }

    info!(continents = continents.len(), "Continents built");
    Ok(continents)
}

/// Runs both construction steps and freezes the result.
pub fn build_atlas(
    vaccinations: VaccinationTable,
    coordinates: &HashMap<String, Coordinates>,
    membership: &ContinentMembership,
) -> Result<Atlas> {
    let countries = build_countries(vaccinations, coordinates)?;
    let continents = build_continents(&countries, membership)?;
    Ok(Atlas {
        countries,
        continents,
    })
}
