//! Country → continent hierarchy.
//!
//! [`builder`] turns the parsed sources into an [`Atlas`]: countries that
//! resolve both a series and a coordinate, and continents whose series is
//! the forward-filled sum of their members. [`centroids`] holds the fixed
//! display coordinate for each continent.

pub mod builder;
pub mod centroids;

use crate::location::{Continent, Country, Location};

/// Immutable snapshot produced by one ingestion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atlas {
    pub(crate) countries: Vec<Country>,
    pub(crate) continents: Vec<Continent>,
}

impl Atlas {
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn continents(&self) -> &[Continent] {
        &self.continents
    }

    pub fn country_by_code(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code() == code)
    }

    pub fn continent_by_name(&self, name: &str) -> Option<&Continent> {
        self.continents.iter().find(|c| c.name() == name)
    }

    /// Member countries of `continent`, in country order. Indices that do
    /// not resolve in this atlas are skipped.
    pub fn members<'a>(&'a self, continent: &'a Continent) -> impl Iterator<Item = &'a Country> {
        continent
            .member_indices()
            .iter()
            .filter_map(|&idx| self.countries.get(idx))
    }

    /// Countries first, then continents.
    pub fn locations(&self) -> impl Iterator<Item = Location<'_>> {
        self.countries
            .iter()
            .map(Location::Country)
            .chain(self.continents.iter().map(Location::Continent))
    }
}
