//! Countries, continents, and the tagged view over both.

use serde::Serialize;

use crate::error::{AtlasError, Result};
use crate::series::TimeSeries;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A leaf location with a directly observed series.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    name: String,
    code: String,
    coordinates: Coordinates,
    series: TimeSeries,
}

impl Country {
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidLocation`] if `name` or `code` is empty or
    /// `series` has no entries.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        coordinates: Coordinates,
        series: TimeSeries,
    ) -> Result<Self> {
        let name = name.into();
        let code = code.into();
        if name.is_empty() {
            return Err(AtlasError::invalid_location(format!(
                "country '{code}' has an empty name"
            )));
        }
        if code.is_empty() {
            return Err(AtlasError::invalid_location(format!(
                "country '{name}' has an empty code"
            )));
        }
        if series.is_empty() {
            return Err(AtlasError::invalid_location(format!(
                "country '{code}' has an empty series"
            )));
        }
        Ok(Self {
            name,
            code,
            coordinates,
            series,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }
}

/// An aggregate location. Members are indices into the owning
/// [`Atlas`](crate::hierarchy::Atlas)'s country list.
#[derive(Debug, Clone, PartialEq)]
pub struct Continent {
    name: String,
    coordinates: Coordinates,
    series: TimeSeries,
    members: Vec<usize>,
}

impl Continent {
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidLocation`] if `name` is empty, `series` is
    /// empty, or there are no members.
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        series: TimeSeries,
        members: Vec<usize>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(AtlasError::invalid_location("continent has an empty name"));
        }
        if series.is_empty() {
            return Err(AtlasError::invalid_location(format!(
                "continent '{name}' has an empty series"
            )));
        }
        if members.is_empty() {
            return Err(AtlasError::invalid_location(format!(
                "continent '{name}' has no members"
            )));
        }
        Ok(Self {
            name,
            coordinates,
            series,
            members,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// The derived, summed series over the union of member dates.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn member_indices(&self) -> &[usize] {
        &self.members
    }
}

/// Borrowed view over either kind of location.
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    Country(&'a Country),
    Continent(&'a Continent),
}

impl<'a> Location<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Location::Country(c) => c.name(),
            Location::Continent(c) => c.name(),
        }
    }

    /// The country code; continents have none.
    pub fn identifier(&self) -> Option<&'a str> {
        match self {
            Location::Country(c) => Some(c.code()),
            Location::Continent(_) => None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        match self {
            Location::Country(c) => c.coordinates(),
            Location::Continent(c) => c.coordinates(),
        }
    }

    pub fn series(&self) -> &'a TimeSeries {
        match self {
            Location::Country(c) => c.series(),
            Location::Continent(c) => c.series(),
        }
    }

    pub fn is_country(&self) -> bool {
        matches!(self, Location::Country(_))
    }
}
