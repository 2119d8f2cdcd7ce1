//! Records handed to presentation layers.
//!
//! Supports building the flat record list, JSON rendering, and a log summary.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::hierarchy::Atlas;
use crate::location::{Coordinates, Location};
use crate::series::TimeSeries;

/// One country or continent as seen by a map or chart renderer.
#[derive(Debug, Clone, Serialize)]
pub struct LocationRecord<'a> {
    pub name: &'a str,
    pub identifier: Option<&'a str>,
    pub coordinates: Coordinates,
    pub series: &'a TimeSeries,
    pub latest_total: u64,
    /// Member country codes; empty for countries.
    pub members: Vec<&'a str>,
}

/// Country records followed by continent records.
pub fn records<'a>(atlas: &'a Atlas) -> Result<Vec<LocationRecord<'a>>> {
    atlas
        .locations()
        .map(|location| -> Result<LocationRecord<'a>> {
            let members = match location {
                Location::Country(_) => Vec::new(),
                Location::Continent(continent) => {
                    atlas.members(continent).map(|c| c.code()).collect()
                }
            };
            Ok(LocationRecord {
                name: location.name(),
                identifier: location.identifier(),
                coordinates: location.coordinates(),
                series: location.series(),
                latest_total: atlas.latest_total(location)?,
                members,
            })
        })
        .collect()
}

/// Renders every record as pretty-printed JSON.
pub fn to_json(atlas: &Atlas) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&records(atlas)?)?)
}

/// Logs one line per continent with its latest total and date span.
pub fn log_summary(atlas: &Atlas) -> Result<()> {
    for continent in atlas.continents() {
        let total = atlas.latest_total(Location::Continent(continent))?;
        let series = continent.series();
        info!(
            continent = continent.name(),
            members = continent.member_indices().len(),
            latest_total = total,
            first_date = ?series.first_date(),
            last_date = ?series.latest().map(|p| p.date),
            "Continent summary"
        );
    }
    debug!(countries = atlas.countries().len(), "Summary logged");
    Ok(())
}
