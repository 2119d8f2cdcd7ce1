//! Display coordinates for each continent.
//!
//! These are hand-picked marker positions, not geometric centroids of the
//! member countries.

use crate::location::Coordinates;

static CONTINENT_CENTROIDS: &[(&str, Coordinates)] = &[
    ("North America", Coordinates::new(54.5260, -105.2551)),
    ("South America", Coordinates::new(-8.7832, -55.4915)),
    ("Africa", Coordinates::new(-8.7832, 34.5085)),
    ("Oceania", Coordinates::new(-22.7359, 140.0188)),
    ("Antarctica", Coordinates::new(-82.8628, 135.0)),
    ("Asia", Coordinates::new(34.0479, 100.6197)),
    ("Europe", Coordinates::new(54.5260, 15.2551)),
];

/// Looks up the marker position for a continent by exact name.
pub fn centroid(continent: &str) -> Option<Coordinates> {
    CONTINENT_CENTROIDS
        .iter()
        .find(|(name, _)| *name == continent)
        .map(|&(_, coords)| coords)
}
