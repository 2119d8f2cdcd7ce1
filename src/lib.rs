pub mod config;
pub mod error;
pub mod hierarchy;
pub mod imputer;
pub mod ingest;
pub mod location;
pub mod output;
pub mod query;
pub mod reader;
pub mod series;

pub use error::{AtlasError, Result};
pub use hierarchy::Atlas;
pub use location::{Continent, Coordinates, Country, Location};
pub use series::{DatePoint, TimeSeries};
