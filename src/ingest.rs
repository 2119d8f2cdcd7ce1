//! End-to-end ingestion: read the three sources, then build the hierarchy.

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::SourcePaths;
use crate::error::Result;
use crate::hierarchy::Atlas;
use crate::hierarchy::builder::build_atlas;
use crate::reader::{read_coordinates_file, read_membership_file, read_vaccinations_file};

/// Reads each source in turn and builds the [`Atlas`].
#[tracing::instrument(skip_all)]
pub fn load_atlas(paths: &SourcePaths) -> Result<Atlas> {
    let vaccinations = read_vaccinations_file(&paths.vaccinations)?;
    let coordinates = read_coordinates_file(&paths.coordinates)?;
    let membership = read_membership_file(&paths.continents)?;

    let atlas = build_atlas(vaccinations, &coordinates, &membership)?;
    info!(
        countries = atlas.countries().len(),
        continents = atlas.continents().len(),
        "Atlas loaded"
    );
    Ok(atlas)
}

/// Same result as [`load_atlas`], with the three reads running on blocking
/// tasks and joined before the hierarchy is built.
#[tracing::instrument(skip_all)]
pub async fn load_atlas_concurrent(paths: &SourcePaths) -> Result<Atlas> {
    let vax_path = paths.vaccinations.clone();
    let coord_path = paths.coordinates.clone();
    let member_path = paths.continents.clone();

    let vaccinations = tokio::task::spawn_blocking(move || read_vaccinations_file(&vax_path));
    let coordinates = tokio::task::spawn_blocking(move || read_coordinates_file(&coord_path));
    let membership = tokio::task::spawn_blocking(move || read_membership_file(&member_path));

    let (vaccinations, coordinates, membership) =
        tokio::try_join!(joined(vaccinations), joined(coordinates), joined(membership))?;

    let atlas = build_atlas(vaccinations, &coordinates, &membership)?;
    info!(
        countries = atlas.countries().len(),
        continents = atlas.continents().len(),
        "Atlas loaded"
    );
    Ok(atlas)
}

/// Awaits a reader task. The tasks are never aborted, so a join failure can
/// only be a panic, which is propagated.
async fn joined<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    match handle.await {
        Ok(result) => result,
        Err(err) => std::panic::resume_unwind(err.into_panic()),
    }
}
