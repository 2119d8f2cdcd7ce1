use chrono::NaiveDate;
use std::path::PathBuf;
use vax_atlas::config::SourcePaths;
use vax_atlas::ingest::{load_atlas, load_atlas_concurrent};
use vax_atlas::output::records;
use vax_atlas::{AtlasError, Country, Location};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_paths() -> SourcePaths {
    SourcePaths {
        vaccinations: fixture("country_vaccinations.csv"),
        coordinates: fixture("countries_codes_and_coordinates.csv"),
        continents: fixture("continent_codes.csv"),
    }
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, m, d).unwrap()
}

#[test]
fn test_full_pipeline() {
    let atlas = load_atlas(&fixture_paths()).expect("Failed to load atlas");

    let codes: Vec<_> = atlas.countries().iter().map(Country::code).collect();
    assert_eq!(codes, ["AFG", "ALB", "DEU", "JPN"]);

    let names: Vec<_> = atlas.continents().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["Asia", "Europe"]);
}

#[test]
fn test_country_without_coordinates_is_excluded() {
    let atlas = load_atlas(&fixture_paths()).unwrap();
    assert!(atlas.country_by_code("OWID_WLS").is_none());
}

#[test]
fn test_blank_code_row_does_not_abort_the_run() {
    let atlas = load_atlas(&fixture_paths()).unwrap();
    assert!(atlas.country_by_code("").is_none());
    assert!(atlas.countries().iter().all(|c| c.name() != "England"));
}

#[test]
fn test_reader_fills_blank_counts() {
    let atlas = load_atlas(&fixture_paths()).unwrap();
    let albania = atlas.country_by_code("ALB").unwrap();
    assert_eq!(albania.series().get(date(1, 11)), Some(0));
    assert_eq!(albania.series().get(date(1, 14)), Some(188));

    let germany = atlas.country_by_code("DEU").unwrap();
    assert_eq!(germany.series().get(date(1, 12)), Some(100));
}

#[test]
fn test_continent_series_over_union_of_dates() {
    let atlas = load_atlas(&fixture_paths()).unwrap();
    let europe = atlas.continent_by_name("Europe").unwrap();

    let counts: Vec<u64> = europe.series().iter().map(|p| p.count).collect();
    assert_eq!(counts, vec![0, 100, 228, 528, 588]);
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_latest_totals() {
    let atlas = load_atlas(&fixture_paths()).unwrap();
    let asia = atlas.continent_by_name("Asia").unwrap();
    let japan = atlas.country_by_code("JPN").unwrap();

    assert_eq!(atlas.latest_total(Location::Country(japan)).unwrap(), 21709);
    assert_eq!(atlas.latest_total(Location::Continent(asia)).unwrap(), 8200 + 21709);
}

#[test]
fn test_reingestion_is_identical() {
    let first = load_atlas(&fixture_paths()).unwrap();
    let second = load_atlas(&fixture_paths()).unwrap();
    assert_eq!(first, second);

    let totals = |atlas: &vax_atlas::Atlas| -> Vec<u64> {
        records(atlas)
            .unwrap()
            .iter()
            .map(|r| r.latest_total)
            .collect()
    };
    assert_eq!(totals(&first), totals(&second));
}

#[tokio::test]
async fn test_concurrent_load_matches_sequential() {
    let sequential = load_atlas(&fixture_paths()).unwrap();
    let concurrent = load_atlas_concurrent(&fixture_paths()).await.unwrap();
    assert_eq!(sequential, concurrent);
}

#[test]
fn test_header_only_source_gives_empty_atlas() {
    let paths = SourcePaths {
        vaccinations: fixture("header_only_vaccinations.csv"),
        ..fixture_paths()
    };
    let atlas = load_atlas(&paths).unwrap();
    assert!(atlas.countries().is_empty());
    assert!(atlas.continents().is_empty());
}

#[test]
fn test_missing_source_is_unavailable() {
    let paths = SourcePaths {
        coordinates: fixture("no_such_file.csv"),
        ..fixture_paths()
    };
    let err = load_atlas(&paths).unwrap_err();
    assert!(matches!(err, AtlasError::SourceUnavailable { .. }));
}

#[cfg(unix)]
#[test]
fn test_unreadable_source_is_unavailable() {
    // A directory opens fine on unix but fails on the first read.
    let paths = SourcePaths {
        vaccinations: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
        ..fixture_paths()
    };
    let err = load_atlas(&paths).unwrap_err();
    assert!(matches!(err, AtlasError::SourceUnavailable { .. }));
}
