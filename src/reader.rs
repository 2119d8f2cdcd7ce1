//! CSV readers for the three tabular sources.
//!
//! Each reader accepts any [`Read`] so it can be fed from memory in tests,
//! with a `*_file` wrapper that opens a path. Every source has a header row
//! which is skipped.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AtlasError, Result};
use crate::location::Coordinates;
use crate::series::TimeSeries;

const VAX_NAME_COL: usize = 0;
const VAX_CODE_COL: usize = 1;
const VAX_DATE_COL: usize = 2;
const VAX_COUNT_COL: usize = 3;

const COORD_CODE_COL: usize = 2;
const COORD_LAT_COL: usize = 4;
const COORD_LON_COL: usize = 5;

const MEMBERSHIP_CONTINENT_COL: usize = 0;
const MEMBERSHIP_CODE_COL: usize = 4;

/// Per-country series and display names parsed from the vaccination source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccinationTable {
    order: Vec<String>,
    series: HashMap<String, TimeSeries>,
    names: HashMap<String, String>,
}

impl VaccinationTable {
    /// Codes in order of first appearance.
    pub fn codes(&self) -> &[String] {
        &self.order
    }

    pub fn series(&self, code: &str) -> Option<&TimeSeries> {
        self.series.get(code)
    }

    /// Display name for `code`; the last row seen wins.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the table, yielding `(code, name, series)` in first-appearance order.
    pub fn into_entries(mut self) -> impl Iterator<Item = (String, String, TimeSeries)> {
        let order = std::mem::take(&mut self.order);
        order.into_iter().filter_map(move |code| {
            let series = self.series.remove(&code)?;
            let name = self.names.remove(&code).unwrap_or_default();
            Some((code, name, series))
        })
    }
}

/// Continent name to member codes, both in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContinentMembership {
    continents: Vec<(String, Vec<String>)>,
}

impl ContinentMembership {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.continents
            .iter()
            .map(|(name, codes)| (name.as_str(), codes.as_slice()))
    }

    pub fn members(&self, continent: &str) -> Option<&[String]> {
        self.continents
            .iter()
            .find(|(name, _)| name == continent)
            .map(|(_, codes)| codes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.continents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| AtlasError::SourceUnavailable {
        source_name: path.display().to_string(),
        source,
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'r>(record: &'r StringRecord, idx: usize, source_name: &str) -> Result<&'r str> {
    record.get(idx).ok_or_else(|| {
        AtlasError::malformed(source_name, line_of(record), format!("missing column {idx}"))
    })
}

/// Trims whitespace and one pair of surrounding double quotes. Needed for
/// rows like `"Afghanistan", "AF", "AFG"` where the space before the quote
/// keeps the csv parser from treating the field as quoted.
fn clean(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn parse_date(raw: &str, record: &StringRecord, source_name: &str) -> Result<NaiveDate> {
    let head = raw.get(..10).ok_or_else(|| {
        AtlasError::malformed(source_name, line_of(record), format!("bad date '{raw}'"))
    })?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|e| {
        AtlasError::malformed(source_name, line_of(record), format!("bad date '{raw}': {e}"))
    })
}

/// Parses a cumulative count. Plain integers are read exactly; values with a
/// fraction or exponent are truncated toward zero.
fn parse_count(raw: &str, record: &StringRecord, source_name: &str) -> Result<u64> {
    let bad = |reason: &str| {
        AtlasError::malformed(source_name, line_of(record), format!("{reason} '{raw}'"))
    };
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<u64>().map_err(|_| bad("count out of range"));
    }
    let value: f64 = raw.parse().map_err(|_| bad("bad count"))?;
    if !value.is_finite() || value < 0.0 || value >= u64::MAX as f64 {
        return Err(bad("count out of range"));
    }
    Ok(value.trunc() as u64)
}

fn parse_degrees(raw: &str, record: &StringRecord, source_name: &str) -> Result<f64> {
    let value = clean(raw);
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AtlasError::malformed(source_name, line_of(record), format!("bad coordinate '{value}'"))
        })
}

/// Reads the vaccination source.
///
/// Empty count fields are filled with the code's last known count (0 before
/// any value has been seen), assuming each code's rows arrive in date order.
pub fn read_vaccinations<R: Read>(reader: R, source_name: &str) -> Result<VaccinationTable> {
    let mut rdr = csv_reader(reader);
    let mut table = VaccinationTable::default();
    let mut last_known: HashMap<String, u64> = HashMap::new();
    let mut rows = 0usize;

    for result in rdr.records() {
        let record = result.map_err(|e| AtlasError::from_csv(source_name, e))?;
        let name = field(&record, VAX_NAME_COL, source_name)?;
        let code = field(&record, VAX_CODE_COL, source_name)?;
        let date = parse_date(field(&record, VAX_DATE_COL, source_name)?, &record, source_name)?;
        let raw_count = field(&record, VAX_COUNT_COL, source_name)?.trim();

        let count = if raw_count.is_empty() {
            last_known.get(code).copied().unwrap_or(0)
        } else {
            let parsed = parse_count(raw_count, &record, source_name)?;
            last_known.insert(code.to_string(), parsed);
            parsed
        };

        if !table.series.contains_key(code) {
            table.order.push(code.to_string());
        }
        table
            .series
            .entry(code.to_string())
            .or_default()
            .insert(date, count);
        table.names.insert(code.to_string(), name.to_string());
        rows += 1;
    }

    info!(source = source_name, rows, countries = table.len(), "Vaccination source read");
    Ok(table)
}

/// Reads the coordinate source into code → (latitude, longitude).
pub fn read_coordinates<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<HashMap<String, Coordinates>> {
    let mut rdr = csv_reader(reader);
    let mut coordinates = HashMap::new();

    for result in rdr.records() {
        let record = result.map_err(|e| AtlasError::from_csv(source_name, e))?;
        let code = clean(field(&record, COORD_CODE_COL, source_name)?);
        let latitude = parse_degrees(field(&record, COORD_LAT_COL, source_name)?, &record, source_name)?;
        let longitude = parse_degrees(field(&record, COORD_LON_COL, source_name)?, &record, source_name)?;
        coordinates.insert(code.to_string(), Coordinates::new(latitude, longitude));
    }

    info!(source = source_name, entries = coordinates.len(), "Coordinate source read");
    Ok(coordinates)
}

/// Reads the continent membership source. Repeated codes within a
/// continent are kept once.
pub fn read_membership<R: Read>(reader: R, source_name: &str) -> Result<ContinentMembership> {
    let mut rdr = csv_reader(reader);
    let mut membership = ContinentMembership::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<(usize, String)> = HashSet::new();

    for result in rdr.records() {
        let record = result.map_err(|e| AtlasError::from_csv(source_name, e))?;
        let continent = field(&record, MEMBERSHIP_CONTINENT_COL, source_name)?;
        let code = field(&record, MEMBERSHIP_CODE_COL, source_name)?;

        let slot = *index.entry(continent.to_string()).or_insert_with(|| {
            membership.continents.push((continent.to_string(), Vec::new()));
            membership.continents.len() - 1
        });

        if seen.insert((slot, code.to_string())) {
            membership.continents[slot].1.push(code.to_string());
        } else {
            debug!(continent, code, "Duplicate membership row ignored");
        }
    }

    info!(source = source_name, continents = membership.len(), "Membership source read");
    Ok(membership)
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_vaccinations_file(path: &Path) -> Result<VaccinationTable> {
    read_vaccinations(open_source(path)?, &path.display().to_string())
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_coordinates_file(path: &Path) -> Result<HashMap<String, Coordinates>> {
    read_coordinates(open_source(path)?, &path.display().to_string())
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_membership_file(path: &Path) -> Result<ContinentMembership> {
    read_membership(open_source(path)?, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, d).unwrap()
    }

    const HEADER: &str = "country,iso_code,date,total_vaccinations\n";

    fn vax(rows: &str) -> Result<VaccinationTable> {
        read_vaccinations(format!("{HEADER}{rows}").as_bytes(), "vaccinations")
    }

    #[test]
    fn test_empty_count_carries_last_known_value() {
        let table = vax("Albania,ALB,2021-01-10,0\n\
                         Albania,ALB,2021-01-12,128\n\
                         Albania,ALB,2021-01-13,\n\
                         Albania,ALB,2021-01-14,188\n")
        .unwrap();
        let series = table.series("ALB").unwrap();
        assert_eq!(series.get(day(1, 12)), Some(128));
        assert_eq!(series.get(day(1, 13)), Some(128));
        assert_eq!(series.get(day(1, 14)), Some(188));
    }

    #[test]
    fn test_first_row_empty_count_is_zero() {
        let table = vax("Andorra,AND,2021-01-25,\nAndorra,AND,2021-01-26,576\n").unwrap();
        let series = table.series("AND").unwrap();
        assert_eq!(series.get(day(1, 25)), Some(0));
        assert_eq!(series.get(day(1, 26)), Some(576));
    }

    #[test]
    fn test_carry_forward_is_per_code() {
        let table = vax("Albania,ALB,2021-01-12,128\n\
                         Algeria,DZA,2021-01-29,0\n\
                         Algeria,DZA,2021-01-30,30\n\
                         Andorra,AND,2021-01-25,\n")
        .unwrap();
        assert_eq!(table.series("AND").unwrap().get(day(1, 25)), Some(0));
        assert_eq!(table.codes(), ["ALB", "DZA", "AND"]);
    }

    #[test]
    fn test_fractional_count_is_truncated() {
        let table = vax("Afghanistan,AFG,2021-03-05,8200.9\n").unwrap();
        assert_eq!(table.series("AFG").unwrap().get(day(3, 5)), Some(8200));
    }

    #[test]
    fn test_date_uses_first_ten_characters() {
        let table = vax("Afghanistan,AFG,2021-03-05T00:00:00,1\n").unwrap();
        assert_eq!(table.series("AFG").unwrap().get(day(3, 5)), Some(1));
    }

    #[test]
    fn test_blank_code_row_is_kept() {
        let table = vax("Albania,ALB,2021-01-10,5\nEngland,,2021-01-10,100\n").unwrap();
        assert_eq!(table.codes(), ["ALB", ""]);
        assert_eq!(table.series("").unwrap().get(day(1, 10)), Some(100));
    }

    #[test]
    fn test_large_integer_count_is_exact() {
        let table = vax("Albania,ALB,2021-01-10,12345678901234567\n").unwrap();
        assert_eq!(
            table.series("ALB").unwrap().get(day(1, 10)),
            Some(12_345_678_901_234_567)
        );
    }

    #[test]
    fn test_count_beyond_u64_is_malformed() {
        let err = vax("Albania,ALB,2021-01-10,1e25\n").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedRecord { .. }));

        let err = vax("Albania,ALB,2021-01-10,99999999999999999999\n").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedRecord { .. }));
    }

    #[test]
    fn test_last_name_wins() {
        let table = vax("Old Name,XKX,2021-01-01,1\nKosovo,XKX,2021-01-02,2\n").unwrap();
        assert_eq!(table.name("XKX"), Some("Kosovo"));
    }

    #[test]
    fn test_bad_date_reports_line() {
        let err = vax("Albania,ALB,2021-01-10,1\nAlbania,ALB,2021/01/11,2\n").unwrap_err();
        match err {
            AtlasError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_count_is_malformed() {
        let err = vax("Albania,ALB,2021-01-10,lots\n").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedRecord { .. }));
    }

    #[test]
    fn test_negative_count_is_malformed() {
        let err = vax("Albania,ALB,2021-01-10,-4\n").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedRecord { .. }));
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let err = vax("Albania,ALB\n").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedRecord { .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let table = vax("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_coordinates_with_spaced_quotes() {
        let src = "\"Country\", \"Alpha-2 code\", \"Alpha-3 code\", \"Numeric code\", \"Latitude (average)\", \"Longitude (average)\"\n\
                   \"Afghanistan\", \"AF\", \"AFG\", \"4\", \"33\", \"65\"\n";
        let coords = read_coordinates(src.as_bytes(), "coordinates").unwrap();
        assert_eq!(coords["AFG"], Coordinates::new(33.0, 65.0));
    }

    #[test]
    fn test_coordinates_bad_latitude() {
        let src = "a,b,c,d,e,f\nX,XX,XXX,1,north,65\n";
        let err = read_coordinates(src.as_bytes(), "coordinates").unwrap_err();
        assert!(matches!(err, AtlasError::MalformedRecord { .. }));
    }

    #[test]
    fn test_membership_keeps_first_appearance_and_dedups() {
        let src = "Continent_Name,Continent_Code,Country_Name,Two_Letter,Three_Letter\n\
                   Asia,AS,Afghanistan,AF,AFG\n\
                   Europe,EU,Albania,AL,ALB\n\
                   Asia,AS,Armenia,AM,ARM\n\
                   Europe,EU,Albania,AL,ALB\n";
        let membership = read_membership(src.as_bytes(), "continents").unwrap();
        let names: Vec<_> = membership.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Asia", "Europe"]);
        assert_eq!(membership.members("Asia").unwrap(), ["AFG", "ARM"]);
        assert_eq!(membership.members("Europe").unwrap(), ["ALB"]);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = read_vaccinations_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, AtlasError::SourceUnavailable { .. }));
    }
}
