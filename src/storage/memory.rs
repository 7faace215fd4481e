//! In-memory range table loaded from an IP2Location-style CSV export
//!
//! Column layout (extra trailing columns are ignored):
//!
//! | index | column         | field          |
//! |-------|----------------|----------------|
//! | 0     | `ip_from`      | `lower`        |
//! | 1     | `ip_to`        | `upper`        |
//! | 2     | `country_code` | `country_code` |
//! | 3     | `country_name` | `country`      |
//! | 4     | `region_name`  | `region`       |
//! | 5     | `city_name`    | `city`         |

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::LocationRange;
use crate::storage::{RangeStore, StoreError, StoreResult};

const MIN_FIELDS: usize = 6;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] csv::Error),
    #[error("dataset is empty")]
    Empty,
}

/// Sorted, immutable set of location ranges
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: Vec<LocationRange>,
    skipped_rows: usize,
}

impl RangeTable {
    /// Load a dataset from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            ranges = table.len(),
            skipped = table.skipped_rows,
            "loaded range table"
        );
        Ok(table)
    }

    /// Load a dataset from any CSV byte stream.
    ///
    /// The first record is a header and is skipped. Rows that are too short,
    /// have unparsable bounds or have `lower > upper` are dropped rather than
    /// failing the load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut ranges = Vec::new();
        let mut skipped_rows = 0;
        let mut saw_header = false;

        for result in csv_reader.records() {
            let record = result?;
            if !saw_header {
                saw_header = true;
                continue;
            }

            match parse_row(&record) {
                Some(range) => ranges.push(range),
                None => skipped_rows += 1,
            }
        }

        if !saw_header {
            return Err(LoadError::Empty);
        }

        if skipped_rows > 0 {
            warn!(skipped = skipped_rows, "skipped malformed dataset rows");
        }

        ranges.sort_by_key(|r| r.lower);

        Ok(Self {
            ranges,
            skipped_rows,
        })
    }

    /// Build a table directly from ranges, sorting them by lower bound.
    ///
    /// Ranges with `lower > upper` are dropped and counted as skipped, the
    /// same as inverted rows in a CSV source.
    pub fn from_ranges(mut ranges: Vec<LocationRange>) -> Self {
        let before = ranges.len();
        ranges.retain(|r| r.lower <= r.upper);
        let skipped_rows = before - ranges.len();
        if skipped_rows > 0 {
            warn!(skipped = skipped_rows, "dropped inverted ranges");
        }

        ranges.sort_by_key(|r| r.lower);
        Self {
            ranges,
            skipped_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[LocationRange] {
        &self.ranges
    }

    /// Number of data rows dropped during load
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Total number of addresses covered by all ranges
    pub fn covered_addresses(&self) -> u64 {
        self.ranges
            .iter()
            .map(|r| u64::from(r.upper - r.lower) + 1)
            .sum()
    }

    /// Binary search for the range containing `ordinal`.
    ///
    /// Searching on `upper` relies on the ranges being pairwise disjoint, as
    /// IP2Location exports are. Overlapping input is not detected; with it the
    /// search may miss a range that contains `ordinal`.
    pub fn find(&self, ordinal: u32) -> Option<&LocationRange> {
        // leftmost range whose upper bound reaches the ordinal
        let idx = self.ranges.partition_point(|r| r.upper < ordinal);
        self.ranges.get(idx).filter(|r| r.contains(ordinal))
    }
}

impl RangeStore for RangeTable {
    fn find_by_ordinal(&self, ordinal: u32) -> StoreResult<LocationRange> {
        self.find(ordinal).cloned().ok_or(StoreError::NotFound)
    }
}

fn parse_row(record: &StringRecord) -> Option<LocationRange> {
    if record.len() < MIN_FIELDS {
        return None;
    }

    let lower = record.get(0)?.parse::<u32>().ok()?;
    let upper = record.get(1)?.parse::<u32>().ok()?;
    if lower > upper {
        return None;
    }

    Some(LocationRange {
        lower,
        upper,
        country_code: record.get(2)?.to_string(),
        country: record.get(3)?.to_string(),
        region: record.get(4)?.to_string(),
        city: record.get(5)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = r#""ip_from","ip_to","country_code","country_name","region_name","city_name","latitude","longitude","zip_code","time_zone""#;

    const SAMPLE_ROWS: &str = r#""16777216","16777471","US","United States","California","Los Angeles","34.05223","-118.24368","90001","-07:00"
"16777472","16778239","CN","China","Fujian","Fuzhou","26.06139","119.30611","-","08:00"
"16778240","16779263","AU","Australia","Queensland","Brisbane","-27.46794","153.02809","4000","10:00"
"134744072","134744072","US","United States","California","Mountain View","37.405992","-122.078515","94035","-07:00""#;

    fn table_from(data: &str) -> Result<RangeTable, LoadError> {
        RangeTable::from_reader(data.as_bytes())
    }

    fn sample_table() -> RangeTable {
        table_from(&format!("{}\n{}", HEADER, SAMPLE_ROWS)).unwrap()
    }

    fn city_of(table: &RangeTable, ordinal: u32) -> Option<String> {
        table
            .find_by_ordinal(ordinal)
            .ok()
            .map(|range| range.city)
    }

    #[test]
    fn test_load_valid_rows() {
        let table = sample_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.skipped_rows(), 0);

        let first = &table.ranges()[0];
        assert_eq!(first.country_code, "US");
        assert_eq!(first.country, "United States");
        assert_eq!(first.region, "California");
        assert_eq!(first.city, "Los Angeles");
    }

    #[test]
    fn test_empty_source_is_an_error() {
        assert!(matches!(table_from(""), Err(LoadError::Empty)));
        assert!(matches!(table_from("\n\n"), Err(LoadError::Empty)));
    }

    #[test]
    fn test_header_only_yields_empty_table() {
        let table = table_from(HEADER).unwrap();
        assert!(table.is_empty());
        assert!(matches!(table.find_by_ordinal(0), Err(StoreError::NotFound)));
        assert!(matches!(
            table.find_by_ordinal(u32::MAX),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let data = format!(
            "{}\n{}\n{}\n{}",
            HEADER,
            r#""16777216","16777471","US","United States","California","Los Angeles","34.05223","-118.24368","90001","-07:00""#,
            r#""invalid","16778239","CN","China","Fujian","Fuzhou","26.06139","119.30611","-","08:00""#,
            r#""16778240","16779263","AU","Australia","Queensland","Brisbane","-27.46794","153.02809","4000","10:00""#,
        );

        let table = table_from(&data).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_rows(), 1);
    }

    #[test]
    fn test_short_and_inverted_rows_are_skipped() {
        let data = format!(
            "{}\n{}\n{}\n{}\n{}",
            HEADER,
            r#""1","2","US""#,
            r#""5000000000","5000000001","US","United States","-","-""#,
            r#""300","200","US","United States","-","-""#,
            r#""10","20","US","United States","-","-""#,
        );

        let table = table_from(&data).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped_rows(), 3);
        assert_eq!(table.ranges()[0].lower, 10);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let data = format!(
            "{}\n{}\n{}\n{}",
            HEADER,
            r#""300","399","C","Cc","-","Third""#,
            r#""100","199","A","Aa","-","First""#,
            r#""200","299","B","Bb","-","Second""#,
        );

        let table = table_from(&data).unwrap();
        let lowers: Vec<u32> = table.ranges().iter().map(|r| r.lower).collect();
        assert_eq!(lowers, vec![100, 200, 300]);
        assert_eq!(city_of(&table, 250).as_deref(), Some("Second"));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let mut data = HEADER.as_bytes().to_vec();
        data.extend_from_slice(b"\n\"1\",\"2\",\"US\",\"\xff\xfe\",\"-\",\"-\"\n");

        let result = RangeTable::from_reader(data.as_slice());
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_find_by_ordinal() {
        let table = sample_table();

        let cases: &[(u32, Option<&str>)] = &[
            (16_777_216, Some("Los Angeles")),
            (16_777_471, Some("Los Angeles")),
            (16_777_350, Some("Los Angeles")),
            (16_777_500, Some("Fuzhou")),
            (16_778_500, Some("Brisbane")),
            (134_744_072, Some("Mountain View")),
            (16_779_300, None),
            (1_000, None),
            (0, None),
            (999_999_999, None),
            (u32::MAX, None),
        ];

        for (ordinal, expected) in cases {
            assert_eq!(
                city_of(&table, *ordinal).as_deref(),
                *expected,
                "ordinal {}",
                ordinal
            );
        }
    }

    #[test]
    fn test_gap_before_range_is_rejected() {
        // 134744071 sits just below the singleton range; the search lands on
        // that range because its upper bound is >= the ordinal.
        let table = sample_table();
        assert!(matches!(
            table.find_by_ordinal(134_744_071),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_covered_addresses() {
        let table = sample_table();
        assert_eq!(table.covered_addresses(), 256 + 768 + 1024 + 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "{}", SAMPLE_ROWS).unwrap();

        let table = RangeTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RangeTable::load("/nonexistent/ranges.csv");
        assert!(matches!(result, Err(LoadError::Open { .. })));
    }

    fn range(lower: u32, upper: u32) -> LocationRange {
        LocationRange {
            lower,
            upper,
            country: String::new(),
            country_code: String::new(),
            region: String::new(),
            city: String::new(),
        }
    }

    #[test]
    fn test_from_ranges_sorts() {
        let table = RangeTable::from_ranges(vec![range(50, 60), range(10, 20)]);
        assert_eq!(table.ranges()[0].lower, 10);
        assert!(table.find(15).is_some());
        assert!(table.find(30).is_none());
        assert!(table.find(60).is_some());
    }

    #[test]
    fn test_from_ranges_drops_inverted_ranges() {
        let table = RangeTable::from_ranges(vec![range(10, 5)]);
        assert!(table.is_empty());
        assert_eq!(table.skipped_rows(), 1);
        assert_eq!(table.covered_addresses(), 0);

        let table = RangeTable::from_ranges(vec![range(10, 5), range(20, 29), range(0, 0)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_rows(), 1);
        assert_eq!(table.covered_addresses(), 11);
        assert!(table.find(7).is_none());
    }
}
