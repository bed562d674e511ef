//! Dataset loading: CSV file to an immutable, shared record set.

use crate::parser::{parse_row, RawRow, DATE_COLUMN};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tunechart_common::{FilterOptions, Record, Result, TunechartError};

/// Counters collected while parsing a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read from the CSV.
    pub rows: usize,
    /// Rows dropped because of an invalid date.
    pub dropped_rows: usize,
    /// Multi-valued fields that could not be decoded.
    pub malformed_fields: usize,
    /// Kept records whose stream count was missing or invalid.
    pub invalid_streams: usize,
    /// Rows holding bytes that were not valid UTF-8.
    pub invalid_utf8_rows: usize,
}

/// The full record set of one load, plus the selector options derived from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Record]>,
    options: FilterOptions,
    stats: LoadStats,
}

impl Dataset {
    /// Builds a dataset from already parsed records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let options = filter_options(&records);
        let invalid_streams = records.iter().filter(|r| r.streams.is_none()).count();
        Self {
            stats: LoadStats {
                rows: records.len(),
                invalid_streams,
                ..LoadStats::default()
            },
            records: records.into(),
            options,
        }
    }

    /// Parses CSV from any reader. The header row must contain a `date`
    /// column; every other column is optional.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if !headers.iter().any(|header| header == DATE_COLUMN) {
            return Err(TunechartError::dataset(format!(
                "dataset has no \"{DATE_COLUMN}\" column"
            )));
        }

        let mut stats = LoadStats::default();
        let mut records = Vec::new();
        for result in csv_reader.byte_records() {
            let fields = result?;
            stats.rows += 1;

            // Invalid UTF-8 is replaced rather than failing the load.
            if std::str::from_utf8(fields.as_slice()).is_err() {
                stats.invalid_utf8_rows += 1;
                debug!(
                    line = fields.position().map(csv::Position::line),
                    "Row is not valid UTF-8"
                );
            }

            // Short rows simply lack the trailing columns.
            let row: RawRow = headers
                .iter()
                .zip(fields.iter())
                .map(|(header, value)| {
                    (header.to_string(), String::from_utf8_lossy(value).into_owned())
                })
                .collect();

            let parsed = parse_row(&row);
            stats.malformed_fields += parsed.malformed_fields;
            match parsed.record {
                Some(record) => {
                    if record.streams.is_none() {
                        stats.invalid_streams += 1;
                    }
                    records.push(record);
                }
                None => stats.dropped_rows += 1,
            }
        }

        let options = filter_options(&records);
        Ok(Self {
            records: records.into(),
            options,
            stats,
        })
    }

    /// Parses CSV text.
    pub fn parse_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Reads and parses a CSV file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            TunechartError::dataset_with_source(
                format!("Failed to read dataset {}", path.display()),
                e,
            )
        })?;
        debug!(bytes = bytes.len(), "Read dataset file");

        let dataset = Self::from_reader(bytes.as_slice())?;
        info!(
            records = dataset.len(),
            rows = dataset.stats.rows,
            dropped = dataset.stats.dropped_rows,
            malformed_fields = dataset.stats.malformed_fields,
            invalid_streams = dataset.stats.invalid_streams,
            invalid_utf8_rows = dataset.stats.invalid_utf8_rows,
            years = dataset.options.years.len(),
            countries = dataset.options.countries.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// All records, in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Shared handle to the record set.
    pub fn shared_records(&self) -> Arc<[Record]> {
        Arc::clone(&self.records)
    }

    /// Selector options.
    pub const fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Load counters.
    pub const fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Distinct years (ascending) and countries (sorted) present in `records`.
/// Empty country names are not offered.
pub fn filter_options(records: &[Record]) -> FilterOptions {
    let years: BTreeSet<i32> = records.iter().map(Record::year).collect();
    let countries: BTreeSet<&str> = records
        .iter()
        .map(|record| record.country.as_str())
        .filter(|country| !country.is_empty())
        .collect();

    FilterOptions {
        years: years.into_iter().collect(),
        countries: countries.into_iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunechart_common::test_utils::{
        csv_fixtures::{write_temp_csv, SAMPLE_CSV},
        init_test_logging,
        record_fixtures::sample_records,
    };

    #[test]
    fn test_parse_sample_csv() {
        let dataset = Dataset::parse_str(SAMPLE_CSV).unwrap();

        assert_eq!(dataset.len(), 5);
        assert_eq!(
            dataset.stats(),
            LoadStats {
                rows: 6,
                dropped_rows: 1,
                malformed_fields: 1,
                invalid_streams: 1,
                invalid_utf8_rows: 0,
            }
        );

        let broken = &dataset.records()[3];
        assert_eq!(broken.track_name, "Broken Artists");
        assert!(broken.artists.is_empty());
        assert_eq!(broken.genres, vec!["rock"]);

        let together = &dataset.records()[2];
        assert_eq!(together.artists, vec!["A", "B"]);
    }

    #[test]
    fn test_filter_options_sorted_and_distinct() {
        let dataset = Dataset::parse_str(SAMPLE_CSV).unwrap();
        assert_eq!(dataset.options().years, vec![2022, 2023]);
        assert_eq!(
            dataset.options().countries,
            vec!["Brazil", "Germany", "United States"]
        );
        assert_eq!(dataset.options().year_choices()[0], "All");
    }

    #[test]
    fn test_missing_date_column_is_an_error() {
        let err = Dataset::parse_str("streams,country\n1,Chile\n").unwrap_err();
        assert!(matches!(err, TunechartError::Dataset { .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let dataset = Dataset::parse_str("date,streams,country_fullname\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.options(), &FilterOptions::default());
    }

    #[test]
    fn test_short_rows_yield_empty_fields() {
        let dataset = Dataset::parse_str("date,streams,country_fullname,artists\n2023-04-01,7\n").unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.streams, Some(7));
        assert_eq!(record.country, "");
        assert!(record.artists.is_empty());
        assert!(dataset.options().countries.is_empty());
    }

    #[test]
    fn test_invalid_utf8_row_is_decoded_lossily() {
        let bytes: &[u8] = b"date,streams,country_fullname\n\
2023-01-01,10,Chile\n\
2023-01-02,20,Ch\xFFle\n\
2023-01-03,30,Chile\n";
        let dataset = Dataset::from_reader(bytes).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.stats().invalid_utf8_rows, 1);
        assert_eq!(dataset.records()[1].country, "Ch\u{FFFD}le");
        assert_eq!(dataset.records()[1].streams, Some(20));
        assert_eq!(dataset.records()[2].streams, Some(30));
    }

    #[test]
    fn test_from_records() {
        let dataset = Dataset::from_records(sample_records());
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.stats().invalid_streams, 1);
        assert_eq!(dataset.options().years, vec![2022, 2023]);

        let shared = dataset.shared_records();
        assert_eq!(Arc::strong_count(&shared), 2);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        init_test_logging();
        let file = write_temp_csv(SAMPLE_CSV);
        let dataset = Dataset::load(file.path()).await.unwrap();
        assert_eq!(dataset.len(), 5);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_fatal() {
        let err = Dataset::load("/no/such/dataset.csv").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }
}
