//! Test utilities and shared test helpers for Tunechart.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use crate::types::Record;
use chrono::NaiveDate;
use std::io::Write;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Builds a calendar date from its parts.
pub fn mock_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Record fixtures.
pub mod record_fixtures {
    use super::*;

    /// Builds a record with a single genre-less track.
    pub fn record(date: NaiveDate, streams: u64, country: &str, artists: &[&str]) -> Record {
        Record {
            date,
            streams: Some(streams),
            country: country.to_string(),
            artists: artists.iter().map(ToString::to_string).collect(),
            genres: Vec::new(),
            track_name: format!("{} track", artists.first().copied().unwrap_or("Unknown")),
        }
    }

    /// A small, varied dataset spanning two years and three countries.
    pub fn sample_records() -> Vec<Record> {
        vec![
            Record {
                date: mock_date(2022, 12, 31),
                streams: Some(300),
                country: "Germany".to_string(),
                artists: vec!["Rammstein".to_string()],
                genres: vec!["metal".to_string(), "industrial".to_string()],
                track_name: "Sonne".to_string(),
            },
            Record {
                date: mock_date(2023, 1, 1),
                streams: Some(100),
                country: "United States".to_string(),
                artists: vec!["Taylor Swift".to_string()],
                genres: vec!["pop".to_string()],
                track_name: "Anti-Hero".to_string(),
            },
            Record {
                date: mock_date(2023, 1, 1),
                streams: Some(50),
                country: "United States".to_string(),
                artists: vec!["Bad Bunny".to_string(), "Taylor Swift".to_string()],
                genres: vec!["reggaeton".to_string(), "pop".to_string()],
                track_name: "Duet".to_string(),
            },
            Record {
                date: mock_date(2023, 1, 2),
                streams: None,
                country: "Brazil".to_string(),
                artists: vec!["Anitta".to_string()],
                genres: vec!["funk carioca".to_string()],
                track_name: "Envolver".to_string(),
            },
            Record {
                date: mock_date(2023, 1, 2),
                streams: Some(75),
                country: "Germany".to_string(),
                artists: vec!["Bad Bunny".to_string()],
                genres: vec!["reggaeton".to_string()],
                track_name: "Tití Me Preguntó".to_string(),
            },
        ]
    }
}

/// CSV fixtures in the dataset's column layout.
pub mod csv_fixtures {
    use super::*;

    /// A well-formed dataset with one malformed artists field and one bad date.
    pub const SAMPLE_CSV: &str = "\
date,streams,country_fullname,artists,artist_genres,track_name
2023-01-01,100,United States,['A'],['pop'],Song A
2023-01-01,50,United States,['B'],['pop'],Song B
2023-01-02,70,Germany,\"['A','B']\",\"['pop','rock']\",Together
2022-06-15,20,Germany,\"[A, B]\",['rock'],Broken Artists
not-a-date,999,Germany,['C'],['jazz'],Lost
2022-06-16,abc,Brazil,['C'],['jazz'],No Streams
";

    /// Writes CSV text to a temporary file that is removed on drop.
    pub fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("Failed to create temporary file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temporary CSV");
        file.flush().expect("Failed to flush temporary CSV");
        file
    }
}

/// Property-based testing utilities using proptest.
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for short artist/genre names drawn from a small alphabet, so
    /// generated records collide on keys often.
    pub fn name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D", "E"]).prop_map(ToString::to_string)
    }

    /// Strategy for countries drawn from a small set.
    pub fn country_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Brazil", "Germany", "Japan", "United States"])
            .prop_map(ToString::to_string)
    }

    /// Strategy for a single record.
    pub fn record_strategy() -> impl Strategy<Value = Record> {
        (
            2020i32..=2024,
            1u32..=12,
            1u32..=28,
            prop::option::weighted(0.9, 0u64..1_000_000),
            country_strategy(),
            prop::collection::vec(name_strategy(), 0..4),
            prop::collection::vec(name_strategy(), 0..3),
            name_strategy(),
        )
            .prop_map(|(year, month, day, streams, country, artists, genres, track)| Record {
                date: mock_date(year, month, day),
                streams,
                country,
                artists,
                genres,
                track_name: track,
            })
    }

    /// Strategy for a dataset of up to `max` records.
    pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(record_strategy(), 0..max)
    }
}
