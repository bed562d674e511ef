//! Data aggregation pipeline for turning filtered records into chart series.
//!
//! One parametrised [`Aggregator`] serves every chart kind: a grouping key,
//! a reducer, an optional secondary distinct-count metric, and an optional
//! top-N selection.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};
use tunechart_common::{AggregatedSeries, Record, SeriesPoint};

/// What records are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Exact calendar date (`YYYY-MM-DD`).
    Date,
    /// Calendar year.
    Year,
    /// Each credited artist; a record contributes once per distinct artist.
    Artist,
    /// Each genre; a record contributes once per distinct genre.
    Genre,
    /// Track name.
    Track,
    /// Country name.
    Country,
}

impl GroupKey {
    /// Keys a record contributes to, deduplicated within the record.
    fn keys(self, record: &Record) -> Vec<String> {
        match self {
            Self::Date => vec![record.date.format("%Y-%m-%d").to_string()],
            Self::Year => vec![record.year().to_string()],
            Self::Artist => distinct(&record.artists),
            Self::Genre => distinct(&record.genres),
            Self::Track => vec![record.track_name.clone()],
            Self::Country => vec![record.country.clone()],
        }
    }

    /// Orders date and year groups by their value; every other key keeps
    /// first-appearance order.
    fn sort_groups(self, keys: &mut [String]) {
        match self {
            Self::Date => {
                keys.sort_by_cached_key(|key| NaiveDate::parse_from_str(key, "%Y-%m-%d").ok());
            }
            Self::Year => keys.sort_by_cached_key(|key| key.parse::<i32>().ok()),
            Self::Artist | Self::Genre | Self::Track | Self::Country => {}
        }
    }
}

fn distinct(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect()
}

/// How a group's records are reduced to the primary metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reducer {
    /// Sum of valid stream counts.
    Sum,
    /// Mean of valid stream counts.
    Mean,
    /// Number of contributing records.
    Count,
}

/// Distinct-cardinality metric computed alongside the primary metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryMetric {
    /// Number of distinct artists in the group.
    DistinctArtists,
    /// Number of distinct tracks in the group.
    DistinctTracks,
}

/// Direction of the top-N sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Largest first.
    #[default]
    Descending,
    /// Smallest first.
    Ascending,
}

/// Top-N selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopN {
    /// Maximum number of groups kept.
    pub limit: usize,
    /// Sort direction by primary metric.
    pub order: SortOrder,
}

impl TopN {
    /// Largest `limit` groups.
    pub const fn largest(limit: usize) -> Self {
        Self {
            limit,
            order: SortOrder::Descending,
        }
    }

    /// Smallest `limit` groups.
    pub const fn smallest(limit: usize) -> Self {
        Self {
            limit,
            order: SortOrder::Ascending,
        }
    }
}

/// Per-group running totals.
#[derive(Debug, Default)]
struct GroupAccumulator {
    sum: u128,
    valid: u64,
    records: u64,
    members: HashSet<String>,
}

impl GroupAccumulator {
    fn add(&mut self, record: &Record, secondary: Option<SecondaryMetric>) {
        self.records += 1;
        if let Some(streams) = record.streams {
            self.sum += u128::from(streams);
            self.valid += 1;
        }
        match secondary {
            Some(SecondaryMetric::DistinctArtists) => {
                self.members.extend(record.artists.iter().cloned());
            }
            Some(SecondaryMetric::DistinctTracks) => {
                self.members.insert(record.track_name.clone());
            }
            None => {}
        }
    }

    /// Primary metric, or `None` when the reducer has nothing valid to
    /// report for this group.
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, reducer: Reducer) -> Option<f64> {
        match reducer {
            Reducer::Count => Some(self.records as f64),
            Reducer::Sum => (self.valid > 0).then(|| self.sum as f64),
            Reducer::Mean => (self.valid > 0).then(|| self.sum as f64 / self.valid as f64),
        }
    }
}

/// Parametrised grouping/reduction over a record set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Aggregator {
    /// Grouping key.
    pub key: GroupKey,
    /// Primary metric reducer.
    pub reducer: Reducer,
    /// Optional secondary metric.
    pub secondary: Option<SecondaryMetric>,
    /// Optional top-N selection.
    pub top_n: Option<TopN>,
}

impl Aggregator {
    /// Groups by `key` and sums stream counts.
    pub const fn new(key: GroupKey) -> Self {
        Self {
            key,
            reducer: Reducer::Sum,
            secondary: None,
            top_n: None,
        }
    }

    /// Sets the reducer.
    #[must_use]
    pub const fn reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = reducer;
        self
    }

    /// Adds a secondary metric.
    #[must_use]
    pub const fn secondary(mut self, metric: SecondaryMetric) -> Self {
        self.secondary = Some(metric);
        self
    }

    /// Keeps only the `limit` largest groups.
    #[must_use]
    pub const fn top(mut self, limit: usize) -> Self {
        self.top_n = Some(TopN::largest(limit));
        self
    }

    /// Sets an explicit top-N selection.
    #[must_use]
    pub const fn top_n(mut self, top_n: Option<TopN>) -> Self {
        self.top_n = top_n;
        self
    }

    /// Aggregates `records` into a series. The input is only read.
    #[instrument(skip(self, records), fields(key = ?self.key, reducer = ?self.reducer, records = records.len()))]
    pub fn aggregate(&self, records: &[Record]) -> AggregatedSeries {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, GroupAccumulator> = HashMap::new();

        for record in records {
            for key in self.key.keys(record) {
                if !groups.contains_key(&key) {
                    order.push(key.clone());
                }
                groups.entry(key).or_default().add(record, self.secondary);
            }
        }

        self.key.sort_groups(&mut order);

        #[allow(clippy::cast_precision_loss)]
        let mut series: AggregatedSeries = order
            .into_iter()
            .filter_map(|key| {
                let accumulator = groups.get(&key)?;
                let value = accumulator.value(self.reducer)?;
                let secondary = self
                    .secondary
                    .map(|_| accumulator.members.len() as f64);
                Some(SeriesPoint {
                    key,
                    value,
                    secondary,
                })
            })
            .collect();

        if let Some(top_n) = self.top_n {
            select_top(&mut series, top_n);
        }

        debug!(groups = series.len(), "Aggregated series");
        series
    }
}

/// Stable sort by primary metric in the requested direction, then truncate.
/// Equal values keep their encounter order.
pub fn select_top(series: &mut AggregatedSeries, top_n: TopN) {
    match top_n.order {
        SortOrder::Descending => series.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Ascending => series.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }
    series.truncate(top_n.limit);
}

/// Minimum and maximum primary metric, ignoring non-finite values.
pub fn value_extent(series: &[SeriesPoint]) -> Option<(f64, f64)> {
    series
        .iter()
        .map(|point| point.value)
        .filter(|value| value.is_finite())
        .fold(None, |extent, value| match extent {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}

/// Earliest and latest record dates.
pub fn date_extent(records: &[Record]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|record| record.date).min()?;
    let max = records.iter().map(|record| record.date).max()?;
    Some((min, max))
}

/// Largest valid stream count of a single record.
pub fn max_streams(records: &[Record]) -> Option<u64> {
    records.iter().filter_map(|record| record.streams).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tunechart_common::test_utils::{
        mock_date,
        property_testing,
        record_fixtures::{record, sample_records},
    };

    fn keys(series: &[SeriesPoint]) -> Vec<&str> {
        series.iter().map(|p| p.key.as_str()).collect()
    }

    #[test]
    fn test_daily_sum_does_not_collapse_same_day_records() {
        let day = mock_date(2023, 1, 1);
        let records = vec![
            record(day, 100, "US", &["A"]),
            record(day, 50, "US", &["B"]),
        ];

        let series = Aggregator::new(GroupKey::Date).aggregate(&records);
        assert_eq!(series, vec![SeriesPoint::new("2023-01-01", 150.0)]);
    }

    #[test]
    fn test_top_artist() {
        let day = mock_date(2023, 1, 1);
        let records = vec![
            record(day, 100, "US", &["A"]),
            record(day, 50, "US", &["B"]),
        ];

        let series = Aggregator::new(GroupKey::Artist).top(1).aggregate(&records);
        assert_eq!(series, vec![SeriesPoint::new("A", 100.0)]);
    }

    #[test]
    fn test_multi_artist_record_counts_for_each_artist() {
        let series = Aggregator::new(GroupKey::Artist).aggregate(&sample_records());

        // Duet (50) is credited to both Bad Bunny and Taylor Swift.
        assert_eq!(
            series,
            vec![
                SeriesPoint::new("Rammstein", 300.0),
                SeriesPoint::new("Taylor Swift", 150.0),
                SeriesPoint::new("Bad Bunny", 125.0),
            ]
        );
    }

    #[test]
    fn test_repeated_artist_in_one_record_counts_once() {
        let records = vec![record(mock_date(2023, 1, 1), 10, "US", &["A", "A", "B"])];
        let series = Aggregator::new(GroupKey::Artist).aggregate(&records);
        assert_eq!(series, vec![SeriesPoint::new("A", 10.0), SeriesPoint::new("B", 10.0)]);
    }

    #[test]
    fn test_groups_without_valid_streams_are_omitted_from_sums() {
        // Anitta's only record has no valid stream count.
        let series = Aggregator::new(GroupKey::Artist).aggregate(&sample_records());
        assert!(!keys(&series).contains(&"Anitta"));

        let counts = Aggregator::new(GroupKey::Artist)
            .reducer(Reducer::Count)
            .aggregate(&sample_records());
        let anitta = counts.iter().find(|p| p.key == "Anitta").unwrap();
        assert_eq!(anitta.value, 1.0);
    }

    #[test]
    fn test_mean_skips_invalid_streams() {
        let series = Aggregator::new(GroupKey::Date)
            .reducer(Reducer::Mean)
            .aggregate(&sample_records());
        // 2023-01-02 has one invalid (None) and one valid (75) record.
        let day = series.iter().find(|p| p.key == "2023-01-02").unwrap();
        assert_eq!(day.value, 75.0);
        let new_year = series.iter().find(|p| p.key == "2023-01-01").unwrap();
        assert_eq!(new_year.value, 75.0);
    }

    #[test]
    fn test_date_groups_are_chronological() {
        let mut records = sample_records();
        records.reverse();
        let series = Aggregator::new(GroupKey::Date).aggregate(&records);
        assert_eq!(keys(&series), vec!["2022-12-31", "2023-01-01", "2023-01-02"]);
    }

    #[test]
    fn test_year_groups_sort_numerically() {
        let records = vec![
            record(mock_date(2023, 5, 1), 1, "Peru", &["A"]),
            record(mock_date(999, 5, 1), 2, "Peru", &["A"]),
            record(mock_date(10_000, 5, 1), 3, "Peru", &["A"]),
        ];
        let by_year = Aggregator::new(GroupKey::Year).aggregate(&records);
        assert_eq!(keys(&by_year), vec!["999", "2023", "10000"]);

        let by_date = Aggregator::new(GroupKey::Date).aggregate(&records[..2]);
        assert_eq!(keys(&by_date), vec!["0999-05-01", "2023-05-01"]);
    }

    #[test]
    fn test_year_and_country_keys() {
        let by_year = Aggregator::new(GroupKey::Year).aggregate(&sample_records());
        assert_eq!(by_year, vec![SeriesPoint::new("2022", 300.0), SeriesPoint::new("2023", 225.0)]);

        let by_country = Aggregator::new(GroupKey::Country).aggregate(&sample_records());
        assert_eq!(keys(&by_country), vec!["Germany", "United States"]);
        assert_eq!(by_country[0].value, 375.0);
    }

    #[test]
    fn test_genre_distinct_artists() {
        let series = Aggregator::new(GroupKey::Genre)
            .secondary(SecondaryMetric::DistinctArtists)
            .top(2)
            .aggregate(&sample_records());

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].key, "metal");
        assert_eq!(series[0].secondary, Some(1.0));
        assert_eq!(series[1].key, "industrial");

        let pop = Aggregator::new(GroupKey::Genre)
            .secondary(SecondaryMetric::DistinctArtists)
            .aggregate(&sample_records())
            .into_iter()
            .find(|p| p.key == "pop")
            .unwrap();
        assert_eq!(pop.value, 150.0);
        assert_eq!(pop.secondary, Some(2.0));
    }

    #[test]
    fn test_distinct_tracks() {
        let series = Aggregator::new(GroupKey::Artist)
            .secondary(SecondaryMetric::DistinctTracks)
            .aggregate(&sample_records());
        let bad_bunny = series.iter().find(|p| p.key == "Bad Bunny").unwrap();
        assert_eq!(bad_bunny.secondary, Some(2.0));
    }

    #[test]
    fn test_top_n_ties_keep_encounter_order() {
        let day = mock_date(2023, 1, 1);
        let records = vec![
            record(day, 10, "US", &["First"]),
            record(day, 20, "US", &["Big"]),
            record(day, 10, "US", &["Second"]),
            record(day, 10, "US", &["Third"]),
        ];
        let series = Aggregator::new(GroupKey::Artist).top(3).aggregate(&records);
        assert_eq!(keys(&series), vec!["Big", "First", "Second"]);
    }

    #[test]
    fn test_ascending_top_n() {
        let series = Aggregator::new(GroupKey::Artist)
            .top_n(Some(TopN::smallest(1)))
            .aggregate(&sample_records());
        assert_eq!(series, vec![SeriesPoint::new("Bad Bunny", 125.0)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Aggregator::new(GroupKey::Track).top(5).aggregate(&[]).is_empty());
        assert_eq!(value_extent(&[]), None);
        assert_eq!(date_extent(&[]), None);
        assert_eq!(max_streams(&[]), None);
    }

    #[test]
    fn test_extents() {
        let records = sample_records();
        assert_eq!(
            date_extent(&records),
            Some((mock_date(2022, 12, 31), mock_date(2023, 1, 2)))
        );
        assert_eq!(max_streams(&records), Some(300));

        let series = vec![
            SeriesPoint::new("a", 3.0),
            SeriesPoint::new("b", f64::NAN),
            SeriesPoint::new("c", -1.0),
        ];
        assert_eq!(value_extent(&series), Some((-1.0, 3.0)));
    }

    proptest! {
        #[test]
        fn prop_artist_attribution_multiplies_by_artist_count(
            records in property_testing::records_strategy(30),
        ) {
            let series = Aggregator::new(GroupKey::Artist).aggregate(&records);
            let total: f64 = series.iter().map(|p| p.value).sum();
            let expected: u64 = records
                .iter()
                .map(|r| r.streams.unwrap_or(0) * distinct(&r.artists).len() as u64)
                .sum();
            prop_assert_eq!(total, expected as f64);
        }

        #[test]
        fn prop_top_n_sorted_and_bounded(
            records in property_testing::records_strategy(30),
            limit in 1usize..6,
            key in prop::sample::select(vec![GroupKey::Artist, GroupKey::Genre, GroupKey::Track, GroupKey::Date]),
        ) {
            let series = Aggregator::new(key).top(limit).aggregate(&records);
            prop_assert!(series.len() <= limit);
            for pair in series.windows(2) {
                prop_assert!(pair[0].value >= pair[1].value);
            }
        }

        #[test]
        fn prop_aggregation_is_idempotent(
            records in property_testing::records_strategy(30),
            reducer in prop::sample::select(vec![Reducer::Sum, Reducer::Mean, Reducer::Count]),
        ) {
            let snapshot = records.clone();
            let aggregator = Aggregator::new(GroupKey::Genre)
                .reducer(reducer)
                .secondary(SecondaryMetric::DistinctArtists)
                .top(4);
            let first = aggregator.aggregate(&records);
            let second = aggregator.aggregate(&records);
            prop_assert_eq!(first, second);
            prop_assert_eq!(records, snapshot);
        }
    }
}
