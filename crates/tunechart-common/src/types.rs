//! Common type definitions for the streaming record model.

use crate::error::{Result, TunechartError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector value meaning "no constraint on this dimension".
pub const ALL_SELECTOR: &str = "All";

/// One streaming record after parsing.
///
/// `streams` is `None` when the source value was missing or not a valid
/// non-negative number; such records never contribute to sums, means or
/// extents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date of the chart entry.
    pub date: NaiveDate,
    /// Stream count, if the source value was valid.
    pub streams: Option<u64>,
    /// Full country name.
    pub country: String,
    /// Credited artists, in source order.
    pub artists: Vec<String>,
    /// Genres attached to the artists, in source order.
    pub genres: Vec<String>,
    /// Track title.
    pub track_name: String,
}

impl Record {
    /// Calendar year of the record.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Year/country constraints applied before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Restrict to a single calendar year.
    pub year: Option<i32>,
    /// Restrict to a single country.
    pub country: Option<String>,
}

impl FilterCriteria {
    /// Criteria that retain every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds criteria from selector strings as offered by the year and
    /// country selectors. Empty values and "All" impose no constraint.
    pub fn from_selectors(year: Option<&str>, country: Option<&str>) -> Result<Self> {
        // Only the year's canonical spelling selects it, so "02023" and
        // "+2023" are rejected like any other non-year.
        let year = match year.map(str::trim).filter(|y| !is_all(y)) {
            Some(value) => Some(
                value
                    .parse::<i32>()
                    .ok()
                    .filter(|year| year.to_string() == value)
                    .ok_or_else(|| {
                        TunechartError::validation_field(
                            format!("year selector must be \"All\" or a year, got {value:?}"),
                            "year",
                        )
                    })?,
            ),
            None => None,
        };

        let country = country
            .map(str::trim)
            .filter(|c| !is_all(c))
            .map(ToString::to_string);

        Ok(Self { year, country })
    }

    /// Restricts to a year.
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restricts to a country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Whether the criteria impose no constraint at all.
    pub const fn is_unconstrained(&self) -> bool {
        self.year.is_none() && self.country.is_none()
    }

    /// Whether a record satisfies both constraints.
    pub fn matches(&self, record: &Record) -> bool {
        self.year.map_or(true, |year| record.year() == year)
            && self
                .country
                .as_deref()
                .map_or(true, |country| record.country == country)
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.year, self.country.as_deref()) {
            (None, None) => write!(f, "{ALL_SELECTOR}"),
            (Some(year), None) => write!(f, "{year}"),
            (None, Some(country)) => write!(f, "{country}"),
            (Some(year), Some(country)) => write!(f, "{year}, {country}"),
        }
    }
}

fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL_SELECTOR)
}

/// One aggregated group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Group key (date bucket, artist, genre, track, ...).
    pub key: String,
    /// Primary metric (sum, mean or count).
    pub value: f64,
    /// Optional secondary metric such as a distinct-artist count.
    pub secondary: Option<f64>,
}

impl SeriesPoint {
    /// Creates a point without a secondary metric.
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
            secondary: None,
        }
    }
}

/// Ordered aggregation output handed to chart renderers.
pub type AggregatedSeries = Vec<SeriesPoint>;

/// The values offered by the year and country selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct countries, sorted.
    pub countries: Vec<String>,
}

impl FilterOptions {
    /// Year selector entries: "All" followed by every year.
    pub fn year_choices(&self) -> Vec<String> {
        std::iter::once(ALL_SELECTOR.to_string())
            .chain(self.years.iter().map(ToString::to_string))
            .collect()
    }

    /// Country selector entries: "All" followed by every country.
    pub fn country_choices(&self) -> Vec<String> {
        std::iter::once(ALL_SELECTOR.to_string())
            .chain(self.countries.iter().cloned())
            .collect()
    }
}
