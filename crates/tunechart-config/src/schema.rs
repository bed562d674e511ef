//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tunechart_common::{FilterCriteria, LogFormat, LoggingConfig, Result};

/// Main configuration structure for Tunechart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input dataset configuration.
    pub dataset: DatasetConfig,
    /// Output configuration.
    pub output: OutputConfig,
    /// Initial year/country selection.
    pub filter: FilterConfig,
    /// Charts to render, in registration order.
    pub charts: Vec<ChartConfig>,
    /// Styling configuration.
    pub styling: StylingConfig,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Input dataset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the streaming CSV file.
    pub path: PathBuf,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one SVG file per chart.
    pub directory: PathBuf,
}

/// Year/country selection, as the selectors present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// "All" or a year.
    pub year: String,
    /// "All" or a country name.
    pub country: String,
}

impl FilterConfig {
    /// Parses the selection into filter criteria.
    pub fn criteria(&self) -> Result<FilterCriteria> {
        FilterCriteria::from_selectors(Some(&self.year), Some(&self.country))
    }
}

/// The chart variants that can be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Total streams per day.
    DailyTrend,
    /// Most streamed tracks.
    TopTracks,
    /// Most streamed artists.
    TopArtists,
    /// Streams and artist spread per genre.
    GenreBreakdown,
}

impl ChartKind {
    /// Every chart kind, in the default registration order.
    pub const ALL: [Self; 4] = [
        Self::DailyTrend,
        Self::TopTracks,
        Self::TopArtists,
        Self::GenreBreakdown,
    ];

    /// Stable identifier, also used as the default output file stem.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DailyTrend => "daily_trend",
            Self::TopTracks => "top_tracks",
            Self::TopArtists => "top_artists",
            Self::GenreBreakdown => "genre_breakdown",
        }
    }

    /// Human readable chart title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::DailyTrend => "Daily Streams",
            Self::TopTracks => "Top Tracks",
            Self::TopArtists => "Top Artists",
            Self::GenreBreakdown => "Genre Breakdown",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart variant.
    pub kind: ChartKind,
    /// Output name; defaults to the kind identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Title override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Top-N limit override for ranked charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    /// Whether the chart is registered at all.
    #[serde(default = "crate::defaults::enabled")]
    pub enabled: bool,
}

impl ChartConfig {
    /// A chart of the given kind with every option defaulted.
    pub const fn of(kind: ChartKind) -> Self {
        Self {
            kind,
            name: None,
            title: None,
            top_n: None,
            enabled: true,
        }
    }

    /// Output name of the chart.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.as_str())
    }

    /// Title of the chart.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.kind.title())
    }
}

/// Styling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylingConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Whether to draw grid lines.
    pub enable_grid: bool,
    /// Maximum characters of a category label before truncation.
    pub label_max_chars: usize,
    /// Color configuration.
    pub colors: ColorsConfig,
}

/// Color configuration, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Bar and bubble fill.
    pub bar: String,
    /// Fill of the leading entry of ranked charts.
    pub highlight: String,
    /// Background color.
    pub background: String,
    /// Axis and label color.
    pub text: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level filter directive.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Optional log file.
    pub file: Option<String>,
}

impl From<&LoggingSection> for LoggingConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            level: section.level.clone(),
            format: section.format,
            file_path: section.file.clone(),
            ..Self::default()
        }
    }
}

impl Config {
    /// Charts that should be registered, in order.
    pub fn enabled_charts(&self) -> impl Iterator<Item = &ChartConfig> {
        self.charts.iter().filter(|chart| chart.enabled)
    }
}
