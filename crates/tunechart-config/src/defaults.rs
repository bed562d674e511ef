//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;
use tunechart_common::{LogFormat, ALL_SELECTOR};

/// Default dataset location.
pub const DEFAULT_DATASET_PATH: &str = "dataset/music.csv";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "charts";

/// Default number of entries shown by ranked charts.
pub const DEFAULT_TOP_N: usize = 10;

/// Default number of bubbles in the genre breakdown.
pub const DEFAULT_GENRE_TOP_N: usize = 15;

pub(crate) const fn enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            output: OutputConfig::default(),
            filter: FilterConfig::default(),
            charts: ChartKind::ALL.into_iter().map(ChartConfig::of).collect(),
            styling: StylingConfig::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            year: ALL_SELECTOR.to_string(),
            country: ALL_SELECTOR.to_string(),
        }
    }
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            enable_grid: false,
            label_max_chars: 20,
            colors: ColorsConfig::default(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            bar: "#4c51bf".to_string(),
            highlight: "#ffab00".to_string(),
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl ChartKind {
    /// Top-N limit used when a chart does not override it. The daily trend
    /// shows every day.
    pub const fn default_top_n(self) -> Option<usize> {
        match self {
            Self::DailyTrend => None,
            Self::TopTracks | Self::TopArtists => Some(DEFAULT_TOP_N),
            Self::GenreBreakdown => Some(DEFAULT_GENRE_TOP_N),
        }
    }
}

impl ChartConfig {
    /// Effective top-N limit.
    pub fn effective_top_n(&self) -> Option<usize> {
        self.top_n.or_else(|| self.kind.default_top_n())
    }
}
