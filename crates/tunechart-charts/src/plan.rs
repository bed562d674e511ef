//! Aggregation plans for each chart kind.

use crate::aggregator::{Aggregator, GroupKey, SecondaryMetric};
use tunechart_common::{AggregatedSeries, FilterCriteria, Record};
use tunechart_config::{ChartConfig, ChartKind};

/// What one chart draws and how its series is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPlan {
    /// Chart variant.
    pub kind: ChartKind,
    /// Output name.
    pub name: String,
    /// Base title, without the criteria suffix.
    pub title: String,
    /// Series computation.
    pub aggregator: Aggregator,
}

impl ChartPlan {
    /// Plan for a chart kind with its default name and title.
    pub fn for_kind(kind: ChartKind, top_n: Option<usize>) -> Self {
        Self {
            kind,
            name: kind.as_str().to_string(),
            title: kind.title().to_string(),
            aggregator: aggregator_for(kind, top_n),
        }
    }

    /// Plan for a configured chart.
    pub fn from_config(chart: &ChartConfig) -> Self {
        Self {
            kind: chart.kind,
            name: chart.name().to_string(),
            title: chart.title().to_string(),
            aggregator: aggregator_for(chart.kind, chart.effective_top_n()),
        }
    }

    /// Title with the active selection, e.g. `Top Artists (2023, Japan)`.
    pub fn caption(&self, criteria: &FilterCriteria) -> String {
        format!("{} ({criteria})", self.title)
    }

    /// Computes the chart's series.
    pub fn series(&self, records: &[Record]) -> AggregatedSeries {
        self.aggregator.aggregate(records)
    }
}

/// Grouping and reduction used by each chart kind.
pub fn aggregator_for(kind: ChartKind, top_n: Option<usize>) -> Aggregator {
    let aggregator = match kind {
        ChartKind::DailyTrend => Aggregator::new(GroupKey::Date),
        ChartKind::TopTracks => Aggregator::new(GroupKey::Track),
        ChartKind::TopArtists => Aggregator::new(GroupKey::Artist),
        ChartKind::GenreBreakdown => {
            Aggregator::new(GroupKey::Genre).secondary(SecondaryMetric::DistinctArtists)
        }
    };

    match top_n {
        Some(limit) => aggregator.top(limit),
        None => aggregator,
    }
}
