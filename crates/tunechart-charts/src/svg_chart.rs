//! SVG file renderer for configured charts.

use crate::daily_trend::draw_daily_trend;
use crate::genre_bubbles::draw_genre_bubbles;
use crate::plan::ChartPlan;
use crate::ranked_bars::draw_ranked_bars;
use crate::style::ChartStyle;
use crate::traits::ChartRenderer;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tunechart_common::{sanitize_file_stem, FilterCriteria, Record, Result, TunechartError};
use tunechart_config::{ChartConfig, ChartKind, StylingConfig};

/// Renders one chart kind to `<output_dir>/<name>.svg`.
#[derive(Debug, Clone)]
pub struct SvgChart {
    plan: ChartPlan,
    style: ChartStyle,
    output_dir: PathBuf,
}

impl SvgChart {
    /// Creates a renderer from a plan.
    pub fn new(plan: ChartPlan, style: ChartStyle, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            plan,
            style,
            output_dir: output_dir.into(),
        }
    }

    /// Creates a renderer for a configured chart.
    pub fn from_config(
        chart: &ChartConfig,
        styling: &StylingConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            ChartPlan::from_config(chart),
            ChartStyle::from_config(styling),
            output_dir,
        )
    }

    /// The chart's plan.
    pub const fn plan(&self) -> &ChartPlan {
        &self.plan
    }

    /// Directory receiving the SVG file.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File the chart is written to.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.svg", sanitize_file_stem(&self.plan.name)))
    }

    /// Renders the chart into an SVG document.
    pub fn render_svg(&self, records: &[Record], criteria: &FilterCriteria) -> Result<String> {
        let series = self.plan.series(records);
        let caption = self.plan.caption(criteria);
        debug!(chart = %self.plan.name, points = series.len(), "Drawing chart");

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.style.size()).into_drawing_area();
            match self.plan.kind {
                ChartKind::DailyTrend => draw_daily_trend(&root, &caption, &series, &self.style)?,
                ChartKind::TopTracks | ChartKind::TopArtists => {
                    draw_ranked_bars(&root, &caption, &series, &self.style)?;
                }
                ChartKind::GenreBreakdown => {
                    draw_genre_bubbles(&root, &caption, &series, &self.style)?;
                }
            }
            root.present()?;
        }
        Ok(svg)
    }
}

impl ChartRenderer for SvgChart {
    fn name(&self) -> &str {
        &self.plan.name
    }

    fn render(&self, records: &[Record], criteria: &FilterCriteria) -> Result<()> {
        let svg = self.render_svg(records, criteria).map_err(|e| match e {
            TunechartError::Chart { message, source, .. } => TunechartError::Chart {
                message,
                chart: Some(self.plan.name.clone()),
                source,
            },
            other => other,
        })?;

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path();
        std::fs::write(&path, svg.as_bytes())?;

        info!(
            chart = %self.plan.name,
            records = records.len(),
            path = %path.display(),
            "Rendered chart"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunechart_common::test_utils::record_fixtures::sample_records;

    fn chart(kind: ChartKind, dir: &Path) -> SvgChart {
        SvgChart::from_config(&ChartConfig::of(kind), &StylingConfig::default(), dir)
    }

    #[test]
    fn test_output_path_uses_sanitized_name() {
        let mut config = ChartConfig::of(ChartKind::TopTracks);
        config.name = Some("Top Tracks 2023".to_string());
        let chart = SvgChart::from_config(&config, &StylingConfig::default(), "out");
        assert_eq!(chart.output_path(), PathBuf::from("out/top_tracks_2023.svg"));
        assert_eq!(chart.name(), "Top Tracks 2023");
    }

    #[test]
    fn test_render_writes_each_kind() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample_records();
        let criteria = FilterCriteria::all();

        for kind in ChartKind::ALL {
            let chart = chart(kind, dir.path());
            chart.render(&records, &criteria).unwrap();
            let svg = std::fs::read_to_string(chart.output_path()).unwrap();
            assert!(svg.contains("<svg"), "{kind} produced no svg");
            assert!(svg.contains(&format!("{} (All)", kind.title())));
        }
    }

    #[test]
    fn test_caption_reflects_criteria() {
        let chart = chart(ChartKind::TopArtists, Path::new("unused"));
        let criteria = FilterCriteria::all().with_year(2023).with_country("United States");
        let svg = chart.render_svg(&sample_records(), &criteria).unwrap();
        assert!(svg.contains("Top Artists (2023, United States)"));
    }

    #[test]
    fn test_empty_records_render_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let chart = chart(ChartKind::GenreBreakdown, dir.path());
        chart.render(&[], &FilterCriteria::all()).unwrap();
        let svg = std::fs::read_to_string(chart.output_path()).unwrap();
        assert!(svg.contains("No data"));
    }

    #[test]
    fn test_unwritable_output_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot act as the output directory.
        let chart = chart(ChartKind::TopTracks, file.path());
        assert!(chart.render(&sample_records(), &FilterCriteria::all()).is_err());
    }
}
