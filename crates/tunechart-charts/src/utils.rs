//! Drawing helpers shared by the chart kinds.

use crate::aggregator::value_extent;
use crate::style::ChartStyle;
use plotters::coord::Shift;
use plotters::prelude::*;
use tunechart_common::{truncate_string, Result, SeriesPoint};

/// Headroom above the tallest mark, as a fraction of its value.
pub const VALUE_HEADROOM: f64 = 0.1;

/// Notice drawn in place of marks for an empty series.
pub const NO_DATA: &str = "No data";

/// Upper bound of the value axis: the largest value plus headroom, or 1
/// when there is nothing positive to show.
pub fn value_axis_max(series: &[SeriesPoint]) -> f64 {
    match value_extent(series) {
        Some((_, max)) if max > 0.0 => max * (1.0 + VALUE_HEADROOM),
        _ => 1.0,
    }
}

/// Truncated category labels for a series, in series order.
pub fn category_labels(series: &[SeriesPoint], max_chars: usize) -> Vec<String> {
    series
        .iter()
        .map(|point| truncate_string(&point.key, max_chars))
        .collect()
}

/// Label for a categorical axis position; empty between categories.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn category_at(labels: &[String], x: f64) -> String {
    let index = x.round();
    if index < 0.0 || (x - index).abs() > 1e-6 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Axis range that centers `count` categories on integer positions.
#[allow(clippy::cast_precision_loss)]
pub fn category_range(count: usize) -> std::ops::Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

/// Fills the canvas and draws the caption with a centered "No data" notice.
pub fn draw_no_data<DB>(root: &DrawingArea<DB, Shift>, caption: &str, style: &ChartStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&style.background)?;
    let area = root.titled(caption, style.title_style())?;
    let (width, height) = area.dim_in_pixel();
    let center = (
        i32::try_from(width / 2).unwrap_or(0),
        i32::try_from(height / 2).unwrap_or(0),
    );
    area.draw(&Text::new(NO_DATA, center, style.notice_style()))?;
    Ok(())
}
