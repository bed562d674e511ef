//! Daily stream totals drawn as bars over a continuous day axis.

use crate::style::ChartStyle;
use crate::utils::{draw_no_data, value_axis_max};
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;
use tunechart_common::{format_si, Result, SeriesPoint};

/// Half the width of a day bar, in days.
pub const DAY_BAR_HALF_WIDTH: f64 = 0.4;

/// Most date labels drawn on the x axis.
pub const MAX_DATE_LABELS: usize = 12;

/// A day's total positioned by its offset from the first day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayBar {
    /// Days since the first day in the series.
    pub offset: i64,
    /// Stream total.
    pub value: f64,
}

/// Places date-keyed points on a day axis. Keys that are not `YYYY-MM-DD`
/// dates are skipped. Returns the first day and the bars.
pub fn day_bars(series: &[SeriesPoint]) -> Option<(NaiveDate, Vec<DayBar>)> {
    let dated: Vec<(NaiveDate, f64)> = series
        .iter()
        .filter_map(|point| match NaiveDate::parse_from_str(&point.key, "%Y-%m-%d") {
            Ok(date) => Some((date, point.value)),
            Err(_) => {
                debug!(key = %point.key, "Skipping non-date key in daily series");
                None
            }
        })
        .collect();

    let first = dated.iter().map(|(date, _)| *date).min()?;
    let bars = dated
        .into_iter()
        .map(|(date, value)| DayBar {
            offset: (date - first).num_days(),
            value,
        })
        .collect();
    Some((first, bars))
}

/// Draws one bar per day.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn draw_daily_trend<DB>(
    root: &DrawingArea<DB, Shift>,
    caption: &str,
    series: &[SeriesPoint],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let Some((first, bars)) = day_bars(series) else {
        return draw_no_data(root, caption, style);
    };
    let span = bars.iter().map(|bar| bar.offset).max().unwrap_or(0);

    root.fill(&style.background)?;

    let x_formatter = |x: &f64| {
        let day = x.round();
        if (x - day).abs() > 1e-6 {
            return String::new();
        }
        first
            .checked_add_signed(Duration::days(day as i64))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    let y_formatter = |y: &f64| format_si(*y);

    let mut chart = ChartBuilder::on(root)
        .caption(caption, style.title_style())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(span as f64 + 0.5), 0.0..value_axis_max(series))?;

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(MAX_DATE_LABELS.min(bars.len().max(2)))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc("Date")
        .y_desc("Streams")
        .label_style(style.label_style())
        .axis_desc_style(style.label_style());
    if !style.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart.draw_series(bars.iter().map(|bar| {
        let x = bar.offset as f64;
        Rectangle::new(
            [(x - DAY_BAR_HALF_WIDTH, 0.0), (x + DAY_BAR_HALF_WIDTH, bar.value)],
            style.bar.filled(),
        )
    }))?;

    Ok(())
}
