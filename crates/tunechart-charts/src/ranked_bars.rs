//! Vertical bar chart for ranked series (top tracks, top artists).

use crate::style::ChartStyle;
use crate::utils::{category_at, category_labels, category_range, draw_no_data, value_axis_max};
use plotters::coord::Shift;
use plotters::prelude::*;
use tunechart_common::{format_si, Result, SeriesPoint};

/// Half the width of a bar in category units.
pub const BAR_HALF_WIDTH: f64 = 0.4;

/// Draws one bar per series point, in series order, with the leading bar
/// in the highlight color and the value printed above each bar.
#[allow(clippy::cast_precision_loss)]
pub fn draw_ranked_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    caption: &str,
    series: &[SeriesPoint],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if series.is_empty() {
        return draw_no_data(root, caption, style);
    }

    root.fill(&style.background)?;

    let labels = category_labels(series, style.label_max_chars);
    let x_formatter = |x: &f64| category_at(&labels, *x);
    let y_formatter = |y: &f64| format_si(*y);

    let mut chart = ChartBuilder::on(root)
        .caption(caption, style.title_style())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(series.len()), 0.0..value_axis_max(series))?;

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(series.len())
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .y_desc("Streams")
        .label_style(style.label_style())
        .axis_desc_style(style.label_style());
    if !style.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart.draw_series(series.iter().enumerate().map(|(rank, point)| {
        let x = rank as f64;
        let color = if rank == 0 { style.highlight } else { style.bar };
        Rectangle::new(
            [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, point.value)],
            color.filled(),
        )
    }))?;

    chart.draw_series(series.iter().enumerate().map(|(rank, point)| {
        Text::new(
            format_si(point.value),
            (rank as f64, point.value),
            style.annotation_style(),
        )
    }))?;

    Ok(())
}
