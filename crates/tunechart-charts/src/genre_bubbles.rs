//! Genre breakdown drawn as bubbles: x is the rank, y the stream total and
//! the radius grows with the number of distinct artists in the genre.

use crate::style::ChartStyle;
use crate::utils::{category_at, category_labels, category_range, draw_no_data, value_axis_max};
use plotters::coord::Shift;
use plotters::prelude::*;
use tunechart_common::{format_si, Result, SeriesPoint};

/// Radius of the bubble with the most artists, in pixels.
pub const MAX_BUBBLE_RADIUS: f64 = 40.0;

/// Smallest radius drawn, in pixels.
pub const MIN_BUBBLE_RADIUS: f64 = 4.0;

/// Bubble radius for `artists` when the largest genre has `max_artists`.
/// Area, not radius, is proportional to the artist count.
#[allow(clippy::cast_possible_truncation)]
pub fn bubble_radius(artists: f64, max_artists: f64) -> i32 {
    let scaled = if artists.is_finite() && artists > 0.0 && max_artists > 0.0 {
        MAX_BUBBLE_RADIUS * (artists / max_artists).min(1.0).sqrt()
    } else {
        MIN_BUBBLE_RADIUS
    };
    scaled.max(MIN_BUBBLE_RADIUS).round() as i32
}

/// Draws one bubble per genre, labelled with its artist count.
#[allow(clippy::cast_precision_loss)]
pub fn draw_genre_bubbles<DB>(
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

    let max_artists = series
        .iter()
        .filter_map(|point| point.secondary)
        .fold(0.0, f64::max);

    let labels = category_labels(series, style.label_max_chars);
    let x_formatter = |x: &f64| category_at(&labels, *x);
    let y_formatter = |y: &f64| format_si(*y);

    // Extra headroom so the tallest bubble and its label stay on canvas.
    let y_max = value_axis_max(series) * 1.2;

    let mut chart = ChartBuilder::on(root)
        .caption(caption, style.title_style())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(series.len()), 0.0..y_max)?;

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

    let fill = style.bar.mix(0.7).filled();
    let annotation = style.annotation_style();
    chart.draw_series(series.iter().enumerate().map(|(rank, point)| {
        let artists = point.secondary.unwrap_or(0.0);
        let radius = bubble_radius(artists, max_artists);
        EmptyElement::at((rank as f64, point.value))
            + Circle::new((0, 0), radius, fill)
            + Text::new(
                format!("{artists} artists"),
                (0, -radius - 2),
                annotation.clone(),
            )
    }))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_radius() {
        assert_eq!(bubble_radius(10.0, 10.0), 40);
        assert_eq!(bubble_radius(2.5, 10.0), 20);
        assert_eq!(bubble_radius(0.0, 10.0), 4);
        assert_eq!(bubble_radius(1.0, 10_000.0), 4);
        assert_eq!(bubble_radius(3.0, 0.0), 4);
        assert_eq!(bubble_radius(f64::NAN, 3.0), 4);
    }

    #[test]
    fn test_draw_genre_bubbles_svg() {
        let style = ChartStyle::default();
        let series = vec![
            SeriesPoint {
                key: "pop".to_string(),
                value: 150.0,
                secondary: Some(2.0),
            },
            SeriesPoint {
                key: "reggaeton".to_string(),
                value: 125.0,
                secondary: Some(1.0),
            },
        ];
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, style.size()).into_drawing_area();
            draw_genre_bubbles(&root, "Genre Breakdown (All)", &series, &style).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains("<circle"));
        assert!(svg.contains("2 artists"));
        assert!(svg.contains("reggaeton"));
    }
}
