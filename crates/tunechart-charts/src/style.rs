//! Resolved chart styling.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tunechart_config::StylingConfig;

/// Font family used for every text element.
pub const FONT_FAMILY: &str = "sans-serif";

/// Styling with colors parsed and ready for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Whether to draw grid lines.
    pub grid: bool,
    /// Category label truncation limit.
    pub label_max_chars: usize,
    /// Bar and bubble fill.
    pub bar: RGBColor,
    /// Fill of the leading ranked entry.
    pub highlight: RGBColor,
    /// Background fill.
    pub background: RGBColor,
    /// Axis and label color.
    pub text: RGBColor,
}

impl ChartStyle {
    /// Resolves a styling section.
    pub fn from_config(styling: &StylingConfig) -> Self {
        Self {
            width: styling.width,
            height: styling.height,
            grid: styling.enable_grid,
            label_max_chars: styling.label_max_chars,
            bar: parse_color(&styling.colors.bar),
            highlight: parse_color(&styling.colors.highlight),
            background: parse_color(&styling.colors.background),
            text: parse_color(&styling.colors.text),
        }
    }

    /// Canvas size.
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Caption text style.
    pub fn title_style(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 22).into_font().color(&self.text)
    }

    /// Axis label text style.
    pub fn label_style(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 12).into_font().color(&self.text)
    }

    /// Style for value annotations centered above a point.
    pub fn annotation_style(&self) -> TextStyle<'static> {
        self.label_style().pos(Pos::new(HPos::Center, VPos::Bottom))
    }

    /// Style for the centered "No data" notice.
    pub fn notice_style(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 18)
            .into_font()
            .color(&self.text)
            .pos(Pos::new(HPos::Center, VPos::Center))
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_config(&StylingConfig::default())
    }
}

/// Parses a `#rrggbb` color, falling back to black.
pub fn parse_color(color: &str) -> RGBColor {
    color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .and_then(|hex| {
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        })
        .unwrap_or(BLACK)
}
