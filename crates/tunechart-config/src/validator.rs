//! Runtime validation of loaded configuration.

use crate::schema::Config;
use std::collections::HashSet;
use tunechart_common::{Result, TunechartError};

/// Smallest accepted canvas edge in pixels.
pub const MIN_CANVAS_EDGE: u32 = 100;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first problem found.
    pub fn validate(config: &Config) -> Result<()> {
        if config.dataset.path.as_os_str().is_empty() {
            return Err(TunechartError::validation_field(
                "dataset path cannot be empty",
                "dataset.path",
            ));
        }

        if config.output.directory.as_os_str().is_empty() {
            return Err(TunechartError::validation_field(
                "output directory cannot be empty",
                "output.directory",
            ));
        }

        config.filter.criteria().map_err(|_| {
            TunechartError::validation_field(
                format!("year must be \"All\" or a year, got {:?}", config.filter.year),
                "filter.year",
            )
        })?;

        let styling = &config.styling;
        if styling.width < MIN_CANVAS_EDGE || styling.height < MIN_CANVAS_EDGE {
            return Err(TunechartError::validation_field(
                format!(
                    "canvas must be at least {MIN_CANVAS_EDGE}x{MIN_CANVAS_EDGE}, got {}x{}",
                    styling.width, styling.height
                ),
                "styling",
            ));
        }

        if styling.label_max_chars < 4 {
            return Err(TunechartError::validation_field(
                "label_max_chars must be at least 4",
                "styling.label_max_chars",
            ));
        }

        let colors = [
            ("styling.colors.bar", &styling.colors.bar),
            ("styling.colors.highlight", &styling.colors.highlight),
            ("styling.colors.background", &styling.colors.background),
            ("styling.colors.text", &styling.colors.text),
        ];
        for (field, color) in colors {
            if !is_hex_color(color) {
                return Err(TunechartError::validation_field(
                    format!("invalid color {color:?}, expected #rrggbb"),
                    field,
                ));
            }
        }

        let mut names = HashSet::new();
        for chart in config.enabled_charts() {
            if chart.top_n == Some(0) {
                return Err(TunechartError::validation_field(
                    format!("chart {} has top_n = 0", chart.name()),
                    "charts.top_n",
                ));
            }
            if chart.name().trim().is_empty() {
                return Err(TunechartError::validation_field(
                    "chart name cannot be empty",
                    "charts.name",
                ));
            }
            if !names.insert(chart.name()) {
                return Err(TunechartError::validation_field(
                    format!("duplicate chart name {}", chart.name()),
                    "charts.name",
                ));
            }
        }

        Ok(())
    }
}

/// Whether a string is a `#rrggbb` color.
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
