//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;
use tunechart_common::LogFormat;
use tunechart_config::Config;

/// Command line arguments. Every flag overrides the matching configuration
/// value.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, env = "TUNECHART_CONFIG")]
    pub config: Option<PathBuf>,

    /// Streaming CSV dataset
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Directory receiving the SVG charts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Year to show, or "All"
    #[arg(short, long)]
    pub year: Option<String>,

    /// Country to show, or "All"
    #[arg(long)]
    pub country: Option<String>,

    /// Print the year and country choices offered by the dataset and exit
    #[arg(long)]
    pub list_options: bool,

    /// Log level filter, e.g. "debug" or "tunechart_charts=trace"
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Applies the flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dataset) = &self.dataset {
            config.dataset.path.clone_from(dataset);
        }
        if let Some(output) = &self.output {
            config.output.directory.clone_from(output);
        }
        if let Some(year) = &self.year {
            config.filter.year.clone_from(year);
        }
        if let Some(country) = &self.country {
            config.filter.country.clone_from(country);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
    }
}
