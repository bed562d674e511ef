//! Application wiring: configuration, dataset, renderers and the update pass.

use crate::cli::Cli;
use crate::error::{AppError, AppResult};
use tracing::{info, instrument, warn};
use tunechart_charts::{Dataset, SvgChart, UpdateCoordinator, UpdateReport};
use tunechart_common::{init_logging, FilterCriteria, FilterOptions, LoggingConfig};
use tunechart_config::{Config, ConfigLoader, ConfigValidator};

/// What a run produced.
#[derive(Debug)]
pub enum Outcome {
    /// The selector choices were requested instead of charts.
    Options(FilterOptions),
    /// Charts were rendered.
    Rendered(UpdateReport),
}

/// Loads the configuration file (or the defaults), applies the command line
/// overrides and validates the result.
pub async fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(path)
            .load()
            .await
            .map_err(AppError::Config)?,
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    ConfigValidator::validate(&config).map_err(AppError::Config)?;
    Ok(config)
}

/// Initializes logging from the configuration.
pub fn init_app_logging(config: &Config) -> AppResult<()> {
    init_logging(&LoggingConfig::from(&config.logging)).map_err(AppError::Logging)
}

/// Loads the dataset and either lists the selector choices or renders every
/// enabled chart for the configured selection.
#[instrument(skip_all, fields(dataset = %config.dataset.path.display()))]
pub async fn run(config: &Config, list_options: bool) -> AppResult<Outcome> {
    let criteria = config.filter.criteria().map_err(AppError::Config)?;
    let dataset = Dataset::load(&config.dataset.path)
        .await
        .map_err(AppError::Dataset)?;

    if list_options {
        return Ok(Outcome::Options(dataset.options().clone()));
    }

    warn_on_unknown_selection(dataset.options(), &criteria);

    let mut coordinator = UpdateCoordinator::new(dataset);
    for chart in config.enabled_charts() {
        coordinator.register(SvgChart::from_config(
            chart,
            &config.styling,
            &config.output.directory,
        ));
    }
    info!(charts = ?coordinator.renderer_names(), "Registered charts");

    let report = coordinator.on_filter_change(criteria);
    if report.all_failed() {
        return Err(AppError::AllChartsFailed {
            attempted: report.attempted(),
        });
    }
    Ok(Outcome::Rendered(report))
}

/// Selector choices as printed by `--list-options`.
pub fn format_options(options: &FilterOptions) -> String {
    format!(
        "Years: {}\nCountries: {}",
        options.year_choices().join(", "),
        options.country_choices().join(", ")
    )
}

/// One line per chart, as printed after a run.
pub fn format_report(report: &UpdateReport) -> String {
    let mut lines: Vec<String> = report
        .rendered
        .iter()
        .map(|name| format!("rendered {name}"))
        .collect();
    lines.extend(
        report
            .failures
            .iter()
            .map(|failure| format!("failed {}: {}", failure.renderer, failure.error)),
    );
    lines.push(format!(
        "{} records matched {}",
        report.records, report.criteria
    ));
    lines.join("\n")
}

fn warn_on_unknown_selection(options: &FilterOptions, criteria: &FilterCriteria) {
    if let Some(year) = criteria.year {
        if !options.years.contains(&year) {
            warn!(year, "Selected year does not occur in the dataset");
        }
    }
    if let Some(country) = &criteria.country {
        if !options.countries.contains(country) {
            warn!(country = %country, "Selected country does not occur in the dataset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunechart_common::test_utils::csv_fixtures::{write_temp_csv, SAMPLE_CSV};

    fn config_for(csv: &std::path::Path, out: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.dataset.path = csv.to_path_buf();
        config.output.directory = out.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_run_renders_every_enabled_chart() {
        let csv = write_temp_csv(SAMPLE_CSV);
        let out = tempfile::tempdir().unwrap();
        let mut config = config_for(csv.path(), out.path());
        config.charts[0].enabled = false;
        config.filter.year = "2023".to_string();

        let Outcome::Rendered(report) = run(&config, false).await.unwrap() else {
            panic!("expected rendered charts");
        };
        assert_eq!(report.rendered, vec!["top_tracks", "top_artists", "genre_breakdown"]);
        assert_eq!(report.records, 3);
        assert!(out.path().join("top_tracks.svg").exists());
        assert!(!out.path().join("daily_trend.svg").exists());
        assert!(format_report(&report).ends_with("3 records matched 2023"));
    }

    #[tokio::test]
    async fn test_list_options() {
        let csv = write_temp_csv(SAMPLE_CSV);
        let out = tempfile::tempdir().unwrap();
        let config = config_for(csv.path(), out.path());

        let Outcome::Options(options) = run(&config, true).await.unwrap() else {
            panic!("expected options");
        };
        assert_eq!(
            format_options(&options),
            "Years: All, 2022, 2023\nCountries: All, Brazil, Germany, United States"
        );
        assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_missing_dataset_is_fatal() {
        let out = tempfile::tempdir().unwrap();
        let config = config_for(&out.path().join("missing.csv"), out.path());
        let err = run(&config, false).await.unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[tokio::test]
    async fn test_all_charts_failing_is_an_error() {
        let csv = write_temp_csv(SAMPLE_CSV);
        let blocker = tempfile::NamedTempFile::new().unwrap();
        // The output "directory" is a regular file, so every write fails.
        let config = config_for(csv.path(), blocker.path());

        let err = run(&config, false).await.unwrap_err();
        assert!(matches!(err, AppError::AllChartsFailed { attempted: 4 }));
    }

    #[tokio::test]
    async fn test_load_config_applies_overrides_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tunechart.yaml");
        std::fs::write(&path, "filter:\n  year: \"2022\"\n").unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            country: Some("Germany".to_string()),
            ..Cli::default()
        };
        let config = load_config(&cli).await.unwrap();
        assert_eq!(config.filter.year, "2022");
        assert_eq!(config.filter.country, "Germany");

        let cli = Cli {
            config: Some(path),
            year: Some("someday".to_string()),
            ..Cli::default()
        };
        assert!(matches!(load_config(&cli).await, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_config_without_file_uses_defaults() {
        let config = load_config(&Cli::default()).await.unwrap();
        assert_eq!(config, Config::default());
    }
}
