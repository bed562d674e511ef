//! Main entry point for Tunechart.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tunechart::{format_options, format_report, init_app_logging, load_config, run, Cli, Outcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).await?;
    init_app_logging(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        charts = config.enabled_charts().count(),
        "Starting Tunechart"
    );

    match run(&config, cli.list_options).await {
        Ok(Outcome::Options(options)) => println!("{}", format_options(&options)),
        Ok(Outcome::Rendered(report)) => {
            println!("{}", format_report(&report));
            info!(
                output = %config.output.directory.display(),
                rendered = report.rendered.len(),
                failed = report.failures.len(),
                "Finished"
            );
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            return Err(e).context("tunechart run failed");
        }
    }

    Ok(())
}
