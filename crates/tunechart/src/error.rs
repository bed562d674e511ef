//! Application-wide error types using thiserror.

use tunechart_common::TunechartError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The configuration could not be read or is invalid.
    #[error("invalid configuration")]
    Config(#[source] TunechartError),

    /// The dataset could not be read or parsed.
    #[error("failed to load dataset")]
    Dataset(#[source] TunechartError),

    /// Logging could not be initialized.
    #[error("failed to initialize logging")]
    Logging(#[source] TunechartError),

    /// Every registered chart returned an error.
    #[error("all {attempted} charts failed to render")]
    AllChartsFailed {
        /// Number of charts attempted.
        attempted: usize,
    },
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
