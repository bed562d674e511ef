//! Error types and utilities for Tunechart

use thiserror::Error;

/// Result type alias for Tunechart operations
pub type Result<T> = std::result::Result<T, TunechartError>;

/// Main error type for Tunechart operations
#[derive(Error, Debug)]
pub enum TunechartError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset loading errors (unreadable file, broken CSV framing)
    #[error("Dataset error: {message}")]
    Dataset {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart aggregation and plotting errors
    #[error("Chart error: {message}")]
    Chart {
        message: String,
        chart: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or configuration values
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl TunechartError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new dataset error with source
    pub fn dataset_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Dataset {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart {
            message: msg.into(),
            chart: None,
            source: None,
        }
    }

    /// Create a new chart error attributed to a named chart
    pub fn chart_named(msg: impl Into<String>, chart: impl Into<String>) -> Self {
        Self::Chart {
            message: msg.into(),
            chart: Some(chart.into()),
            source: None,
        }
    }

    /// Create a new chart error with source
    pub fn chart_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Chart {
            message: msg.into(),
            chart: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

// Error conversion implementations for external types

/// Convert from csv::Error to TunechartError
impl From<csv::Error> for TunechartError {
    fn from(err: csv::Error) -> Self {
        let message = err.position().map_or_else(
            || "CSV parsing error".to_string(),
            |pos| format!("CSV parsing error at line {}", pos.line()),
        );
        Self::dataset_with_source(message, err)
    }
}

/// Convert from toml::de::Error to TunechartError
impl From<toml::de::Error> for TunechartError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

/// Convert from serde_yaml::Error to TunechartError
impl From<serde_yaml::Error> for TunechartError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to TunechartError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for TunechartError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::chart_with_source("Chart rendering failed", err)
    }
}
