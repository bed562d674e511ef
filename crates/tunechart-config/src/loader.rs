//! Configuration file loading.

use crate::schema::Config;
use std::path::{Path, PathBuf};
use tracing::info;
use tunechart_common::{Result, TunechartError};

/// On-disk configuration formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(TunechartError::config(format!(
                "Unsupported configuration file extension: .{other}"
            ))),
        }
    }

    /// Parses configuration text. Empty input yields the defaults.
    pub fn parse(self, contents: &str) -> Result<Config> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        let config = match self {
            Self::Yaml => serde_yaml::from_str(contents)?,
            Self::Toml => toml::from_str(contents)?,
            Self::Json => serde_json::from_str(contents)?,
        };
        Ok(config)
    }
}

/// Reads a configuration file in the format its extension names.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file.
    pub async fn load(&self) -> Result<Config> {
        let format = ConfigFormat::from_path(&self.path)?;
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TunechartError::config_with_source(
                format!("Failed to read configuration file {}", self.path.display()),
                e,
            )
        })?;

        let config = format.parse(&contents)?;
        info!(path = %self.path.display(), charts = config.charts.len(), "Loaded configuration");
        Ok(config)
    }
}
