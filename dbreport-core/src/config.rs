//! Report configuration.
//!
//! [`ReportConfig`] carries the input database path and the output file
//! path into the collector and the writer. The defaults are the paths the
//! tool has always used (`data/stocks.db` → `db.md`), so a bare invocation
//! behaves as before while tests and callers can point it elsewhere.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/stocks.db";

/// Default report file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "db.md";

/// Report output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown documentation
    #[default]
    Markdown,
    /// The collected tree as pretty-printed JSON
    Json,
}

impl OutputFormat {
    /// File extension conventionally used for this format
    pub const fn default_extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for a single report run.
///
/// # Example
/// ```rust
/// use dbreport_core::config::{OutputFormat, ReportConfig};
///
/// let config = ReportConfig::default()
///     .with_database_path("fixtures/app.db")
///     .with_output_path("app.md")
///     .with_format(OutputFormat::Markdown);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// SQLite database file to inspect
    pub database_path: PathBuf,
    /// File the rendered report is written to
    pub output_path: PathBuf,
    /// Rendering format
    pub format: OutputFormat,
    /// Open the database read-only
    pub read_only: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            format: OutputFormat::default(),
            read_only: true,
        }
    }
}

impl ReportConfig {
    /// Creates a config for the given database, keeping the other defaults.
    pub fn new(database_path: impl AsRef<Path>) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Builder method to set the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = path.as_ref().to_path_buf();
        self
    }

    /// Builder method to set the output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Builder method to set the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Validates configuration parameters.
    ///
    /// # Errors
    /// Returns error if either path is empty
    pub fn validate(&self) -> crate::Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(crate::error::DbReportError::configuration(
                "database path cannot be empty",
            ));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(crate::error::DbReportError::configuration(
                "output path cannot be empty",
            ));
        }

        Ok(())
    }
}
