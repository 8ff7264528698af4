//! Core library for dbreport.
//!
//! Collects the catalog of a SQLite database file and renders it as a
//! Markdown report.
//!
//! # Architecture
//! - [`collector`]: opens the file read-only over one connection, runs the
//!   introspection queries and builds a [`DatabaseSchema`]
//! - [`render`]: turns a [`DatabaseSchema`] into report text
//! - [`config`], [`error`], [`logging`]: ambient plumbing shared with the binary
//!
//! # Example
//! ```rust,no_run
//! use dbreport_core::{ReportConfig, collect_schema, render::render_markdown};
//!
//! # async fn run() -> dbreport_core::Result<()> {
//! let config = ReportConfig::new("data/stocks.db");
//! let schema = collect_schema(&config).await?;
//! let markdown = render_markdown(&schema, chrono::Local::now().naive_local());
//! # let _ = markdown;
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;

// Re-export commonly used types
pub use collector::{SqliteCollector, collect_schema};
pub use config::{OutputFormat, ReportConfig};
pub use error::{DbReportError, Result};
pub use logging::init_logging;
pub use models::{
    AttachedDatabase, Column, DatabaseInfo, DatabaseSchema, ForeignKey, Index, IndexOrigin,
    ReferentialAction, SchemaSummary, StandaloneIndex, Table, Trigger, View,
};
