//! Metadata collector for SQLite database files.
//!
//! # Module Structure
//! - `connection`: opening and closing the single read-only connection
//! - `schema_collection`: catalog and PRAGMA queries, row-to-record mapping
//!
//! # Guarantees
//! - The input path is checked before any connection attempt
//! - Only `SELECT` and `PRAGMA` statements are issued
//! - The connection is closed on every exit path before `collect` returns
//! - Either the full tree is returned or an error; never a partial tree

mod connection;
mod schema_collection;


use crate::Result;
use crate::config::ReportConfig;
use crate::models::DatabaseSchema;

pub use schema_collection::EXPRESSION_COLUMN;

/// Collects the catalog of one SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteCollector {
    config: ReportConfig,
}

impl SqliteCollector {
    /// Creates a collector for the database named in `config`.
    pub const fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Configuration this collector reads from.
    pub const fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Opens the database, runs every introspection query and closes it again.
    ///
    /// # Errors
    /// - [`crate::DbReportError::NotFound`] if the database file does not exist
    /// - [`crate::DbReportError::Connection`] if it cannot be opened or closed
    /// - [`crate::DbReportError::Query`] if any introspection query fails
    pub async fn collect(&self) -> Result<DatabaseSchema> {
        self.config.validate()?;

        let path = self.config.database_path.as_path();
        connection::ensure_exists(path).await?;

        let start_time = std::time::Instant::now();
        tracing::info!("Starting SQLite schema collection for {}", path.display());

        let mut conn = connection::open(path, self.config.read_only).await?;
        let collected = schema_collection::collect_schema(&mut conn).await;
        let closed = connection::close(conn).await;

        let schema = match (collected, closed) {
            (Ok(schema), Ok(())) => schema,
            (Ok(_), Err(close_err)) => return Err(close_err),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(close_err)) => {
                tracing::warn!("{}", close_err);
                return Err(e);
            }
        };

        tracing::info!(
            "SQLite schema collection completed in {:.2}s - found {} tables, {} views, {} triggers, {} indexes",
            start_time.elapsed().as_secs_f64(),
            schema.table_count(),
            schema.view_count(),
            schema.trigger_count(),
            schema.index_count()
        );

        Ok(schema)
    }
}

/// Collects the catalog of the database named in `config`.
///
/// Shorthand for `SqliteCollector::new(config.clone()).collect()`.
///
/// # Errors
/// See [`SqliteCollector::collect`].
pub async fn collect_schema(config: &ReportConfig) -> Result<DatabaseSchema> {
    SqliteCollector::new(config.clone()).collect().await
}
