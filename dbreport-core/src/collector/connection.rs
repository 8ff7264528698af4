//! SQLite connection handling.
//!
//! The collector works over a single exclusive connection. It is opened
//! read-only and never creates a missing file, so a wrong path cannot leave
//! an empty database behind.

use crate::Result;
use crate::error::DbReportError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;

/// Builds connect options for a database file.
pub(crate) fn connect_options(path: &Path, read_only: bool) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .read_only(read_only)
        .create_if_missing(false)
}

/// Fails with [`DbReportError::NotFound`] unless `path` exists.
pub(crate) async fn ensure_exists(path: &Path) -> Result<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(DbReportError::not_found(path)),
        Err(e) => Err(DbReportError::io(
            format!("Failed to check {}", path.display()),
            e,
        )),
    }
}

/// Opens one connection to the database file.
pub(crate) async fn open(path: &Path, read_only: bool) -> Result<SqliteConnection> {
    let options = connect_options(path, read_only);

    SqliteConnection::connect_with(&options).await.map_err(|e| {
        DbReportError::connection_failed(format!("Failed to open {}", path.display()), e)
    })
}

/// Closes the connection, reporting a failure to shut it down cleanly.
pub(crate) async fn close(conn: SqliteConnection) -> Result<()> {
    conn.close()
        .await
        .map_err(|e| DbReportError::connection_failed("Failed to close database", e))
}
