//! Error types for catalog collection and report generation.
//!
//! Every failure a run can hit collapses into [`DbReportError`]. The binary
//! prints the message and exits with status 1 regardless of the variant, so
//! the variant text is the only thing that tells the failures apart.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for dbreport operations.
#[derive(Debug, Error)]
pub enum DbReportError {
    /// The database file does not exist
    #[error("数据库文件不存在: {}", path.display())]
    NotFound { path: PathBuf },

    /// Opening or closing the database failed
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// An introspection query failed or returned a row that could not be decoded
    #[error("Query execution failed: {context}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with DbReportError
pub type Result<T> = std::result::Result<T, DbReportError>;

impl DbReportError {
    /// Creates a not-found error for the given database path
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a connection error with context
    pub fn connection_failed(context: impl Into<String>, error: sqlx::Error) -> Self {
        Self::Connection {
            context: context.into(),
            source: error,
        }
    }

    /// Creates a query error naming the failing query
    pub fn query_failed(context: impl Into<String>, error: sqlx::Error) -> Self {
        Self::Query {
            context: context.into(),
            source: error,
        }
    }

    /// Creates a parsing error for a column of a catalog row.
    ///
    /// # Arguments
    /// * `field_name` - Name of the result column being decoded
    /// * `query` - The query the row came from
    /// * `error` - The underlying decode error
    pub fn parse_field(field_name: &str, query: &str, error: sqlx::Error) -> Self {
        Self::Query {
            context: format!("Failed to parse field '{field_name}' from result of {query}"),
            source: error,
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, error: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_contains_path() {
        let error = DbReportError::not_found("data/missing.db");
        let message = error.to_string();
        assert!(message.contains("data/missing.db"));
        assert!(message.starts_with("数据库文件不存在"));
    }

    #[test]
    fn test_query_error_carries_context() {
        let error = DbReportError::query_failed("PRAGMA table_info('users')", sqlx::Error::RowNotFound);
        let message = error.to_string();
        assert!(message.contains("PRAGMA table_info('users')"));
        assert!(matches!(error, DbReportError::Query { .. }));
    }

    #[test]
    fn test_parse_field_is_query_error() {
        let error = DbReportError::parse_field("name", "PRAGMA encoding", sqlx::Error::RowNotFound);
        assert!(matches!(error, DbReportError::Query { .. }));
        assert!(error.to_string().contains("'name'"));
    }

    #[test]
    fn test_error_creation() {
        let error = DbReportError::configuration("database path cannot be empty");
        assert!(error.to_string().contains("database path cannot be empty"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = DbReportError::io("Failed to write to db.md", io);
        assert!(error.to_string().contains("db.md"));
    }
}
