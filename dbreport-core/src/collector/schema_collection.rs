//! SQLite catalog collection.
//!
//! Issues the fixed sequence of introspection queries and converts each
//! result row into its typed record as soon as the query returns.
//!
//! # Sources
//! - `sqlite_version()` and `PRAGMA page_size / page_count / encoding / database_list`
//! - `sqlite_master`: tables, views, triggers and standalone indexes
//! - `PRAGMA table_info()`: columns of a table
//! - `PRAGMA index_list()` / `PRAGMA index_info()`: indexes and their columns
//! - `PRAGMA foreign_key_list()`: foreign keys of a table

use crate::Result;
use crate::error::DbReportError;
use crate::models::*;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqliteRow};
use sqlx::{Decode, Row, Type};

const TABLES_QUERY: &str = "SELECT name, sql FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

const VIEWS_QUERY: &str = "SELECT name, sql FROM sqlite_master \
     WHERE type = 'view' ORDER BY name";

const TRIGGERS_QUERY: &str = "SELECT name, tbl_name, sql FROM sqlite_master \
     WHERE type = 'trigger' ORDER BY name";

const INDEXES_QUERY: &str = "SELECT name, tbl_name, sql FROM sqlite_master \
     WHERE type = 'index' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// Placeholder for index terms that are expressions rather than columns.
pub const EXPRESSION_COLUMN: &str = "<expr>";

/// Collects the whole catalog over an open connection.
pub(crate) async fn collect_schema(conn: &mut SqliteConnection) -> Result<DatabaseSchema> {
    tracing::debug!("Collecting database information");
    let database_info = collect_database_info(conn).await?;

    tracing::debug!("Enumerating database tables");
    let tables = collect_tables(conn).await?;
    let views = collect_views(conn).await?;
    let triggers = collect_triggers(conn).await?;
    let indexes = collect_standalone_indexes(conn).await?;

    Ok(DatabaseSchema {
        database_info,
        tables,
        views,
        triggers,
        indexes,
    })
}

/// Runs a catalog query and returns its rows.
async fn fetch_rows(conn: &mut SqliteConnection, query: &str) -> Result<Vec<SqliteRow>> {
    tracing::trace!("{}", query);
    sqlx::query(query)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbReportError::query_failed(query, e))
}

/// Runs a single-value query such as `PRAGMA page_size`.
async fn fetch_scalar<T>(conn: &mut SqliteConnection, query: &str) -> Result<T>
where
    T: for<'r> Decode<'r, Sqlite> + Type<Sqlite> + Send + Unpin,
{
    tracing::trace!("{}", query);
    sqlx::query_scalar::<_, T>(query)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| DbReportError::query_failed(query, e))
}

/// Decodes one field of a catalog row.
fn field<'r, T>(row: &'r SqliteRow, name: &str, query: &str) -> Result<T>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| DbReportError::parse_field(name, query, e))
}

/// Decodes an integer field into a narrower unsigned type.
fn unsigned_field<T>(row: &SqliteRow, name: &str, query: &str) -> Result<T>
where
    T: TryFrom<i64>,
    <T as TryFrom<i64>>::Error: std::error::Error + Send + Sync + 'static,
{
    let value: i64 = field(row, name, query)?;
    T::try_from(value)
        .map_err(|e| DbReportError::parse_field(name, query, sqlx::Error::Decode(Box::new(e))))
}

/// Quotes an identifier for use inside a PRAGMA argument.
fn quote_literal(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Collects version and page-level facts.
async fn collect_database_info(conn: &mut SqliteConnection) -> Result<DatabaseInfo> {
    let version: String = fetch_scalar(conn, "SELECT sqlite_version()").await?;

    let query = "PRAGMA database_list";
    let databases = fetch_rows(conn, query)
        .await?
        .iter()
        .map(|row| attached_database_from_row(row, query))
        .collect::<Result<Vec<_>>>()?;

    let page_size: i64 = fetch_scalar(conn, "PRAGMA page_size").await?;
    let page_count: i64 = fetch_scalar(conn, "PRAGMA page_count").await?;
    let encoding: String = fetch_scalar(conn, "PRAGMA encoding").await?;

    let page_size = u32::try_from(page_size).map_err(|e| {
        DbReportError::parse_field("page_size", "PRAGMA page_size", sqlx::Error::Decode(Box::new(e)))
    })?;
    let page_count = u64::try_from(page_count).map_err(|e| {
        DbReportError::parse_field(
            "page_count",
            "PRAGMA page_count",
            sqlx::Error::Decode(Box::new(e)),
        )
    })?;

    Ok(DatabaseInfo {
        version,
        page_size,
        page_count,
        encoding,
        databases,
    })
}

fn attached_database_from_row(row: &SqliteRow, query: &str) -> Result<AttachedDatabase> {
    let file: Option<String> = field(row, "file", query)?;

    Ok(AttachedDatabase {
        seq: field(row, "seq", query)?,
        name: field(row, "name", query)?,
        // In-memory and temp databases report an empty file name
        file: file.filter(|f| !f.is_empty()),
    })
}

/// Collects all user tables with columns, indexes and foreign keys.
async fn collect_tables(conn: &mut SqliteConnection) -> Result<Vec<Table>> {
    let table_rows = fetch_rows(conn, TABLES_QUERY).await?;

    let mut tables = Vec::with_capacity(table_rows.len());

    for row in &table_rows {
        let name: String = field(row, "name", TABLES_QUERY)?;
        let sql: Option<String> = field(row, "sql", TABLES_QUERY)?;

        let columns = collect_table_columns(conn, &name).await?;
        let indexes = collect_table_indexes(conn, &name).await?;
        let foreign_keys = collect_table_foreign_keys(conn, &name).await?;

        tracing::debug!(
            "Collected table '{}' with {} columns, {} indexes, {} foreign keys",
            name,
            columns.len(),
            indexes.len(),
            foreign_keys.len()
        );

        tables.push(Table {
            name,
            sql,
            columns,
            indexes,
            foreign_keys,
        });
    }

    Ok(tables)
}

/// Collects column metadata for a specific table.
async fn collect_table_columns(conn: &mut SqliteConnection, table_name: &str) -> Result<Vec<Column>> {
    let query = format!("PRAGMA table_info({})", quote_literal(table_name));

    fetch_rows(conn, &query)
        .await?
        .iter()
        .map(|row| column_from_row(row, &query))
        .collect()
}

fn column_from_row(row: &SqliteRow, query: &str) -> Result<Column> {
    let not_null: i64 = field(row, "notnull", query)?;

    Ok(Column {
        cid: field(row, "cid", query)?,
        name: field(row, "name", query)?,
        data_type: field(row, "type", query)?,
        not_null: not_null != 0,
        default_value: field(row, "dflt_value", query)?,
        primary_key: unsigned_field(row, "pk", query)?,
    })
}

/// Collects indexes for a table, resolving each to its columns.
async fn collect_table_indexes(conn: &mut SqliteConnection, table_name: &str) -> Result<Vec<Index>> {
    let query = format!("PRAGMA index_list({})", quote_literal(table_name));
    let index_rows = fetch_rows(conn, &query).await?;

    let mut indexes = Vec::with_capacity(index_rows.len());

    for row in &index_rows {
        let name: String = field(row, "name", &query)?;
        let unique: i64 = field(row, "unique", &query)?;
        let origin: String = field(row, "origin", &query)?;
        let partial: i64 = field(row, "partial", &query)?;

        let columns = collect_index_columns(conn, &name).await?;

        indexes.push(Index {
            name,
            unique: unique != 0,
            origin: IndexOrigin::from_tag(&origin),
            partial: partial != 0,
            columns,
        });
    }

    Ok(indexes)
}

/// Collects the column names of an index in key order.
async fn collect_index_columns(conn: &mut SqliteConnection, index_name: &str) -> Result<Vec<String>> {
    let query = format!("PRAGMA index_info({})", quote_literal(index_name));

    fetch_rows(conn, &query)
        .await?
        .iter()
        .map(|row| -> Result<String> {
            let name: Option<String> = field(row, "name", &query)?;
            Ok(name.unwrap_or_else(|| EXPRESSION_COLUMN.to_string()))
        })
        .collect()
}

/// Collects foreign keys for a table, one record per referencing column.
async fn collect_table_foreign_keys(
    conn: &mut SqliteConnection,
    table_name: &str,
) -> Result<Vec<ForeignKey>> {
    let query = format!("PRAGMA foreign_key_list({})", quote_literal(table_name));

    fetch_rows(conn, &query)
        .await?
        .iter()
        .map(|row| foreign_key_from_row(row, &query))
        .collect()
}

fn foreign_key_from_row(row: &SqliteRow, query: &str) -> Result<ForeignKey> {
    let on_update: String = field(row, "on_update", query)?;
    let on_delete: String = field(row, "on_delete", query)?;

    Ok(ForeignKey {
        id: field(row, "id", query)?,
        seq: field(row, "seq", query)?,
        table: field(row, "table", query)?,
        from: field(row, "from", query)?,
        to: field(row, "to", query)?,
        on_update: ReferentialAction::parse(&on_update),
        on_delete: ReferentialAction::parse(&on_delete),
        match_type: field(row, "match", query)?,
    })
}

/// Collects views from the catalog.
async fn collect_views(conn: &mut SqliteConnection) -> Result<Vec<View>> {
    fetch_rows(conn, VIEWS_QUERY)
        .await?
        .iter()
        .map(|row| -> Result<View> {
            Ok(View {
                name: field(row, "name", VIEWS_QUERY)?,
                sql: field(row, "sql", VIEWS_QUERY)?,
            })
        })
        .collect()
}

/// Collects triggers from the catalog.
async fn collect_triggers(conn: &mut SqliteConnection) -> Result<Vec<Trigger>> {
    fetch_rows(conn, TRIGGERS_QUERY)
        .await?
        .iter()
        .map(|row| -> Result<Trigger> {
            Ok(Trigger {
                name: field(row, "name", TRIGGERS_QUERY)?,
                table_name: field(row, "tbl_name", TRIGGERS_QUERY)?,
                sql: field(row, "sql", TRIGGERS_QUERY)?,
            })
        })
        .collect()
}

/// Collects indexes that have their own catalog entry.
async fn collect_standalone_indexes(conn: &mut SqliteConnection) -> Result<Vec<StandaloneIndex>> {
    fetch_rows(conn, INDEXES_QUERY)
        .await?
        .iter()
        .map(|row| -> Result<StandaloneIndex> {
            Ok(StandaloneIndex {
                name: field(row, "name", INDEXES_QUERY)?,
                table_name: field(row, "tbl_name", INDEXES_QUERY)?,
                sql: field(row, "sql", INDEXES_QUERY)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal_escapes_single_quotes() {
        assert_eq!(quote_literal("users"), "'users'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_catalog_queries_sort_by_name() {
        for query in [TABLES_QUERY, VIEWS_QUERY, TRIGGERS_QUERY, INDEXES_QUERY] {
            assert!(query.ends_with("ORDER BY name"), "{query}");
        }
        assert!(TABLES_QUERY.contains("NOT LIKE 'sqlite_%'"));
        assert!(INDEXES_QUERY.contains("NOT LIKE 'sqlite_%'"));
    }
}
