//! End-to-end tests: fixture database → collector → Markdown renderer.
//!
//! Fixtures are real database files in a temporary directory, so no
//! external services are needed.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::{NaiveDate, NaiveDateTime};
use dbreport_core::{
    DbReportError, ReportConfig, Result, collect_schema, render::render_markdown,
};
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::path::PathBuf;
use tempfile::TempDir;

async fn create_fixture(statements: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("stocks.db");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("create fixture database");
    for statement in statements {
        sqlx::query(statement)
            .execute(&mut conn)
            .await
            .expect("apply fixture DDL");
    }
    conn.close().await.expect("close fixture database");

    (dir, path)
}

fn timestamp(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Lines of the column table belonging to the first table section.
fn column_rows(markdown: &str) -> Vec<&str> {
    markdown
        .lines()
        .skip_while(|line| *line != "#### 列结构")
        .skip(3)
        .take_while(|line| line.starts_with('|'))
        .collect()
}

#[tokio::test]
async fn test_collect_users_fixture_report() -> Result<()> {
    let (_dir, path) = create_fixture(&[
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT UNIQUE DEFAULT NULL)",
    ])
    .await;

    let schema = collect_schema(&ReportConfig::new(&path)).await?;
    let md = render_markdown(&schema, timestamp(9));

    let rows = column_rows(&md);
    assert_eq!(rows.len(), 3, "{md}");
    assert_eq!(rows[0], "| id | INTEGER | 是 | NULL | 是 |");
    assert_eq!(rows[1], "| name | TEXT | 否 | NULL | 否 |");
    assert!(rows[2].starts_with("| email | TEXT | 是 | NULL |"));

    assert!(md.contains("## 数据表\n共 1 个表"));
    assert!(md.contains("### 表: `users`"));
    assert!(!md.contains("#### 外键约束"));
    assert!(!md.contains("## 视图"));
    assert!(!md.contains("## 触发器"));
    assert!(!md.contains("## 独立索引"));
    Ok(())
}

#[tokio::test]
async fn test_collect_empty_database_report() -> Result<()> {
    let (_dir, path) = create_fixture(&[]).await;

    let schema = collect_schema(&ReportConfig::new(&path)).await?;
    let md = render_markdown(&schema, timestamp(9));

    assert!(md.contains("## 数据表\n共 0 个表\n"));
    assert!(!md.contains("### 表:"));
    assert!(!md.contains("## 视图"));
    assert!(!md.contains("## 触发器"));
    assert!(!md.contains("## 独立索引"));
    Ok(())
}

#[tokio::test]
async fn test_collect_total_size_matches_pages() -> Result<()> {
    let (_dir, path) = create_fixture(&[
        "CREATE TABLE prices (code TEXT NOT NULL, day TEXT NOT NULL, close REAL, PRIMARY KEY (code, day))",
        "INSERT INTO prices VALUES ('600000', '2024-01-02', 10.5)",
    ])
    .await;

    let schema = collect_schema(&ReportConfig::new(&path)).await?;
    let info = &schema.database_info;
    let expected = u64::from(info.page_size) * info.page_count;
    assert_eq!(info.total_size_bytes(), expected);
    assert!(info.page_count > 0);

    let md = render_markdown(&schema, timestamp(9));
    let line = format!(
        "- 总大小: {} 字节",
        dbreport_core::render::format_thousands(expected)
    );
    assert!(md.contains(&line), "{md}");

    // Composite primary key ordinals
    let prices = schema.table("prices").unwrap();
    assert_eq!(prices.columns[0].primary_key, 1);
    assert_eq!(prices.columns[1].primary_key, 2);
    assert_eq!(prices.columns[2].primary_key, 0);
    Ok(())
}

#[tokio::test]
async fn test_collect_foreign_key_report() -> Result<()> {
    let (_dir, path) = create_fixture(&[
        "CREATE TABLE portfolios (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE holdings (
            id INTEGER PRIMARY KEY,
            portfolio_id INTEGER NOT NULL REFERENCES portfolios(id) ON DELETE CASCADE,
            code TEXT NOT NULL,
            shares INTEGER DEFAULT 0
        )",
        "CREATE INDEX idx_holdings_code ON holdings(code)",
        "CREATE VIEW v_holdings AS SELECT code, shares FROM holdings",
        "CREATE TRIGGER trg_holdings_ins AFTER INSERT ON holdings BEGIN SELECT 1; END",
    ])
    .await;

    let schema = collect_schema(&ReportConfig::new(&path)).await?;
    let md = render_markdown(&schema, timestamp(9));

    assert!(md.contains("- `portfolio_id` → `portfolios.id`\n  ON DELETE: CASCADE\n"));
    assert!(!md.contains("ON UPDATE"));
    assert!(md.contains("| shares | INTEGER | 是 | 0 | 否 |"));
    assert!(md.contains("- **idx_holdings_code** (非唯一)\n  列: code"));
    assert!(md.contains("## 视图\n共 1 个视图"));
    assert!(md.contains("## 触发器\n共 1 个触发器"));
    assert!(md.contains("## 独立索引\n共 1 个独立索引"));
    assert!(md.contains("```sql\nCREATE INDEX idx_holdings_code ON holdings(code)\n```"));

    // Tables are rendered in name order
    let holdings = md.find("### 表: `holdings`").unwrap();
    let portfolios = md.find("### 表: `portfolios`").unwrap();
    assert!(holdings < portfolios);
    Ok(())
}

#[tokio::test]
async fn test_collect_twice_differs_only_in_timestamp() -> Result<()> {
    let (_dir, path) = create_fixture(&[
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE VIEW v_users AS SELECT name FROM users",
    ])
    .await;
    let config = ReportConfig::new(&path);

    let first = render_markdown(&collect_schema(&config).await?, timestamp(9));
    let second = render_markdown(&collect_schema(&config).await?, timestamp(10));
    assert_ne!(first, second);

    let strip = |md: &str| -> Vec<String> {
        md.lines()
            .filter(|line| !line.starts_with("生成时间:"))
            .map(str::to_string)
            .collect()
    };
    assert_eq!(strip(&first), strip(&second));
    Ok(())
}

#[tokio::test]
async fn test_collect_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("stocks.db");

    let err = collect_schema(&ReportConfig::new(&path)).await.unwrap_err();
    assert!(matches!(err, DbReportError::NotFound { .. }));
    assert!(err.to_string().contains(&path.display().to_string()));
}
