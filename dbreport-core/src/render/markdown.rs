//! Markdown report renderer.
//!
//! Section order is fixed: title, database summary, tables, then views,
//! triggers and standalone indexes. The last three are left out entirely
//! when empty; the tables section always appears, even with a zero count.

use crate::models::{Column, DatabaseInfo, DatabaseSchema, ForeignKey, Index, Table};
use chrono::NaiveDateTime;

/// Report title line.
pub const TITLE: &str = "# SQLite 数据库元数据报告";

/// Format of the generation timestamp line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder for columns without a default value.
pub const NULL_DEFAULT: &str = "NULL";

const YES: &str = "是";
const NO: &str = "否";

/// Renders the schema as a Markdown document.
///
/// The output depends only on `schema` and `generated_at`; rendering the
/// same pair twice yields identical text.
pub fn render_markdown(schema: &DatabaseSchema, generated_at: NaiveDateTime) -> String {
    let mut doc = Document::default();

    doc.line(TITLE);
    doc.line(format!("生成时间: {}", generated_at.format(TIMESTAMP_FORMAT)));
    doc.blank();

    render_database_info(&mut doc, &schema.database_info);

    doc.line("## 数据表");
    doc.line(format!("共 {} 个表", schema.tables.len()));
    doc.blank();
    for table in &schema.tables {
        render_table(&mut doc, table);
    }

    if !schema.views.is_empty() {
        doc.line("## 视图");
        doc.line(format!("共 {} 个视图", schema.views.len()));
        doc.blank();
        for view in &schema.views {
            doc.line(format!("### 视图: `{}`", view.name));
            doc.sql_block(view.sql.as_deref().unwrap_or_default());
            doc.blank();
        }
    }

    if !schema.triggers.is_empty() {
        doc.line("## 触发器");
        doc.line(format!("共 {} 个触发器", schema.triggers.len()));
        doc.blank();
        for trigger in &schema.triggers {
            doc.line(format!("### 触发器: `{}`", trigger.name));
            doc.sql_block(trigger.sql.as_deref().unwrap_or_default());
            doc.blank();
        }
    }

    if !schema.indexes.is_empty() {
        doc.line("## 独立索引");
        doc.line(format!("共 {} 个独立索引", schema.indexes.len()));
        doc.blank();
        for index in &schema.indexes {
            doc.line(format!("### 索引: `{}`", index.name));
            if let Some(sql) = index.sql.as_deref().filter(|s| !s.is_empty()) {
                doc.sql_block(sql);
            }
            doc.blank();
        }
    }

    doc.finish()
}

fn render_database_info(doc: &mut Document, info: &DatabaseInfo) {
    doc.line("## 数据库基本信息");
    doc.line(format!("- SQLite 版本: {}", info.version));
    doc.line(format!("- 页面大小: {} 字节", info.page_size));
    doc.line(format!("- 页面数量: {}", info.page_count));
    doc.line(format!(
        "- 总大小: {} 字节",
        format_thousands(info.total_size_bytes())
    ));
    doc.line(format!("- 编码: {}", info.encoding));
    doc.blank();
}

fn render_table(doc: &mut Document, table: &Table) {
    doc.line(format!("### 表: `{}`", table.name));
    doc.blank();

    if let Some(sql) = table.sql.as_deref().filter(|s| !s.is_empty()) {
        doc.sql_block(sql);
        doc.blank();
    }

    doc.line("#### 列结构");
    doc.line("| 列名 | 类型 | 是否可为空 | 默认值 | 主键 |");
    doc.line("|------|------|------------|--------|------|");
    for column in &table.columns {
        doc.line(column_row(column));
    }
    doc.blank();

    if !table.indexes.is_empty() {
        doc.line("#### 索引");
        for index in &table.indexes {
            render_index(doc, index);
        }
        doc.blank();
    }

    if !table.foreign_keys.is_empty() {
        doc.line("#### 外键约束");
        for foreign_key in &table.foreign_keys {
            render_foreign_key(doc, foreign_key);
        }
        doc.blank();
    }

    doc.line("---");
    doc.blank();
}

/// Renders one row of the column table.
pub fn column_row(column: &Column) -> String {
    format!(
        "| {} | {} | {} | {} | {} |",
        column.name,
        column.data_type,
        yes_no(column.is_nullable()),
        column.default_value.as_deref().unwrap_or(NULL_DEFAULT),
        yes_no(column.is_primary_key()),
    )
}

fn render_index(doc: &mut Document, index: &Index) {
    let unique = if index.unique { "唯一" } else { "非唯一" };
    doc.line(format!("- **{}** ({unique})", index.name));
    if !index.columns.is_empty() {
        doc.line(format!("  列: {}", index.columns.join(", ")));
    }
}

fn render_foreign_key(doc: &mut Document, foreign_key: &ForeignKey) {
    let target = match &foreign_key.to {
        Some(to) => format!("{}.{to}", foreign_key.table),
        None => foreign_key.table.clone(),
    };
    doc.line(format!("- `{}` → `{target}`", foreign_key.from));

    if !foreign_key.on_update.is_default() {
        doc.line(format!("  ON UPDATE: {}", foreign_key.on_update));
    }
    if !foreign_key.on_delete.is_default() {
        doc.line(format!("  ON DELETE: {}", foreign_key.on_delete));
    }
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { YES } else { NO }
}

/// Formats an integer with comma thousands separators.
///
/// ```rust
/// use dbreport_core::render::format_thousands;
///
/// assert_eq!(format_thousands(0), "0");
/// assert_eq!(format_thousands(1_234_567), "1,234,567");
/// ```
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3));

    for (i, ch) in digits.chars().enumerate() {
        let remaining = digits.len().saturating_sub(i);
        if i > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Line buffer joined with `\n` at the end.
#[derive(Default)]
struct Document {
    lines: Vec<String>,
}

impl Document {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn sql_block(&mut self, sql: &str) {
        self.line("```sql");
        self.line(sql);
        self.line("```");
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}
