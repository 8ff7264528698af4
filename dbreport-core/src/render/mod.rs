//! Report rendering.
//!
//! Renderers are pure: they take the collected tree and return one text
//! blob. Writing it anywhere is the caller's job.

mod markdown;

pub use markdown::{NULL_DEFAULT, TIMESTAMP_FORMAT, TITLE, column_row, format_thousands, render_markdown};

use crate::Result;
use crate::config::OutputFormat;
use crate::error::DbReportError;
use crate::models::DatabaseSchema;
use chrono::NaiveDateTime;

/// Renders the collected tree as pretty-printed JSON.
///
/// # Errors
/// Returns a serialization error if the tree cannot be encoded.
pub fn render_json(schema: &DatabaseSchema) -> Result<String> {
    serde_json::to_string_pretty(schema).map_err(|e| DbReportError::Serialization {
        context: "JSON rendering".to_string(),
        source: e,
    })
}

/// Renders the tree in the requested format.
///
/// `generated_at` is only used by formats that embed a timestamp.
///
/// # Errors
/// Propagates serialization failures from [`render_json`].
pub fn render(
    schema: &DatabaseSchema,
    format: OutputFormat,
    generated_at: NaiveDateTime,
) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(schema, generated_at)),
        OutputFormat::Json => render_json(schema),
    }
}
