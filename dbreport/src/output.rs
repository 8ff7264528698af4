//! Report file output.

use dbreport_core::{DbReportError, Result};
use std::path::Path;

/// Writes the rendered report, replacing any existing file.
///
/// Called only once the full text exists, so a failed run never leaves a
/// half-written report behind.
pub(crate) async fn save_report(contents: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, contents.as_bytes())
        .await
        .map_err(|e| DbReportError::io(format!("Failed to write to {}", output_path.display()), e))?;

    tracing::info!(
        "Wrote {} bytes to {}",
        contents.len(),
        output_path.display()
    );
    Ok(())
}
