//! Document-reading boundary.

use crate::error::{ExtractError, Result};
use std::path::Path;

/// Read the text content of a filing document.
///
/// Plain-text and HTML files are read as-is; HTML is passed through
/// unstripped since the extraction patterns operate on raw text. Any
/// other extension (including PDF, which requires an external converter)
/// fails with [`ExtractError::UnsupportedFormat`].
pub fn read_document(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "text" | "html" | "htm" => Ok(std::fs::read_to_string(path)?),
        other => Err(ExtractError::UnsupportedFormat(format!(
            "{} ({})",
            path.display(),
            if other.is_empty() {
                "no extension"
            } else {
                other
            }
        ))),
    }
}
