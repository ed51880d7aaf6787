//! Citations tying extracted values back to their source text.
//!
//! Every extracted KPI carries a [`Citation`]: the document it came from,
//! the page, a short preview of the surrounding text, and the match span
//! remapped into that preview. Citations are immutable once built and are
//! owned by the extraction result that created them.

use serde::{Deserialize, Serialize};

/// Default number of context characters included around a match in the
/// preview (half before, half after).
pub const DEFAULT_CONTEXT_CHARS: usize = 100;

/// Provenance record for an extracted KPI value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Identifier of the source document (typically the file name)
    pub doc_id: String,

    /// 1-indexed page number within the document
    pub page: u32,

    /// Match span in `text_preview` coordinates, start inclusive, end
    /// exclusive; always within `0..=text_preview.len()`
    pub span: (usize, usize),

    /// Whitespace-trimmed excerpt of the text surrounding the match
    pub text_preview: String,
}

impl Citation {
    /// Build a citation from a match against the full document text, using
    /// the default context window.
    ///
    /// `start` and `end` are byte offsets into `text` (end exclusive), as
    /// produced by a regex match.
    pub fn from_match(doc_id: &str, page: u32, text: &str, start: usize, end: usize) -> Self {
        Self::from_match_with_context(doc_id, page, text, start, end, DEFAULT_CONTEXT_CHARS)
    }

    /// Build a citation with an explicit context window size.
    ///
    /// The preview covers `context_chars / 2` bytes on each side of the
    /// match, clamped to the document and widened to UTF-8 character
    /// boundaries. The span is remapped so it stays inside the trimmed
    /// preview even when leading whitespace is dropped.
    pub fn from_match_with_context(
        doc_id: &str,
        page: u32,
        text: &str,
        start: usize,
        end: usize,
        context_chars: usize,
    ) -> Self {
        let start = start.min(text.len());
        let end = end.clamp(start, text.len());
        let half = context_chars / 2;

        let mut window_start = start.saturating_sub(half);
        let mut window_end = (end + half).min(text.len());
        // Widen to character boundaries rather than splitting a code point.
        while !text.is_char_boundary(window_start) {
            window_start -= 1;
        }
        while !text.is_char_boundary(window_end) {
            window_end += 1;
        }

        let window = &text[window_start..window_end];
        let trimmed = window.trim();
        let left_trim = window.len() - window.trim_start().len();
        let preview_start = window_start + left_trim;

        let span_start = start.saturating_sub(preview_start).min(trimmed.len());
        let span_end = end
            .saturating_sub(preview_start)
            .clamp(span_start, trimmed.len());

        Self {
            doc_id: doc_id.to_string(),
            page,
            span: (span_start, span_end),
            text_preview: trimmed.to_string(),
        }
    }

    /// The matched text within the preview.
    pub fn matched_text(&self) -> &str {
        &self.text_preview[self.span.0..self.span.1]
    }
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let head: String = self.text_preview.chars().take(50).collect();
        write!(f, "{} (p.{}): {}...", self.doc_id, self.page, head)
    }
}
