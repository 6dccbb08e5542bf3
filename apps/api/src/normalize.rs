//! Text Normalizer: turns raw extracted document text into canonical text.
//!
//! Canonical text is a single line: whitespace runs collapse to one space and every bullet
//! marker is padded with spaces so the section rewriter can treat `•` as a delimiter.

use tracing::warn;

use crate::templates::extractor::TextExtractor;

pub const BULLET: char = '•';

/// A template document as uploaded, plus its canonical-text extraction.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub raw_bytes: Vec<u8>,
    pub canonical_text: String,
}

impl SourceDocument {
    /// Runs the extractor over `raw_bytes` and normalizes the result.
    ///
    /// Extraction is best-effort: an empty extraction yields an empty canonical text and a
    /// warning, never an error.
    pub fn extract(raw_bytes: Vec<u8>, extractor: &dyn TextExtractor) -> Self {
        let raw_text = extractor.extract(&raw_bytes);
        if raw_text.trim().is_empty() && !raw_bytes.is_empty() {
            warn!(
                "Extractor returned no text for a {} byte document; storing empty canonical text",
                raw_bytes.len()
            );
        }
        let canonical_text = normalize(&raw_text);
        Self {
            raw_bytes,
            canonical_text,
        }
    }
}

/// Normalizes raw text into canonical form. Never fails.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '\0')
        .map(|c| if c == char::REPLACEMENT_CHARACTER { BULLET } else { c })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .replace(BULLET, &format!(" {BULLET} "))
        .trim()
        .to_string()
}
