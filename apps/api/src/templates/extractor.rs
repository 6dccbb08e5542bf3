//! Text extraction capability. The pipeline only sees the `TextExtractor` trait; the PDF
//! implementation is swapped for a stub in tests.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

/// Best-effort conversion of raw document bytes into plain text.
///
/// Implementations never fail: unreadable input yields an empty string.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> String;
}

/// Extracts text from PDF documents with `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> String {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));

        match result {
            Ok(Ok(text)) => {
                debug!("Extracted {} characters from PDF", text.len());
                text
            }
            Ok(Err(e)) => {
                warn!("Error extracting text from PDF: {e}");
                String::new()
            }
            Err(_) => {
                warn!("PDF parser panicked while extracting text; treating document as empty");
                String::new()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_document;

    #[test]
    fn test_garbage_bytes_extract_to_empty_string() {
        assert_eq!(PdfTextExtractor.extract(b"definitely not a pdf"), "");
    }

    #[test]
    fn test_empty_input_extracts_to_empty_string() {
        assert_eq!(PdfTextExtractor.extract(&[]), "");
    }

    #[test]
    fn test_never_panics_on_rendered_document() {
        let bytes = render_document("SKILLS:\nRust, Go", "Resume").unwrap();
        // Whatever the parser recovers, extraction must return rather than unwind.
        let _ = PdfTextExtractor.extract(&bytes);
    }
}
