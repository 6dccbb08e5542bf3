//! Document Renderer: turns annotated plain text into paginated PDF documents.
//!
//! The standard Helvetica faces are referenced, not embedded, so layout relies on the static
//! width tables in `font_metrics`.
use std::path::PathBuf;

use thiserror::Error;

pub mod document;
pub mod font_metrics;

pub use document::{render_document, write_document};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error while encoding PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Render task failed: {0}")]
    Task(String),
}
