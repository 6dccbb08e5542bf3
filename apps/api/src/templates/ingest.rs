use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{ProfileId, TemplateKind};
use crate::normalize::SourceDocument;
use crate::templates::extractor::TextExtractor;
use crate::templates::store::TemplateStore;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// One uploaded template file, as received from the client.
#[derive(Debug, Clone)]
pub struct TemplateUpload {
    pub kind: TemplateKind,
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestedTemplate {
    pub kind: TemplateKind,
    pub stored_bytes: usize,
    pub extracted_chars: usize,
}

/// Whether the file name carries an accepted extension (case-insensitive).
pub fn is_allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Validates, extracts, normalizes and stores one template for `profile`.
///
/// Extraction runs on the blocking pool. An unreadable document is still stored, with
/// empty canonical text.
pub async fn ingest_template(
    store: &TemplateStore,
    extractor: Arc<dyn TextExtractor>,
    profile: &ProfileId,
    upload: TemplateUpload,
) -> Result<IngestedTemplate, AppError> {
    if !is_allowed_file(&upload.file_name) {
        return Err(AppError::UnsupportedFileType(upload.kind));
    }

    let kind = upload.kind;
    let document =
        tokio::task::spawn_blocking(move || SourceDocument::extract(upload.bytes.to_vec(), extractor.as_ref()))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")))?;

    store.save_template(profile, kind, &document).await?;

    info!("{} uploaded and processed for profile {}", kind, profile);

    Ok(IngestedTemplate {
        kind,
        stored_bytes: document.raw_bytes.len(),
        extracted_chars: document.canonical_text.chars().count(),
    })
}
