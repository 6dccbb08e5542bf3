//! Axum route handlers for template uploads.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::TemplateKind;
use crate::routes::ProfileQuery;
use crate::state::AppState;
use crate::templates::ingest::{ingest_template, IngestedTemplate, TemplateUpload};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: String,
    pub uploaded: Vec<IngestedTemplate>,
}

/// POST /upload_templates?profile=<id>
///
/// Multipart body with optional `resume` and `cover_letter` file fields. Fields with an
/// empty file name are ignored, as browsers send them for untouched file inputs.
pub async fn handle_upload_templates(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let profile = query.resolve(&state.config.default_profile)?;
    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(kind) = field.name().and_then(TemplateKind::from_slot) else {
            continue;
        };
        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {kind} upload: {e}")))?;

        let ingested = ingest_template(
            &state.store,
            state.extractor.clone(),
            &profile,
            TemplateUpload {
                kind,
                file_name,
                bytes,
            },
        )
        .await?;
        uploaded.push(ingested);
    }

    if uploaded.is_empty() {
        return Err(AppError::Validation("No valid files uploaded".to_string()));
    }

    let slots: Vec<&str> = uploaded.iter().map(|u| u.kind.slot()).collect();
    Ok(Json(UploadResponse {
        success: format!("Successfully uploaded: {}", slots.join(", ")),
        uploaded,
    }))
}
