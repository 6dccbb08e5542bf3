//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::routes::ProfileQuery;
use crate::state::AppState;
use crate::tailoring::keywords::terms;
use crate::tailoring::pipeline::TailorRequest;
use crate::templates::store::is_safe_artifact_name;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProcessJobResponse {
    pub success: String,
    pub keywords: Vec<String>,
    pub resume_pdf: String,
    pub cover_pdf: String,
    pub zip_file: String,
    pub cover_letter_degraded: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /process_job?profile=<id>
///
/// Runs the full tailoring pipeline. Artifact names in the response are bare file names for
/// `GET /download/:filename`.
pub async fn handle_process_job(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<ProcessJobResponse>, AppError> {
    let profile = query.resolve(&state.config.default_profile)?;
    let outcome = state.pipeline.run(&profile, request).await?;

    Ok(Json(ProcessJobResponse {
        success: "Documents generated successfully".to_string(),
        keywords: terms(&outcome.keywords),
        resume_pdf: outcome.resume_pdf,
        cover_pdf: outcome.cover_pdf,
        zip_file: outcome.archive,
        cover_letter_degraded: outcome.cover_letter_degraded,
    }))
}

/// GET /download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if !is_safe_artifact_name(&filename) {
        return Err(AppError::Validation(format!(
            "Invalid file name: {filename}"
        )));
    }

    let bytes = state
        .store
        .read_artifact(&filename)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File not found: {filename}")))?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "pdf" => "application/pdf",
        Some(ext) if ext == "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
