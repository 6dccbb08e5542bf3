pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::ProfileId;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;
use crate::templates::handlers as templates;

/// Upper bound for a multipart upload carrying both templates.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// `?profile=<id>` query parameter shared by the upload and tailoring routes.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub profile: Option<String>,
}

impl ProfileQuery {
    /// The requested profile, or `default` when the parameter is absent or blank.
    pub fn resolve(&self, default: &str) -> Result<ProfileId, AppError> {
        let raw = match self.profile.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => default,
        };
        Ok(ProfileId::parse(raw)?)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/check_generator", get(health::check_generator_handler))
        // Templates
        .route(
            "/upload_templates",
            post(templates::handle_upload_templates)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Tailoring
        .route("/process_job", post(tailoring::handle_process_job))
        .route("/download/:filename", get(tailoring::handle_download))
        .with_state(state)
}
