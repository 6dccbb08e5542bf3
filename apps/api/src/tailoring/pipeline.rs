//! Tailoring Orchestrator: one sequential pass from stored templates to downloadable artifacts.
//!
//! ```text
//! LoadTemplates → RankKeywords → RewriteResume → GenerateCoverLetter → RenderBoth → Bundle → Done
//! ```
//!
//! Every stage may fail into an `AppError`, except cover-letter generation, which degrades to a
//! placeholder body. CPU-bound stages run on the blocking pool.

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::{ProfileId, TemplateKind};
use crate::render::{write_document, RenderError};
use crate::tailoring::bundle::write_archive;
use crate::tailoring::keywords::{rank_keywords, terms, Keyword};
use crate::tailoring::prompts::build_cover_letter_prompt;
use crate::tailoring::sections::rewrite_resume;
use crate::templates::store::TemplateStore;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    LoadTemplates,
    RankKeywords,
    RewriteResume,
    GenerateCoverLetter,
    RenderBoth,
    Bundle,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::LoadTemplates => "load_templates",
            PipelineStage::RankKeywords => "rank_keywords",
            PipelineStage::RewriteResume => "rewrite_resume",
            PipelineStage::GenerateCoverLetter => "generate_cover_letter",
            PipelineStage::RenderBoth => "render_both",
            PipelineStage::Bundle => "bundle",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TailorRequest {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_description: String,
}

impl TailorRequest {
    /// Trims every field and rejects the request if any is empty.
    pub fn validate(self) -> Result<Self, AppError> {
        let request = Self {
            job_title: self.job_title.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
            job_description: self.job_description.trim().to_string(),
        };

        for (field, value) in [
            ("job_title", &request.job_title),
            ("company_name", &request.company_name),
            ("job_description", &request.job_description),
        ] {
            if value.is_empty() {
                return Err(AppError::Validation(format!(
                    "{field} is required (job_title, company_name and job_description must all be provided)"
                )));
            }
        }
        Ok(request)
    }
}

/// The two texts handed to the renderer.
#[derive(Debug, Clone)]
pub struct TailoredOutput {
    pub resume_text: String,
    pub cover_letter_text: String,
}

/// File names of the artifacts of one run, all directly under the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub resume_pdf: String,
    pub cover_pdf: String,
    pub archive: String,
}

impl ArtifactNames {
    pub fn new(stamp: &str) -> Self {
        Self {
            resume_pdf: format!("tailored_resume_{stamp}.pdf"),
            cover_pdf: format!("tailored_cover_{stamp}.pdf"),
            archive: format!("job_package_{stamp}.zip"),
        }
    }
}

/// Local time to the second plus a short random suffix.
fn artifact_stamp() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S"), &suffix[..8])
}

#[derive(Debug, Clone, Serialize)]
pub struct TailoringOutcome {
    pub keywords: Vec<Keyword>,
    pub resume_pdf: String,
    pub cover_pdf: String,
    pub archive: String,
    /// The cover letter body is a generator error message, not generated prose.
    pub cover_letter_degraded: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TailoringPipeline {
    store: TemplateStore,
    generator: Arc<dyn TextGenerator>,
    top_k: usize,
}

impl TailoringPipeline {
    pub fn new(store: TemplateStore, generator: Arc<dyn TextGenerator>, top_k: usize) -> Self {
        Self {
            store,
            generator,
            top_k,
        }
    }

    pub async fn run(
        &self,
        profile: &ProfileId,
        request: TailorRequest,
    ) -> Result<TailoringOutcome, AppError> {
        let request = request.validate()?;

        enter(PipelineStage::LoadTemplates, profile);
        let resume_text = self
            .load(profile, TemplateKind::Resume)
            .await
            .map_err(|e| failed(PipelineStage::LoadTemplates, e))?;
        let cover_template = self
            .load(profile, TemplateKind::CoverLetter)
            .await
            .map_err(|e| failed(PipelineStage::LoadTemplates, e))?;

        enter(PipelineStage::RankKeywords, profile);
        let keywords = rank_keywords(&request.job_description, self.top_k);
        info!("Extracted keywords: {:?}", terms(&keywords));

        enter(PipelineStage::RewriteResume, profile);
        let tailored_resume = rewrite_resume(
            &resume_text,
            &keywords,
            &request.job_title,
            &request.company_name,
        );

        enter(PipelineStage::GenerateCoverLetter, profile);
        let prompt = build_cover_letter_prompt(
            &resume_text,
            &cover_template,
            &request.job_title,
            &request.company_name,
            &request.job_description,
        );
        let (cover_letter_text, cover_letter_degraded) = self.generate_cover_letter(&prompt).await;

        let output = TailoredOutput {
            resume_text: tailored_resume,
            cover_letter_text,
        };
        let names = ArtifactNames::new(&artifact_stamp());

        enter(PipelineStage::RenderBoth, profile);
        self.render_both(output, &request.job_title, &names)
            .await
            .map_err(|e| failed(PipelineStage::RenderBoth, e))?;

        enter(PipelineStage::Bundle, profile);
        self.bundle(&names)
            .await
            .map_err(|e| failed(PipelineStage::Bundle, e))?;

        enter(PipelineStage::Done, profile);
        Ok(TailoringOutcome {
            keywords,
            resume_pdf: names.resume_pdf,
            cover_pdf: names.cover_pdf,
            archive: names.archive,
            cover_letter_degraded,
        })
    }

    async fn load(&self, profile: &ProfileId, kind: TemplateKind) -> Result<String, AppError> {
        self.store
            .load_template_text(profile, kind)
            .await?
            .ok_or(AppError::MissingTemplate(kind))
    }

    /// Returns the cover letter body and whether it is a degraded placeholder.
    async fn generate_cover_letter(&self, prompt: &str) -> (String, bool) {
        match self.generator.generate(prompt).await {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("Cover letter generation failed, using placeholder: {e}");
                (cover_letter_fallback(&e, self.generator.endpoint()), true)
            }
        }
    }

    async fn render_both(
        &self,
        output: TailoredOutput,
        job_title: &str,
        names: &ArtifactNames,
    ) -> Result<(), AppError> {
        self.store.ensure_layout().await?;

        let resume_path = self.store.artifact_path(&names.resume_pdf);
        let cover_path = self.store.artifact_path(&names.cover_pdf);
        let resume_title = format!("Tailored Resume - {job_title}");
        let cover_title = format!("Cover Letter - {job_title}");

        tokio::task::spawn_blocking(move || -> Result<(), RenderError> {
            write_document(&output.resume_text, &resume_title, &resume_path)?;
            write_document(&output.cover_letter_text, &cover_title, &cover_path)
        })
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;
        Ok(())
    }

    async fn bundle(&self, names: &ArtifactNames) -> Result<(), AppError> {
        let archive_path = self.store.artifact_path(&names.archive);
        let resume_path = self.store.artifact_path(&names.resume_pdf);
        let cover_path = self.store.artifact_path(&names.cover_pdf);
        let resume_entry = names.resume_pdf.clone();
        let cover_entry = names.cover_pdf.clone();

        tokio::task::spawn_blocking(move || {
            write_archive(
                &archive_path,
                &[
                    (resume_entry, resume_path.as_path()),
                    (cover_entry, cover_path.as_path()),
                ],
            )
        })
        .await
        .map_err(|e| anyhow::anyhow!("Bundle task failed: {e}"))??;
        Ok(())
    }
}

fn enter(stage: PipelineStage, profile: &ProfileId) {
    info!(%stage, %profile, "Tailoring stage");
}

fn failed(stage: PipelineStage, e: AppError) -> AppError {
    error!(%stage, "Tailoring failed: {e}");
    e
}

/// Human-readable cover letter body used when the generator cannot produce one.
pub fn cover_letter_fallback(e: &LlmError, endpoint: &str) -> String {
    match e {
        LlmError::Api { status, .. } => {
            format!("Error generating cover letter: text generator returned {status}")
        }
        LlmError::Http(_) => format!(
            "Error: Could not connect to the text generator. Please ensure it is running at {endpoint}"
        ),
        other => format!("Error generating cover letter: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::stub::StubGenerator;
    use crate::normalize::SourceDocument;

    fn profile() -> ProfileId {
        ProfileId::parse("default_user").unwrap()
    }

    fn request() -> TailorRequest {
        TailorRequest {
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_description: "Looking for a Python developer with Flask and Docker experience"
                .to_string(),
        }
    }

    async fn seeded_store(dir: &std::path::Path, kinds: &[TemplateKind]) -> TemplateStore {
        let store = TemplateStore::new(dir);
        for kind in kinds {
            let text = match kind {
                TemplateKind::Resume => "Jane Doe SKILLS: Java, Python, SQL",
                TemplateKind::CoverLetter => "Dear Hiring Team, I am excited to apply.",
            };
            store
                .save_template(
                    &profile(),
                    *kind,
                    &SourceDocument {
                        raw_bytes: b"%PDF-1.4".to_vec(),
                        canonical_text: text.to_string(),
                    },
                )
                .await
                .unwrap();
        }
        store
    }

    fn pipeline(store: TemplateStore, generator: StubGenerator) -> TailoringPipeline {
        TailoringPipeline::new(store, Arc::new(generator), 10)
    }

    fn artifact_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .count()
    }

    #[test]
    fn test_validate_trims_and_names_missing_field() {
        let ok = TailorRequest {
            job_title: "  Engineer ".to_string(),
            ..request()
        }
        .validate()
        .unwrap();
        assert_eq!(ok.job_title, "Engineer");

        let err = TailorRequest {
            company_name: "   ".to_string(),
            ..request()
        }
        .validate()
        .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.starts_with("company_name is required")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_artifact_names_share_stamp() {
        let names = ArtifactNames::new("20240101_120000_ab12cd34");
        assert_eq!(names.resume_pdf, "tailored_resume_20240101_120000_ab12cd34.pdf");
        assert_eq!(names.cover_pdf, "tailored_cover_20240101_120000_ab12cd34.pdf");
        assert_eq!(names.archive, "job_package_20240101_120000_ab12cd34.zip");
    }

    #[test]
    fn test_stamps_do_not_collide() {
        assert_ne!(artifact_stamp(), artifact_stamp());
    }

    #[test]
    fn test_fallback_messages() {
        let api = LlmError::Api {
            status: 503,
            message: "busy".to_string(),
        };
        assert_eq!(
            cover_letter_fallback(&api, "http://localhost:11434"),
            "Error generating cover letter: text generator returned 503"
        );
        let parse = LlmError::Parse(serde_json::from_str::<u8>("x").unwrap_err());
        assert!(cover_letter_fallback(&parse, "http://x").starts_with("Error generating cover letter: "));
    }

    #[tokio::test]
    async fn test_missing_job_title_is_rejected_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path(), &TemplateKind::ALL).await;
        let before = artifact_count(dir.path());

        let err = pipeline(store, StubGenerator::Reply("letter".to_string()))
            .run(
                &profile(),
                TailorRequest {
                    job_title: String::new(),
                    ..request()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(artifact_count(dir.path()), before);
    }

    #[tokio::test]
    async fn test_missing_resume_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path(), &[TemplateKind::CoverLetter]).await;
        let err = pipeline(store, StubGenerator::Reply("letter".to_string()))
            .run(&profile(), request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingTemplate(TemplateKind::Resume)));
    }

    #[tokio::test]
    async fn test_missing_cover_letter_template() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path(), &[TemplateKind::Resume]).await;
        let err = pipeline(store, StubGenerator::Reply("letter".to_string()))
            .run(&profile(), request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingTemplate(TemplateKind::CoverLetter)
        ));
    }

    #[tokio::test]
    async fn test_successful_run_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path(), &TemplateKind::ALL).await;
        let outcome = pipeline(
            store,
            StubGenerator::Reply("Dear Acme Team,\nI build Python services.".to_string()),
        )
        .run(&profile(), request())
        .await
        .unwrap();

        assert!(!outcome.cover_letter_degraded);
        assert_eq!(
            terms(&outcome.keywords),
            vec!["python", "developer", "flask", "docker", "experience"]
        );
        for name in [&outcome.resume_pdf, &outcome.cover_pdf, &outcome.archive] {
            assert!(dir.path().join(name).is_file(), "missing artifact {name}");
        }
        let resume = std::fs::read(dir.path().join(&outcome.resume_pdf)).unwrap();
        assert!(resume.starts_with(b"%PDF-"));
        assert!(outcome.archive.starts_with("job_package_"));
    }

    #[tokio::test]
    async fn test_generator_failure_degrades_but_completes() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(dir.path(), &TemplateKind::ALL).await;
        let outcome = pipeline(store, StubGenerator::Status(500))
            .run(&profile(), request())
            .await
            .unwrap();

        assert!(outcome.cover_letter_degraded);
        assert!(dir.path().join(&outcome.cover_pdf).is_file());
        assert!(dir.path().join(&outcome.archive).is_file());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(PipelineStage::GenerateCoverLetter.to_string(), "generate_cover_letter");
        assert_eq!(
            serde_json::to_value(PipelineStage::RenderBoth).unwrap(),
            serde_json::json!("render_both")
        );
    }
}
