//! Template Store: filesystem layout under the configured storage root.
//!
//! ```text
//! <root>/pdfs/<profile>_<slot>.pdf    raw uploaded template
//! <root>/texts/<profile>_<slot>.txt   canonical text of that template
//! <root>/<artifact>                   rendered PDFs and zip packages
//! ```
//!
//! Writes are last-write-wins; nothing here locks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

use crate::models::{ProfileId, TemplateKind};
use crate::normalize::SourceDocument;

const PDF_DIR: &str = "pdfs";
const TEXT_DIR: &str = "texts";

#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root, `pdfs/` and `texts/` directories if they are missing.
    pub async fn ensure_layout(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.root.join(PDF_DIR),
            self.root.join(TEXT_DIR),
        ] {
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    fn pdf_path(&self, profile: &ProfileId, kind: TemplateKind) -> PathBuf {
        self.root.join(PDF_DIR).join(kind.pdf_file_name(profile))
    }

    fn text_path(&self, profile: &ProfileId, kind: TemplateKind) -> PathBuf {
        self.root.join(TEXT_DIR).join(kind.text_file_name(profile))
    }

    /// Persists both the raw bytes and the canonical text, replacing any prior template.
    pub async fn save_template(
        &self,
        profile: &ProfileId,
        kind: TemplateKind,
        document: &SourceDocument,
    ) -> Result<()> {
        self.ensure_layout().await?;

        let pdf_path = self.pdf_path(profile, kind);
        fs::write(&pdf_path, &document.raw_bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", pdf_path.display()))?;

        let text_path = self.text_path(profile, kind);
        fs::write(&text_path, &document.canonical_text)
            .await
            .with_context(|| format!("Failed to write file: {}", text_path.display()))?;

        info!(
            "Stored {} template for profile {}: {} bytes, {} characters of text",
            kind,
            profile,
            document.raw_bytes.len(),
            document.canonical_text.chars().count()
        );
        Ok(())
    }

    /// Loads the canonical text of a template, or `None` if it was never uploaded.
    pub async fn load_template_text(
        &self,
        profile: &ProfileId,
        kind: TemplateKind,
    ) -> Result<Option<String>> {
        let path = self.text_path(profile, kind);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read file: {}", path.display()))
            }
        }
    }

    /// Path of a named artifact directly under the storage root.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Reads an artifact by bare file name. `None` if it does not exist.
    ///
    /// Callers must validate `name` with [`is_safe_artifact_name`] first.
    pub async fn read_artifact(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.artifact_path(name);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to stat file: {}", path.display()))
            }
        }
        let bytes = fs::read(&path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Some(bytes))
    }
}

/// An artifact name is a single path component with no traversal.
pub fn is_safe_artifact_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
