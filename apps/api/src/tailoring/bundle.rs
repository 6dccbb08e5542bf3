//! Archive Bundler: packs rendered documents into one zip file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Writes a zip at `archive_path` holding each `(entry_name, source_path)` pair.
pub fn write_archive(archive_path: &Path, entries: &[(String, &Path)]) -> Result<()> {
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create archive: {}", archive_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (name, source) in entries {
        let bytes = std::fs::read(source)
            .with_context(|| format!("Failed to read file: {}", source.display()))?;
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {name} to archive"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write {name} into archive"))?;
    }

    zip.finish()
        .with_context(|| format!("Failed to finalize archive: {}", archive_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_archive_holds_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("tailored_resume_1.pdf");
        let cover = dir.path().join("tailored_cover_1.pdf");
        std::fs::write(&resume, b"%PDF-resume").unwrap();
        std::fs::write(&cover, b"%PDF-cover").unwrap();

        let archive = dir.path().join("job_package_1.zip");
        write_archive(
            &archive,
            &[
                ("tailored_resume_1.pdf".to_string(), resume.as_path()),
                ("tailored_cover_1.pdf".to_string(), cover.as_path()),
            ],
        )
        .unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 2);
        let mut contents = Vec::new();
        zip.by_name("tailored_cover_1.pdf")
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"%PDF-cover");
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        let result = write_archive(
            &dir.path().join("out.zip"),
            &[("nope.pdf".to_string(), missing.as_path())],
        );
        assert!(result.is_err());
    }
}
