//! Copy plain files and extract archives into an event folder.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::archive::{ArchiveExtractor, Extraction};
use crate::constants::ARCHIVE_EXTENSION;
use crate::error::FileMoverError;
use crate::paths::{copy_preserving, ensure_dir, extension_lowercase, sanitize_folder_name, unique_destination};

/// `base_root/<event>/<subfolder>`. Empty parts are skipped.
pub fn resolve_destination(base_root: &Path, event: &str, subfolder: &str) -> PathBuf {
    let mut dest = base_root.to_path_buf();
    for part in [event, subfolder] {
        let part = sanitize_folder_name(part);
        if !part.is_empty() {
            dest.push(part);
        }
    }
    dest
}

/// A file that was skipped without stopping the batch.
#[derive(Debug)]
pub struct IngestWarning {
    pub file: PathBuf,
    pub error: FileMoverError,
}

/// What an ingest run did, in input order.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// `(source, destination)` for every plain file copied.
    pub copied: Vec<(PathBuf, PathBuf)>,
    pub extracted: Vec<(PathBuf, Extraction)>,
    pub warnings: Vec<IngestWarning>,
}

impl IngestReport {
    pub fn processed(&self) -> usize {
        self.copied.len() + self.extracted.len()
    }
}

/// A batch stopped by an unexpected error. `completed` holds what was done before it.
#[derive(Debug, Error)]
#[error("stopped at {} after {} file(s): {error}", .file.display(), .completed.processed())]
pub struct IngestError {
    pub file: PathBuf,
    #[source]
    pub error: FileMoverError,
    pub completed: IngestReport,
}

pub struct FileIngestor {
    extractor: ArchiveExtractor,
}

impl FileIngestor {
    pub fn new(extractor: ArchiveExtractor) -> Self {
        FileIngestor { extractor }
    }

    /// Copy or extract each of `files` into `dest`.
    ///
    /// Missing and unreadable files and archives that fail to extract are
    /// recorded as warnings and skipped. Any other failure stops the batch.
    pub fn ingest<P: AsRef<Path>>(&self, files: &[P], dest: &Path) -> Result<IngestReport, IngestError> {
        let mut report = IngestReport::default();

        if let Err(error) = ensure_dir(dest) {
            return Err(IngestError {
                file: dest.to_path_buf(),
                error,
                completed: report,
            });
        }

        let mut seen = HashSet::new();
        for file in files {
            let source = file.as_ref();
            if !seen.insert(source.to_path_buf()) {
                tracing::debug!(source = %source.display(), "skipping duplicate input");
                continue;
            }

            match self.ingest_one(source, dest, &mut report) {
                Ok(()) => {}
                Err(error) if error.is_recoverable() => {
                    tracing::warn!(source = %source.display(), %error, "skipped file");
                    report.warnings.push(IngestWarning {
                        file: source.to_path_buf(),
                        error,
                    });
                }
                Err(error) => {
                    tracing::error!(source = %source.display(), dest = %dest.display(), ?error, "ingest aborted");
                    return Err(IngestError {
                        file: source.to_path_buf(),
                        error,
                        completed: report,
                    });
                }
            }
        }

        Ok(report)
    }

    fn ingest_one(&self, source: &Path, dest: &Path, report: &mut IngestReport) -> Result<(), FileMoverError> {
        if !source.exists() {
            return Err(FileMoverError::NotFound {
                path: source.to_path_buf(),
            });
        }

        if is_archive(source) {
            let extraction = self.extractor.extract(source, dest)?;
            tracing::debug!(
                source = %source.display(),
                dir = %extraction.dir.display(),
                entries = extraction.entries.len(),
                "extracted archive"
            );
            report.extracted.push((source.to_path_buf(), extraction));
            return Ok(());
        }

        let name = source.file_name().ok_or_else(|| FileMoverError::NotFound {
            path: source.to_path_buf(),
        })?;
        let target = unique_destination(dest, name);
        copy_preserving(source, &target)?;
        tracing::debug!(source = %source.display(), target = %target.display(), "copied file");
        report.copied.push((source.to_path_buf(), target));
        Ok(())
    }
}

fn is_archive(path: &Path) -> bool {
    path.is_file() && extension_lowercase(path).as_deref() == Some(ARCHIVE_EXTENSION)
}
