use std::fs::File;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use filetime::FileTime;
use zip::ZipArchive;

use super::ArchiveTool;
use crate::error::{FileMoverError, FileMoverResult};
use crate::paths::ensure_dir;

/// Extracts zip archives in-process.
///
/// Entries whose names would escape the target directory are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipTool;

impl ArchiveTool for ZipTool {
    fn name(&self) -> &str {
        "zip"
    }

    fn extract(&self, archive: &Path, target: &Path) -> FileMoverResult<()> {
        let archive_error = |reason: String| FileMoverError::Archive {
            path: archive.to_path_buf(),
            reason,
        };

        let file = File::open(archive).map_err(|e| FileMoverError::from_io(e, archive))?;
        let mut zip = ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(|e| archive_error(e.to_string()))?;

            let Some(relative) = entry.enclosed_name() else {
                tracing::warn!(entry = entry.name(), "skipping zip entry with unsafe path");
                continue;
            };
            let out_path = target.join(relative);

            if entry.is_dir() {
                ensure_dir(&out_path)?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                ensure_dir(parent)?;
            }

            let mut out_file =
                File::create(&out_path).map_err(|e| FileMoverError::from_io(e, &out_path))?;
            io::copy(&mut entry, &mut out_file)
                .map_err(|e| archive_error(format!("{}: {e}", entry.name())))?;
            drop(out_file);

            if let Some(mtime) = entry.last_modified().and_then(to_file_time) {
                if let Err(e) = filetime::set_file_mtime(&out_path, mtime) {
                    tracing::debug!(path = %out_path.display(), error = %e, "could not preserve timestamps");
                }
            }
        }

        Ok(())
    }
}

fn to_file_time(dt: zip::DateTime) -> Option<FileTime> {
    let timestamp = NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())?
        .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())?
        .and_utc()
        .timestamp();
    Some(FileTime::from_unix_time(timestamp, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extracts_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("top.txt", "top"), ("sub/inner.txt", "inner")]);

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        ZipTool.extract(&archive, &out).unwrap();

        assert_eq!(std::fs::read(out.join("top.txt")).unwrap(), b"top");
        assert_eq!(std::fs::read(out.join("sub/inner.txt")).unwrap(), b"inner");
    }

    #[test]
    fn test_corrupt_archive_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"definitely not a zip").unwrap();

        let err = ZipTool.extract(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, FileMoverError::Archive { .. }));
    }

    #[test]
    fn test_keeps_entry_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("dated.zip");
        let stamp = zip::DateTime::from_date_and_time(2020, 1, 2, 3, 4, 6).unwrap();
        let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
        writer
            .start_file("photo.jpg", SimpleFileOptions::default().last_modified_time(stamp))
            .unwrap();
        writer.write_all(b"jpg").unwrap();
        writer.finish().unwrap();

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        ZipTool.extract(&archive, &out).unwrap();

        let meta = std::fs::metadata(out.join("photo.jpg")).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&meta),
            FileTime::from_unix_time(1_577_934_246, 0)
        );
    }
}
