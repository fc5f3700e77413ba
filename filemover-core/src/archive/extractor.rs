use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use super::{ArchiveTool, ExtractMode, is_ignored_name};
use crate::config::ExtractSettings;
use crate::error::{FileMoverError, FileMoverResult};
use crate::paths::{copy_preserving, ensure_dir, extension_lowercase, move_entry, unique_destination, walk_error};

const STAGING_PREFIX: &str = ".filemover-";

/// Where an archive's content ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// `<dest>/<archive name>` for smart mode, `<dest>` for image mode.
    pub dir: PathBuf,
    /// Top-level entries moved (smart) or image files copied (images).
    pub entries: Vec<PathBuf>,
}

pub struct ArchiveExtractor {
    tool: Box<dyn ArchiveTool>,
    mode: ExtractMode,
    image_extensions: Vec<String>,
}

impl ArchiveExtractor {
    pub fn new(tool: Box<dyn ArchiveTool>, mode: ExtractMode, image_extensions: Vec<String>) -> Self {
        let image_extensions = image_extensions
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .collect();
        ArchiveExtractor {
            tool,
            mode,
            image_extensions,
        }
    }

    pub fn from_settings(settings: &ExtractSettings) -> Self {
        ArchiveExtractor::new(
            settings.tool.build(),
            settings.mode,
            settings.image_extensions.clone(),
        )
    }

    pub fn mode(&self) -> ExtractMode {
        self.mode
    }

    /// Extract `archive` into `dest` according to the configured mode.
    pub fn extract(&self, archive: &Path, dest: &Path) -> FileMoverResult<Extraction> {
        tracing::debug!(
            archive = %archive.display(),
            dest = %dest.display(),
            mode = %self.mode,
            tool = self.tool.name(),
            "extracting archive"
        );
        match self.mode {
            ExtractMode::Smart => self.extract_smart(archive, dest),
            ExtractMode::Images => self.extract_images(archive, dest),
        }
    }

    /// Extract into `<output_base>/<archive stem>/`, collapsing wrapper folders.
    ///
    /// The content of the first directory (top-down) that directly holds a
    /// file is moved, so `Album.zip` containing `Album/Album/*.jpg` lands as
    /// `Album/*.jpg`. Moves already done are kept if a later one fails.
    pub fn extract_smart(&self, archive: &Path, output_base: &Path) -> FileMoverResult<Extraction> {
        let stem = archive
            .file_stem()
            .ok_or_else(|| FileMoverError::Archive {
                path: archive.to_path_buf(),
                reason: "archive has no file name".into(),
            })?;
        let extracted_dir = output_base.join(stem);
        ensure_dir(&extracted_dir)?;

        let staging = staging_dir(output_base)?;
        self.tool.extract(archive, staging.path())?;

        let source = first_dir_with_files(staging.path())?;
        let mut moved = Vec::new();
        for entry in sorted_children(&source)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let dest = unique_destination(&extracted_dir, name);
            move_entry(&entry, &dest)?;
            moved.push(dest);
        }

        finish_staging(staging);
        Ok(Extraction {
            dir: extracted_dir,
            entries: moved,
        })
    }

    /// Copy every image in the archive, flat, into `target`.
    pub fn extract_images(&self, archive: &Path, target: &Path) -> FileMoverResult<Extraction> {
        ensure_dir(target)?;
        let staging = staging_dir(target)?;
        self.tool.extract(archive, staging.path())?;

        let mut copied = Vec::new();
        let walker = WalkDir::new(staging.path())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored_name(e.file_name()));
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(e, staging.path()))?;
            if !entry.file_type().is_file() || !self.is_image(entry.path()) {
                continue;
            }
            let dest = unique_destination(target, entry.file_name());
            copy_preserving(entry.path(), &dest)?;
            copied.push(dest);
        }

        finish_staging(staging);
        Ok(Extraction {
            dir: target.to_path_buf(),
            entries: copied,
        })
    }

    fn is_image(&self, path: &Path) -> bool {
        extension_lowercase(path).is_some_and(|ext| self.image_extensions.contains(&ext))
    }
}

/// Private scratch directory next to the destination, so moves are renames.
fn staging_dir(parent: &Path) -> FileMoverResult<TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
        .map_err(|e| FileMoverError::from_io(e, parent))
}

fn finish_staging(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        tracing::warn!(path = %path.display(), error = %e, "could not remove staging directory");
    }
}

/// Walk `root` top-down and return the first directory holding a file, or `root`.
fn first_dir_with_files(root: &Path) -> FileMoverResult<PathBuf> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_name(e.file_name()));
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(e, root))?;
        if entry.file_type().is_dir() && has_direct_file(entry.path())? {
            return Ok(entry.into_path());
        }
    }
    Ok(root.to_path_buf())
}

fn has_direct_file(dir: &Path) -> FileMoverResult<bool> {
    for child in sorted_children(dir)? {
        if child.is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Children of `dir` by name, without OS/archiver litter.
fn sorted_children(dir: &Path) -> FileMoverResult<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| FileMoverError::from_io(e, dir))? {
        let entry = entry.map_err(|e| FileMoverError::from_io(e, dir))?;
        if !is_ignored_name(&entry.file_name()) {
            children.push(entry.path());
        }
    }
    children.sort();
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ZipTool;
    use std::fs::File;
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

    fn extractor(mode: ExtractMode) -> ArchiveExtractor {
        ArchiveExtractor::new(Box::new(ZipTool), mode, vec!["jpg".into(), ".PNG".into()])
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_smart_collapses_wrapper_folders() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("MyArchive.zip");
        write_zip(
            &archive,
            &[("MyArchive/MyArchive/a.jpg", "a"), ("MyArchive/MyArchive/b.jpg", "b")],
        );
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let result = extractor(ExtractMode::Smart).extract(&archive, &dest).unwrap();

        assert_eq!(result.dir, dest.join("MyArchive"));
        assert_eq!(names(&result.dir), vec!["a.jpg", "b.jpg"]);
        // Only the extracted folder remains; staging is gone.
        assert_eq!(names(&dest), vec!["MyArchive"]);
    }

    #[test]
    fn test_smart_root_files_same_layout() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested.zip");
        let flat = dir.path().join("flat.zip");
        write_zip(&nested, &[("wrap/a.jpg", "a"), ("wrap/b.jpg", "b")]);
        write_zip(&flat, &[("a.jpg", "a"), ("b.jpg", "b")]);
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let ex = extractor(ExtractMode::Smart);
        let nested = ex.extract(&nested, &dest).unwrap();
        let flat = ex.extract(&flat, &dest).unwrap();

        assert_eq!(names(&nested.dir), names(&flat.dir));
    }

    #[test]
    fn test_smart_keeps_subfolders_of_selected_dir() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("set.zip");
        write_zip(
            &archive,
            &[("set/cover.jpg", "c"), ("set/raw/a.cr2", "r"), ("set/raw/b.cr2", "r")],
        );
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let result = extractor(ExtractMode::Smart).extract(&archive, &dest).unwrap();

        assert_eq!(names(&result.dir), vec!["cover.jpg", "raw"]);
        assert_eq!(names(&result.dir.join("raw")), vec!["a.cr2", "b.cr2"]);
    }

    #[test]
    fn test_smart_ignores_macosx_folder() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("mac.zip");
        write_zip(
            &archive,
            &[("__MACOSX/wrap/._a.jpg", "x"), ("wrap/a.jpg", "a")],
        );
        let dest = dir.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let result = extractor(ExtractMode::Smart).extract(&archive, &dest).unwrap();

        assert_eq!(names(&result.dir), vec!["a.jpg"]);
    }

    #[test]
    fn test_images_flat_copy_with_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("photos.zip");
        write_zip(
            &archive,
            &[
                ("day1/img.jpg", "one"),
                ("day2/img.jpg", "two"),
                ("day2/shot.png", "png"),
                ("notes.txt", "skip me"),
            ],
        );
        let dest = dir.path().join("dest");

        let result = extractor(ExtractMode::Images).extract(&archive, &dest).unwrap();

        assert_eq!(result.dir, dest);
        assert_eq!(names(&dest), vec!["img.jpg", "img_1.jpg", "shot.png"]);
        assert_eq!(fs::read_to_string(dest.join("img.jpg")).unwrap(), "one");
        assert_eq!(fs::read_to_string(dest.join("img_1.jpg")).unwrap(), "two");
    }

    #[test]
    fn test_corrupt_archive_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.zip");
        fs::write(&archive, "garbage").unwrap();

        let err = extractor(ExtractMode::Smart).extract(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, FileMoverError::Archive { .. }));
    }

    /// Unpacks a fixed tree, including a name 7-Zip leaves as raw Shift_JIS bytes.
    #[cfg(target_os = "linux")]
    struct ShiftJisTool;

    #[cfg(target_os = "linux")]
    impl ArchiveTool for ShiftJisTool {
        fn name(&self) -> &str {
            "shift-jis"
        }

        fn extract(&self, _archive: &Path, target: &Path) -> FileMoverResult<()> {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;

            let wrap = target.join("wrap");
            fs::create_dir(&wrap).unwrap();
            fs::write(wrap.join("ok.jpg"), "ok").unwrap();
            fs::write(wrap.join(OsStr::from_bytes(b"\x8e\x42\x89\x65.jpg")), "sjis").unwrap();
            Ok(())
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_entry_names_are_kept() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let sjis = OsStr::from_bytes(b"\x8e\x42\x89\x65.jpg");
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("trip.7z");
        fs::write(&archive, "").unwrap();

        for mode in [ExtractMode::Smart, ExtractMode::Images] {
            let dest = dir.path().join(format!("dest-{mode}"));
            fs::create_dir(&dest).unwrap();
            let extractor = ArchiveExtractor::new(Box::new(ShiftJisTool), mode, vec!["jpg".into()]);

            let result = extractor.extract(&archive, &dest).unwrap();

            assert_eq!(result.entries.len(), 2);
            assert_eq!(fs::read_to_string(result.dir.join("ok.jpg")).unwrap(), "ok");
            assert_eq!(fs::read_to_string(result.dir.join(sjis)).unwrap(), "sjis");
        }
    }
}
