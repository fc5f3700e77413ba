//! Archive extraction.
//!
//! Extraction itself is delegated to an [`ArchiveTool`]: the built-in zip
//! reader or an external 7-Zip executable. [`ArchiveExtractor`] decides what
//! happens to the extracted content, according to its [`ExtractMode`].

mod extractor;
mod seven_zip;
mod zip_tool;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FileMoverResult;

pub use extractor::{ArchiveExtractor, Extraction};
pub use seven_zip::SevenZipTool;
pub use zip_tool::ZipTool;

/// Entries that archive tools and operating systems leave behind and that are
/// never part of the user's content.
pub(crate) const IGNORED_NAMES: &[&str] = &["__MACOSX", ".DS_Store", "Thumbs.db"];

pub(crate) fn is_ignored_name(name: &std::ffi::OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| IGNORED_NAMES.iter().any(|ignored| name.eq_ignore_ascii_case(ignored)))
}

/// Something that can unpack an archive into a directory.
pub trait ArchiveTool: Send + Sync {
    fn name(&self) -> &str;

    /// Extract every entry of `archive` below `target`, which already exists.
    fn extract(&self, archive: &Path, target: &Path) -> FileMoverResult<()>;
}

/// What to do with an archive's content once it is extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Move everything into `<dest>/<archive name>/`, dropping wrapper folders.
    #[default]
    Smart,
    /// Copy only images, flat into `<dest>/`, renaming on collision.
    Images,
}

impl std::fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractMode::Smart => write!(f, "smart"),
            ExtractMode::Images => write!(f, "images"),
        }
    }
}

impl std::str::FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smart" => Ok(ExtractMode::Smart),
            "images" => Ok(ExtractMode::Images),
            other => Err(format!("Unknown extract mode '{other}'. Expected smart or images")),
        }
    }
}

/// Which [`ArchiveTool`] to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveToolKind {
    #[default]
    Zip,
    SevenZip,
}

impl ArchiveToolKind {
    pub fn build(self) -> Box<dyn ArchiveTool> {
        match self {
            ArchiveToolKind::Zip => Box::new(ZipTool),
            ArchiveToolKind::SevenZip => Box::new(SevenZipTool::default()),
        }
    }
}

impl std::fmt::Display for ArchiveToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveToolKind::Zip => write!(f, "zip"),
            ArchiveToolKind::SevenZip => write!(f, "seven_zip"),
        }
    }
}

impl std::str::FromStr for ArchiveToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zip" => Ok(ArchiveToolKind::Zip),
            "seven_zip" | "7z" | "7za" => Ok(ArchiveToolKind::SevenZip),
            other => Err(format!("Unknown archive tool '{other}'. Expected zip or seven_zip")),
        }
    }
}
