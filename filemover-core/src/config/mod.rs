//! Configuration for filemover.
//!
//! Settings live in separate JSON files in the config directory. They are
//! loaded once into a [`Config`] and written back one file at a time when the
//! user changes something.

mod files;

use std::path::{Path, PathBuf};

use crate::error::{FileMoverError, FileMoverResult};
use crate::keywords::KeywordSet;
use crate::name_format::EventFormat;

pub use files::{BaseRootFile, ConfigFile, ExtractSettings, FormatFile, KeywordsFile};

/// Overrides the config directory (useful for tests and portable installs).
pub const CONFIG_DIR_ENV: &str = "FILEMOVER_CONFIG_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    dir: PathBuf,
    base_root: BaseRootFile,
    keywords: KeywordsFile,
    format: FormatFile,
    extract: ExtractSettings,
}

impl Config {
    /// `$FILEMOVER_CONFIG_DIR`, or `~/.config/filemover` (platform equivalent).
    pub fn config_dir() -> FileMoverResult<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FileMoverError::Config("Could not determine config directory".into()))?
            .join("filemover");
        Ok(config_dir)
    }

    pub fn load() -> FileMoverResult<Self> {
        Ok(Self::load_from(Self::config_dir()?))
    }

    /// Load every settings file in `dir`. Unreadable files fall back to defaults.
    pub fn load_from(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Config {
            base_root: BaseRootFile::load_or_default(&dir),
            keywords: KeywordsFile::load_or_default(&dir),
            format: FormatFile::load_or_default(&dir),
            extract: ExtractSettings::load_or_default(&dir),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one settings file, for display.
    pub fn file_path<F: ConfigFile>(&self) -> PathBuf {
        self.dir.join(F::FILE_NAME)
    }

    /// Parent directory for event folders, with `~` expanded.
    pub fn base_root(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.base_root.base_root).into_owned())
    }

    /// The base root as configured, keeping `~`.
    pub fn display_base_root(&self) -> &str {
        &self.base_root.base_root
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords.keywords
    }

    pub fn event_format(&self) -> &EventFormat {
        &self.format.format
    }

    pub fn extract(&self) -> &ExtractSettings {
        &self.extract
    }

    pub fn set_base_root(&mut self, base_root: impl Into<String>) -> FileMoverResult<()> {
        let file = BaseRootFile {
            base_root: base_root.into(),
        };
        file.save(&self.dir)?;
        self.base_root = file;
        Ok(())
    }

    pub fn set_keywords(&mut self, keywords: KeywordSet) -> FileMoverResult<()> {
        let file = KeywordsFile { keywords };
        file.save(&self.dir)?;
        self.keywords = file;
        Ok(())
    }

    /// Validate and save a folder-name template. Nothing is written if it is invalid.
    pub fn set_event_format(&mut self, template: &str) -> FileMoverResult<()> {
        let file = FormatFile {
            format: EventFormat::parse(template.trim())?,
        };
        file.save(&self.dir)?;
        self.format = file;
        Ok(())
    }

    pub fn set_extract(&mut self, extract: ExtractSettings) -> FileMoverResult<()> {
        extract.save(&self.dir)?;
        self.extract = extract;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveToolKind, ExtractMode};
    use crate::constants::DEFAULT_EVENT_FORMAT;

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path());

        assert_eq!(config.display_base_root(), "~/Pictures");
        assert_eq!(config.keywords(), &KeywordSet::default());
        assert_eq!(config.event_format().as_str(), DEFAULT_EVENT_FORMAT);
        assert_eq!(config.extract(), &ExtractSettings::default());
    }

    #[test]
    fn test_reads_uppercase_file_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config_local.json"), r#"{ "BASE_ROOT": "/data/photos" }"#).unwrap();
        std::fs::write(
            dir.path().join("config_keywords.json"),
            r#"{ "KEYWORDS": ["kemo", "撮影"] }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("config_format.json"),
            r#"{ "format": "{date:%Y-%m-%d}_{event}" }"#,
        )
        .unwrap();

        let config = Config::load_from(dir.path());

        assert_eq!(config.base_root(), PathBuf::from("/data/photos"));
        assert_eq!(
            config.keywords(),
            &KeywordSet::new(vec!["kemo".into(), "撮影".into()])
        );
        assert_eq!(config.event_format().as_str(), "{date:%Y-%m-%d}_{event}");
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config_keywords.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("config_format.json"), r#"{ "format": "a/b" }"#).unwrap();

        let config = Config::load_from(dir.path());

        assert_eq!(config.keywords(), &KeywordSet::default());
        assert_eq!(config.event_format(), &EventFormat::default());
    }

    #[test]
    fn test_save_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(dir.path());

        config.set_base_root("/mnt/events").unwrap();
        config.set_keywords(KeywordSet::parse_list("fur, 撮影")).unwrap();
        config.set_event_format(" {event}_{date:%m%d} ").unwrap();
        config
            .set_extract(ExtractSettings {
                mode: ExtractMode::Images,
                tool: ArchiveToolKind::SevenZip,
                image_extensions: vec!["jpg".into()],
            })
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("config_keywords.json")).unwrap();
        assert!(raw.contains("\"KEYWORDS\""));
        assert!(raw.contains("撮影"), "non-ASCII must be written as-is");

        let reloaded = Config::load_from(dir.path());
        assert_eq!(reloaded.display_base_root(), "/mnt/events");
        assert_eq!(reloaded.keywords().len(), 2);
        assert_eq!(reloaded.event_format().as_str(), "{event}_{date:%m%d}");
        assert_eq!(reloaded.extract().mode, ExtractMode::Images);
        assert_eq!(reloaded.extract().tool, ArchiveToolKind::SevenZip);
    }

    #[test]
    fn test_invalid_format_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(dir.path());

        let err = config.set_event_format("no placeholders").unwrap_err();
        assert!(matches!(err, FileMoverError::Validation(_)));
        assert!(!dir.path().join("config_format.json").exists());
        assert_eq!(config.event_format(), &EventFormat::default());
    }

    #[test]
    fn test_unrenderable_saved_format_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config_format.json"),
            r#"{ "format": "{date:%Y%m%d%z}_{event}" }"#,
        )
        .unwrap();

        let config = Config::load_from(dir.path());

        assert_eq!(config.event_format(), &EventFormat::default());
    }
}
