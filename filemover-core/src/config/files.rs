//! One type per JSON file in the config directory.

use std::path::Path;

use config::{Config as Loader, File, FileFormat};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::archive::{ArchiveToolKind, ExtractMode};
use crate::constants::DEFAULT_IMAGE_EXTENSIONS;
use crate::error::{FileMoverError, FileMoverResult};
use crate::keywords::KeywordSet;
use crate::name_format::EventFormat;

static DEFAULT_BASE_ROOT: &str = "~/Pictures";

/// A settings file that falls back to its default when missing or unreadable.
pub trait ConfigFile: Serialize + DeserializeOwned + Default {
    const FILE_NAME: &'static str;

    /// Load from `dir`, logging and falling back to the default on any error.
    fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Self::default();
        }
        match Self::load(&path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> FileMoverResult<Self> {
        let load_error = |e: config::ConfigError| FileMoverError::ConfigLoad {
            file: path.display().to_string(),
            reason: e.to_string(),
        };

        Loader::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .build()
            .map_err(load_error)?
            .try_deserialize()
            .map_err(load_error)
    }

    /// Write the whole file, creating the directory if needed.
    fn save(&self, dir: &Path) -> FileMoverResult<()> {
        std::fs::create_dir_all(dir)
            .map_err(|e| FileMoverError::Config(format!("Could not create config directory: {e}")))?;

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FileMoverError::Serialization(e.to_string()))?;

        std::fs::write(dir.join(Self::FILE_NAME), content)
            .map_err(|e| FileMoverError::Config(format!("Could not write {}: {e}", Self::FILE_NAME)))
    }
}

/// `config_local.json`: parent directory for event folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRootFile {
    #[serde(rename = "BASE_ROOT", alias = "base_root")]
    pub base_root: String,
}

impl Default for BaseRootFile {
    fn default() -> Self {
        BaseRootFile {
            base_root: DEFAULT_BASE_ROOT.to_string(),
        }
    }
}

impl ConfigFile for BaseRootFile {
    const FILE_NAME: &'static str = "config_local.json";
}

/// `config_keywords.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordsFile {
    #[serde(rename = "KEYWORDS", alias = "keywords")]
    pub keywords: KeywordSet,
}

impl ConfigFile for KeywordsFile {
    const FILE_NAME: &'static str = "config_keywords.json";
}

/// `config_format.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatFile {
    pub format: EventFormat,
}

impl ConfigFile for FormatFile {
    const FILE_NAME: &'static str = "config_format.json";
}

/// `config_extract.json`: how archives are handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    pub mode: ExtractMode,
    pub tool: ArchiveToolKind,
    /// Extensions (without dot) kept by [`ExtractMode::Images`].
    pub image_extensions: Vec<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        ExtractSettings {
            mode: ExtractMode::default(),
            tool: ArchiveToolKind::default(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ConfigFile for ExtractSettings {
    const FILE_NAME: &'static str = "config_extract.json";
}
