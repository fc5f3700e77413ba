use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::ArchiveTool;
use crate::error::{FileMoverError, FileMoverResult};

const CANDIDATES: &[&str] = &["7za", "7z", "7zz"];

/// Extracts archives by running an external 7-Zip executable.
///
/// 7-Zip decodes legacy (e.g. Shift_JIS) entry names that the zip reader
/// would garble.
#[derive(Debug, Default, Clone)]
pub struct SevenZipTool {
    binary: Option<PathBuf>,
}

impl SevenZipTool {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        SevenZipTool {
            binary: Some(binary.into()),
        }
    }

    fn binary_path(&self) -> FileMoverResult<PathBuf> {
        if let Some(binary) = &self.binary {
            return Ok(binary.clone());
        }
        CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| {
                FileMoverError::Config(format!(
                    "No 7-Zip executable found in PATH (looked for {})",
                    CANDIDATES.join(", ")
                ))
            })
    }
}

impl ArchiveTool for SevenZipTool {
    fn name(&self) -> &str {
        "seven_zip"
    }

    fn extract(&self, archive: &Path, target: &Path) -> FileMoverResult<()> {
        if !archive.exists() {
            return Err(FileMoverError::NotFound {
                path: archive.to_path_buf(),
            });
        }
        let binary = self.binary_path()?;

        let output = Command::new(&binary)
            .arg("x")
            .arg("-y")
            .arg(format!("-o{}", target.display()))
            .arg(archive)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| FileMoverError::from_io(e, &binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FileMoverError::Archive {
                path: archive.to_path_buf(),
                reason: format!(
                    "{} exited with status {}: {}",
                    binary.display(),
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }

        Ok(())
    }
}
