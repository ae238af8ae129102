use crate::ops::error::{export_error, OpsResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Hands a finished file to the user (browser download, save dialog, disk).
pub trait FileEmitter: Send + Sync {
    fn emit_file(&self, name: &str, mime_type: &str, bytes: &[u8]) -> OpsResult<()>;
}

/// Writes emitted files into a directory.
///
/// The bytes land in a temporary file next to the target first; the temp
/// file is removed on every failure path and renamed into place on success.
#[derive(Debug, Clone)]
pub struct DirectoryEmitter {
    dir: PathBuf,
}

impl DirectoryEmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform download directory, or the working directory without one.
    pub fn downloads() -> Self {
        Self::new(dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn validate_name(name: &str) -> OpsResult<()> {
        let path = Path::new(name);
        let single_component = path.components().count() == 1
            && matches!(
                path.components().next(),
                Some(std::path::Component::Normal(_))
            );
        if name.trim().is_empty() || !single_component {
            return Err(export_error(&format!("Invalid export file name: {}", name)));
        }
        Ok(())
    }
}

impl FileEmitter for DirectoryEmitter {
    fn emit_file(&self, name: &str, mime_type: &str, bytes: &[u8]) -> OpsResult<()> {
        Self::validate_name(name)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            export_error(&format!("Failed to create export directory: {}", e))
        })?;

        let dest = self.dir.join(name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&dest)
            .map_err(|e| export_error(&format!("Failed to save {}: {}", dest.display(), e)))?;

        tracing::info!(path = %dest.display(), mime_type, bytes = bytes.len(), "export written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_emit_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = DirectoryEmitter::new(temp_dir.path().join("exports"));

        emitter
            .emit_file("card_data_2024-01-01.csv", "text/csv", b"\"Event\"")
            .unwrap();

        let written = fs::read_to_string(emitter.dir().join("card_data_2024-01-01.csv")).unwrap();
        assert_eq!(written, "\"Event\"");
        assert_eq!(fs::read_dir(emitter.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_emit_rejects_path_names() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = DirectoryEmitter::new(temp_dir.path());

        assert!(emitter.emit_file("../escape.csv", "text/csv", b"x").is_err());
        assert!(emitter.emit_file("", "text/csv", b"x").is_err());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_persist_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // A directory squatting on the target name makes the final rename fail.
        fs::create_dir(temp_dir.path().join("taken.csv")).unwrap();
        fs::write(temp_dir.path().join("taken.csv").join("keep"), "x").unwrap();
        let emitter = DirectoryEmitter::new(temp_dir.path());

        assert!(emitter.emit_file("taken.csv", "text/csv", b"data").is_err());

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["taken.csv".to_string()]);
    }
}
