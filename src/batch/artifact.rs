use std::io;
use std::path::{Path, PathBuf};

use crate::error::BatchError;

pub const ARTIFACT_EXT: &str = "txt";

/// Writes one `<identifier>.txt` per entry into a fixed directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create the directory if needed and check that it can take files.
    pub fn create(dir: &Path) -> Result<Self, BatchError> {
        let fail = |source: io::Error| BatchError::ArtifactWriteFailed {
            path: dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(fail)?;
        let meta = std::fs::metadata(dir).map_err(fail)?;
        if !meta.is_dir() {
            return Err(fail(io::Error::new(
                io::ErrorKind::Other,
                "output path is not a directory",
            )));
        }
        // Permission bits say nothing about who may write; create a real file.
        tempfile::NamedTempFile::new_in(dir).map_err(fail)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(artifact_file_name(id))
    }

    pub fn write(&self, id: &str, text: &str) -> Result<PathBuf, BatchError> {
        let path = self.path_for(id);
        std::fs::write(&path, text).map_err(|source| BatchError::ArtifactWriteFailed {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Drop a stale artifact so a failed entry leaves no file behind.
    pub fn remove(&self, id: &str) -> Result<(), BatchError> {
        let path = self.path_for(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(BatchError::ArtifactWriteFailed { path, source }),
        }
    }
}

pub fn artifact_file_name(id: &str) -> String {
    format!("{id}.{ARTIFACT_EXT}")
}

/// Identifiers become file stems verbatim, so they must stay inside the
/// output directory.
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(|c| matches!(c, '/' | '\\' | '\0'))
}
