//! Staged output files
//!
//! A [`StagedFile`] is written as a temporary file next to its final path and
//! renamed into place by [`StagedFile::persist`]. A staged file that is
//! dropped without being persisted is removed, so an aborted run leaves no
//! partial artifacts behind. [`persist_all`] extends this to a set of files:
//! a failed rename removes the files it already put in place.

use crate::domain::{IdFactorError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Output file that becomes visible only once persisted
#[derive(Debug)]
pub struct StagedFile {
    target: PathBuf,
    file: NamedTempFile,
}

impl StagedFile {
    /// Stages a new file that will be persisted at `target`
    ///
    /// The temporary file is created in the target's directory so the final
    /// rename never crosses a filesystem.
    pub fn create(target: impl Into<PathBuf>) -> Result<Self> {
        let target = target.into();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".idfactor-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| {
                IdFactorError::Io(format!("failed to stage {}: {e}", target.display()))
            })?;
        Ok(Self { target, file })
    }

    /// Final path of the file
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the staged file to its final path, replacing any existing file
    pub fn persist(self) -> Result<PathBuf> {
        let Self { target, file } = self;
        file.persist(&target).map_err(|e| {
            IdFactorError::Io(format!("failed to persist {}: {}", target.display(), e.error))
        })?;
        Ok(target)
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Persists every staged file, in order
///
/// On the first failure the files already persisted by this call are removed
/// again and the remaining staged files are dropped, so no partial set of
/// artifacts is left behind. Files that an earlier rename replaced are not
/// restored.
pub fn persist_all(files: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    let mut persisted = Vec::with_capacity(files.len());
    for file in files {
        match file.persist() {
            Ok(path) => persisted.push(path),
            Err(e) => {
                for path in &persisted {
                    if let Err(remove_err) = fs::remove_file(path) {
                        tracing::warn!(
                            path = %path.display(),
                            error = %remove_err,
                            "Failed to roll back persisted output"
                        );
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(persisted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_not_visible_until_persisted() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("ssn_elements.psv");

        let mut staged = StagedFile::create(&target).unwrap();
        staged.write_all(b"ssn_id|ssn\n").unwrap();
        assert!(!target.exists());

        let path = staged.persist().unwrap();
        assert_eq!(path, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "ssn_id|ssn\n");
    }

    #[test]
    fn test_dropped_file_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("email_elements.psv");
        {
            let mut staged = StagedFile::create(&target).unwrap();
            staged.write_all(b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_persist_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("map.psv");
        fs::write(&target, "old").unwrap();

        let mut staged = StagedFile::create(&target).unwrap();
        staged.write_all(b"new").unwrap();
        staged.persist().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("phone_elements.psv");
        let err = StagedFile::create(target).unwrap_err();
        assert!(matches!(err, IdFactorError::Io(_)));
    }

    #[test]
    fn test_persist_all_rolls_back_on_failure() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file
        let blocked = dir.path().join("b.psv");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "x").unwrap();

        let files: Vec<_> = ["a.psv", "b.psv", "c.psv"]
            .iter()
            .map(|name| StagedFile::create(dir.path().join(name)).unwrap())
            .collect();
        let err = persist_all(files).unwrap_err();

        assert!(matches!(err, IdFactorError::Io(_)));
        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["b.psv"]);
    }

    #[test]
    fn test_persist_all() {
        let dir = TempDir::new().unwrap();
        let files: Vec<_> = ["a.psv", "b.psv"]
            .iter()
            .map(|name| StagedFile::create(dir.path().join(name)).unwrap())
            .collect();
        let paths = persist_all(files).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.exists()));
    }
}
