//! Staging area for resolved source payloads
//!
//! A `StagingArea` is acquired once per run with [`StagingArea::reset`],
//! which removes the whole directory tree left by a previous run and
//! recreates it empty. Every resolved source is written under its
//! category's fixed file name, so at most one staged file exists per
//! category. Runs must not share a staging directory.

use sdk::errors::ReportError;
use sdk::types::SourceCategory;
use std::fs;
use std::path::{Path, PathBuf};

/// Exclusively owned working directory for one run
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Wipe `root` (if it exists) and recreate it empty.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the old tree cannot be removed or the
    /// directory cannot be created. Refuses to wipe a path that is a file.
    pub fn reset(root: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let root = root.into();

        if root.is_file() {
            return Err(ReportError::Config(format!(
                "Staging path is a file, not a directory: {}",
                root.display()
            )));
        }

        if root.exists() {
            tracing::debug!("Removing previous staging directory {}", root.display());
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;

        tracing::info!("Staging directory ready: {}", root.display());
        Ok(Self { root })
    }

    /// Staging directory root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a category is staged under (whether or not it exists yet)
    pub fn path_for(&self, category: SourceCategory) -> PathBuf {
        self.root.join(category.staged_name())
    }

    /// Write a category's payload, replacing any previous one
    pub fn write(&self, category: SourceCategory, bytes: &[u8]) -> Result<PathBuf, ReportError> {
        let path = self.path_for(category);
        fs::write(&path, bytes)?;
        tracing::debug!("Staged {} ({} bytes) at {}", category, bytes.len(), path.display());
        Ok(path)
    }

    /// Whether a category has a staged payload
    pub fn contains(&self, category: SourceCategory) -> bool {
        self.path_for(category).is_file()
    }

    /// Raw staged bytes for a category, if present
    pub fn read_bytes(&self, category: SourceCategory) -> Result<Option<Vec<u8>>, ReportError> {
        let path = self.path_for(category);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read(path)?))
    }

    /// Staged payload as text, if present
    ///
    /// Binary payloads (e.g. a copied `.docx`) are decoded lossily.
    pub fn read_text(&self, category: SourceCategory) -> Result<Option<String>, ReportError> {
        Ok(self
            .read_bytes(category)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Number of entries currently in the staging directory
    pub fn entry_count(&self) -> Result<usize, ReportError> {
        Ok(fs::read_dir(&self.root)?.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("data");

        let staging = StagingArea::reset(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(staging.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_reset_wipes_previous_run() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("data");
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("notes.txt"), "stale notes").unwrap();
        fs::write(root.join("nested/deeper/leftover.bin"), [0u8, 1, 2]).unwrap();

        let staging = StagingArea::reset(&root).unwrap();
        assert_eq!(staging.entry_count().unwrap(), 0);
        assert!(!staging.contains(SourceCategory::Notes));
    }

    #[test]
    fn test_reset_refuses_file_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("data");
        fs::write(&root, "not a dir").unwrap();

        assert!(StagingArea::reset(&root).is_err());
        assert!(root.is_file());
    }

    #[test]
    fn test_write_replaces_category_payload() {
        let temp = TempDir::new().unwrap();
        let staging = StagingArea::reset(temp.path().join("data")).unwrap();

        staging.write(SourceCategory::Attendees, b"name\nAda\n").unwrap();
        staging.write(SourceCategory::Attendees, b"name\nGrace\n").unwrap();

        assert_eq!(staging.entry_count().unwrap(), 1);
        assert_eq!(
            staging.read_text(SourceCategory::Attendees).unwrap().as_deref(),
            Some("name\nGrace\n")
        );
    }

    #[test]
    fn test_read_missing_category() {
        let temp = TempDir::new().unwrap();
        let staging = StagingArea::reset(temp.path().join("data")).unwrap();

        assert!(staging.read_text(SourceCategory::Notes).unwrap().is_none());
    }
}
