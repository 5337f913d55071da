//! Project-rooted document store.

use crate::error::{FilesError, Result};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of [`DocumentStore::write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The document already holds the content; nothing was written
    Unchanged,
    /// The document was written
    Written,
    /// Dry run: the document would have been written
    WouldWrite,
}

impl WriteStatus {
    /// Returns `true` unless the content was already current.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Outcome of [`DocumentStore::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStatus {
    /// Nothing existed at the path
    Absent,
    /// The file or directory was removed
    Removed,
    /// Dry run: the file or directory would have been removed
    WouldRemove,
}

/// Reads and writes documents relative to a project root.
///
/// Every mutation passes through this type, so the dry-run flag is the one
/// write gate for the whole pipeline. Writes are atomic: content goes to a
/// temporary file in the target directory, is synced, and is renamed over
/// the target. If the rename fails the target is overwritten directly.
///
/// # Examples
///
/// ```
/// use raglib_files::{DocumentStore, WriteStatus};
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let store = DocumentStore::new(dir.path(), false);
///
/// assert_eq!(store.write_if_changed("docs/a.md", "# A\n").unwrap(), WriteStatus::Written);
/// assert_eq!(store.write_if_changed("docs/a.md", "# A\n").unwrap(), WriteStatus::Unchanged);
/// assert_eq!(store.read("docs/a.md").unwrap(), "# A\n");
///
/// let dry = DocumentStore::new(dir.path(), true);
/// assert_eq!(dry.write_if_changed("docs/a.md", "# B\n").unwrap(), WriteStatus::WouldWrite);
/// assert_eq!(store.read("docs/a.md").unwrap(), "# A\n");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    dry_run: bool,
}

impl DocumentStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if mutations are only planned.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Resolves a project-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidPath`] for absolute paths and paths
    /// containing `..`.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || relative.as_os_str().is_empty() {
            return Err(FilesError::InvalidPath {
                path: relative.to_path_buf(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Returns `true` if the path exists.
    #[must_use]
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.resolve(relative).is_ok_and(|path| path.exists())
    }

    /// Reads a UTF-8 document.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] if the document is missing,
    /// [`FilesError::NotUtf8`] if it cannot be decoded, or
    /// [`FilesError::Io`] for other failures.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.resolve(relative)?;
        fs::read_to_string(&path).map_err(|e| FilesError::io(path, e))
    }

    /// Writes `content` unless the document already holds it.
    ///
    /// Parent directories are created as needed. In dry-run mode nothing
    /// is written and [`WriteStatus::WouldWrite`] is returned for every
    /// write that would have happened.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError`] if the current content cannot be read or the
    /// new content cannot be written.
    pub fn write_if_changed(
        &self,
        relative: impl AsRef<Path>,
        content: &str,
    ) -> Result<WriteStatus> {
        let relative = relative.as_ref();
        match self.read(relative) {
            Ok(current) if current == content => return Ok(WriteStatus::Unchanged),
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if self.dry_run {
            debug!("Dry run: would write {}", relative.display());
            return Ok(WriteStatus::WouldWrite);
        }

        let path = self.resolve(relative)?;
        write_atomic(&path, content)?;
        debug!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(WriteStatus::Written)
    }

    /// Removes a file or a directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError`] if removal fails.
    pub fn remove(&self, relative: impl AsRef<Path>) -> Result<RemoveStatus> {
        let path = self.resolve(relative)?;
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            return Ok(RemoveStatus::Absent);
        };
        if self.dry_run {
            debug!("Dry run: would remove {}", path.display());
            return Ok(RemoveStatus::WouldRemove);
        }

        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| FilesError::io(&path, e))?;
        debug!("Removed {}", path.display());
        Ok(RemoveStatus::Removed)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| FilesError::io(parent, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".raglib-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| FilesError::io(parent, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| FilesError::io(temp.path(), e))?;

    if let Err(e) = temp.persist(path) {
        warn!(
            "Atomic rename onto {} failed ({}); overwriting in place",
            path.display(),
            e.error
        );
        drop(e.file);
        fs::write(path, content).map_err(|e| FilesError::io(path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path(), false);

        let status = store
            .write_if_changed("examples/chunking_benchmark_auto.rs", "fn main() {}\n")
            .unwrap();
        assert_eq!(status, WriteStatus::Written);
        assert!(dir.path().join("examples/chunking_benchmark_auto.rs").exists());
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path(), false);
        store.write_if_changed("a.md", "one").unwrap();
        store.write_if_changed("a.md", "two").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["a.md"]);
        assert_eq!(store.read("a.md").unwrap(), "two");
    }

    #[test]
    fn test_dry_run_never_writes() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path(), true);

        assert_eq!(store.write_if_changed("new.md", "x").unwrap(), WriteStatus::WouldWrite);
        assert!(!dir.path().join("new.md").exists());
    }

    #[test]
    fn test_dry_run_reports_unchanged() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "same").unwrap();
        let store = DocumentStore::new(dir.path(), true);
        assert_eq!(store.write_if_changed("a.md", "same").unwrap(), WriteStatus::Unchanged);
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path(), false);

        assert!(matches!(
            store.write_if_changed("../outside.md", "x"),
            Err(FilesError::InvalidPath { .. })
        ));
        assert!(store.resolve("").is_err());
        assert!(!store.exists("../outside.md"));
    }

    #[test]
    fn test_read_missing_document() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path(), false);
        assert!(store.read("missing.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_directory_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("site/css")).unwrap();
        fs::write(dir.path().join("site/index.html"), "<html>").unwrap();

        let dry = DocumentStore::new(dir.path(), true);
        assert_eq!(dry.remove("site").unwrap(), RemoveStatus::WouldRemove);
        assert!(dir.path().join("site").exists());

        let store = DocumentStore::new(dir.path(), false);
        assert_eq!(store.remove("site").unwrap(), RemoveStatus::Removed);
        assert_eq!(store.remove("site").unwrap(), RemoveStatus::Absent);
    }
}
