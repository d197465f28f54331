//! Recursive directory copy preserving type, ownership and permissions

use std::fs::{self, Metadata, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::{debug, trace};

use super::file::{create_if_not_exists, set_file_mode};
use crate::domain::DomainError;

/// Mode used for directories created during a copy
pub const DIR_MODE: u32 = 0o755;

/// Creation mode for copied files; the source mode is applied afterwards
const COPY_FILE_MODE: u32 = 0o777;

/// Kind of a directory entry, determined without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Symlink,
    File,
}

impl EntryKind {
    pub fn of(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else {
            Self::File
        }
    }
}

/// Numeric owner and group of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

impl Ownership {
    /// Read the owner from `metadata`
    ///
    /// `path` is only used to name the entry in the error on platforms
    /// without numeric ownership.
    #[cfg(unix)]
    pub fn of(_path: &Path, metadata: &Metadata) -> Result<Self, DomainError> {
        use std::os::unix::fs::MetadataExt;

        Ok(Self {
            uid: metadata.uid(),
            gid: metadata.gid(),
        })
    }

    #[cfg(not(unix))]
    pub fn of(path: &Path, _metadata: &Metadata) -> Result<Self, DomainError> {
        Err(DomainError::unsupported(format!(
            "failed to get ownership metadata for '{}'",
            path.display()
        )))
    }

    /// Apply this ownership to `path` without following a final symlink
    #[cfg(unix)]
    pub fn apply(&self, path: &Path) -> Result<(), DomainError> {
        std::os::unix::fs::lchown(path, Some(self.uid), Some(self.gid))
            .map_err(|e| DomainError::io(path, e))
    }

    #[cfg(not(unix))]
    pub fn apply(&self, path: &Path) -> Result<(), DomainError> {
        Err(DomainError::unsupported(format!(
            "cannot change ownership of '{}' on this platform",
            path.display()
        )))
    }
}

/// Copy the contents of `source` into `target`
///
/// `target` is created with mode 0755 when missing. Entries are copied in
/// directory-listing order; the first failure aborts the copy and is
/// returned as-is, leaving already copied entries in place.
pub fn copy_directory(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<(), DomainError> {
    let source = source.as_ref();
    let target = target.as_ref();

    debug!(source = %source.display(), target = %target.display(), "Copying directory");

    create_if_not_exists(target, DIR_MODE)?;
    copy_entries(source, target)
}

fn copy_entries(source: &Path, target: &Path) -> Result<(), DomainError> {
    let entries = fs::read_dir(source).map_err(|e| DomainError::io(source, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| DomainError::io(source, e))?;
        let source_path = entry.path();
        let target_path = target.join(entry.file_name());

        let metadata =
            fs::symlink_metadata(&source_path).map_err(|e| DomainError::io(&source_path, e))?;
        let ownership = Ownership::of(&source_path, &metadata)?;
        let kind = EntryKind::of(&metadata);

        trace!(path = %source_path.display(), ?kind, "Copying entry");

        match kind {
            EntryKind::Directory => {
                create_if_not_exists(&target_path, DIR_MODE)?;
                copy_entries(&source_path, &target_path)?;
            }
            EntryKind::Symlink => copy_symlink(&source_path, &target_path)?,
            EntryKind::File => copy_file(&source_path, &target_path)?,
        }

        ownership.apply(&target_path)?;

        if kind != EntryKind::Symlink {
            fs::set_permissions(&target_path, metadata.permissions())
                .map_err(|e| DomainError::io(&target_path, e))?;
        }
    }

    Ok(())
}

/// Copy a regular file's bytes, replacing any existing target content
pub fn copy_file(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<(), DomainError> {
    let source = source.as_ref();
    let target = target.as_ref();

    let data = fs::read(source).map_err(|e| DomainError::io(source, e))?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    set_file_mode(&mut options, COPY_FILE_MODE);

    options
        .open(target)
        .and_then(|mut file| file.write_all(&data))
        .map_err(|e| DomainError::io(target, e))
}

/// Recreate a symlink with the same literal target; the link is not resolved
#[cfg(unix)]
pub fn copy_symlink(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<(), DomainError> {
    let source = source.as_ref();
    let target = target.as_ref();

    let link = fs::read_link(source).map_err(|e| DomainError::io(source, e))?;
    std::os::unix::fs::symlink(&link, target).map_err(|e| DomainError::io(target, e))
}

#[cfg(not(unix))]
pub fn copy_symlink(source: impl AsRef<Path>, _target: impl AsRef<Path>) -> Result<(), DomainError> {
    Err(DomainError::unsupported(format!(
        "cannot copy symlink '{}' on this platform",
        source.as_ref().display()
    )))
}
