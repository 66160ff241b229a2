//! Atomic output writing.
//!
//! Output goes to a temporary file next to the target and is renamed into
//! place only once complete. A failed run leaves no partial target, no
//! stray temporary file and none of the directories created for it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Output file that becomes visible only after [`PendingOutput::commit`].
///
/// Dropping it without committing removes the temporary file and any
/// parent directories [`PendingOutput::create`] made.
pub struct PendingOutput {
    // Declared before `created_dirs` so the file is gone before its
    // directories are removed.
    file: NamedTempFile,
    target: PathBuf,
    created_dirs: CreatedDirs,
}

/// Directories created for an output, deepest first, removed on drop
/// unless kept.
struct CreatedDirs(Vec<PathBuf>);

impl CreatedDirs {
    /// Records the ancestors of `dir` (itself included) that do not exist.
    fn missing(dir: &Path) -> Self {
        Self(
            dir.ancestors()
                .filter(|p| !p.as_os_str().is_empty())
                .take_while(|p| !p.exists())
                .map(Path::to_path_buf)
                .collect(),
        )
    }

    fn keep(mut self) {
        self.0.clear();
    }
}

impl Drop for CreatedDirs {
    fn drop(&mut self) {
        for dir in &self.0 {
            // Fails harmlessly when something else now lives there
            if fs::remove_dir(dir).is_ok() {
                tracing::debug!(dir = %dir.display(), "Removed unused output directory");
            }
        }
    }
}

impl PendingOutput {
    /// Reserves a temporary file in the target's directory.
    ///
    /// Missing parent directories are created, and removed again if the
    /// output is dropped without being committed.
    pub fn create(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let write_err = |source| Error::OutputWrite {
            path: target.clone(),
            source,
        };

        let created_dirs = CreatedDirs::missing(&dir);
        fs::create_dir_all(&dir).map_err(write_err)?;

        let file = tempfile::Builder::new()
            .prefix(".mdpage-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(write_err)?;

        tracing::debug!(temp = %file.path().display(), "Reserved temporary output");

        Ok(Self {
            file,
            target,
            created_dirs,
        })
    }

    /// Path of the temporary file, for writers that need a filename.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Final destination.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Appends bytes to the temporary file.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .write_all(bytes)
            .and_then(|_| self.file.flush())
            .map_err(|source| Error::OutputWrite {
                path: self.target.clone(),
                source,
            })
    }

    /// Moves the temporary file onto the target, replacing any previous file.
    pub fn commit(self) -> Result<()> {
        let Self {
            file,
            target,
            created_dirs,
        } = self;

        file.as_file().sync_all().map_err(|source| Error::OutputWrite {
            path: target.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // tempfile creates 0600; published pages should be world readable
            fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644)).map_err(
                |source| Error::OutputWrite {
                    path: target.clone(),
                    source,
                },
            )?;
        }

        file.persist(&target).map_err(|e| Error::OutputWrite {
            path: target.clone(),
            source: e.error,
        })?;

        created_dirs.keep();
        Ok(())
    }
}

/// Writes `bytes` to `target` atomically.
pub fn write_atomic(target: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let mut pending = PendingOutput::create(target)?;
    pending.write(bytes)?;
    pending.commit()
}
