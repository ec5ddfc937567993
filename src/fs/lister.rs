use std::future::Future;
use std::path::PathBuf;

use tracing::{trace, warn};

use crate::error::{AppError, Result};
use crate::tree::Entry;

/// Produces the children of a node.
///
/// Implementations filter (hidden files, non-directories) but do not need to
/// sort; the tree sorts before reconciling. The returned future is detached
/// from `self` so it can be spawned.
pub trait DirectoryLister: Send + Sync + 'static {
    fn list_children(
        &self,
        identity: &str,
    ) -> impl Future<Output = Result<Vec<Entry>>> + Send + 'static;
}

/// Lists real directories with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FsLister {
    pub show_hidden: bool,
    /// Only directories (and symlinks to directories) are listed.
    pub dirs_only: bool,
}

impl Default for FsLister {
    fn default() -> Self {
        Self {
            show_hidden: false,
            dirs_only: true,
        }
    }
}

impl FsLister {
    pub fn new(show_hidden: bool, dirs_only: bool) -> Self {
        Self {
            show_hidden,
            dirs_only,
        }
    }

    /// Read `dir` once.
    ///
    /// Entries whose type cannot be determined (e.g. broken symlinks) or whose
    /// name is not valid UTF-8 are skipped; failing to open or iterate the
    /// directory fails the listing.
    pub async fn read(&self, dir: PathBuf) -> Result<Vec<Entry>> {
        let identity = dir.to_string_lossy().to_string();
        let mut read_dir = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| AppError::listing(identity.clone(), e))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| AppError::listing(identity.clone(), e))?
        {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(dir = %identity, name = ?raw, "skipping entry with non UTF-8 name");
                    continue;
                }
            };
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            let is_dir = match entry.file_type().await {
                Ok(ft) if ft.is_symlink() => tokio::fs::metadata(entry.path())
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false),
                Ok(ft) => ft.is_dir(),
                Err(err) => {
                    trace!(name = %name, error = %err, "skipping entry with unknown type");
                    continue;
                }
            };
            if self.dirs_only && !is_dir {
                continue;
            }

            entries.push(Entry::new(entry.path().to_string_lossy(), name, is_dir));
        }
        Ok(entries)
    }
}

impl DirectoryLister for FsLister {
    fn list_children(
        &self,
        identity: &str,
    ) -> impl Future<Output = Result<Vec<Entry>>> + Send + 'static {
        let lister = self.clone();
        let dir = PathBuf::from(identity);
        async move { lister.read(dir).await }
    }
}
