//! Native file store
//!
//! Native platforms keep decrypted attachments in an app-private cache
//! directory and hand out [`FileReference`]s to them.

use std::path::{Path, PathBuf};

use crate::error::FileError;
use crate::file::{DataFile, FileReference};
use crate::mime::{corrected_mime_type, sanitize_file_name};
use crate::Result;

#[derive(Debug, Clone)]
pub struct NativeFileStore {
    cache_dir: PathBuf,
}

impl NativeFileStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Build a reference to a file already on the device
    pub async fn reference(&self, path: &Path) -> Result<FileReference> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(FileError::NotFound(path.display().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::NotFound(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FileError::InvalidName(path.display().to_string()))?
            .to_string();

        Ok(FileReference {
            mime_type: corrected_mime_type(&name, None),
            name,
            location: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    /// Materialize an in-memory file inside the cache directory.
    ///
    /// Every write gets its own subdirectory so two attachments with the
    /// same display name never overwrite each other.
    pub async fn write(&self, file: &DataFile) -> Result<FileReference> {
        let dir = self.cache_dir.join(uuid::Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let location = dir.join(sanitize_file_name(&file.name));
        tokio::fs::write(&location, &file.data).await?;

        tracing::debug!(
            file = %file.name,
            location = %location.display(),
            size = file.data.len(),
            "Stored file in cache"
        );

        Ok(FileReference {
            name: file.name.clone(),
            mime_type: corrected_mime_type(&file.name, Some(&file.mime_type)),
            location,
            size: file.size(),
        })
    }

    /// Delete a cached file.
    ///
    /// Files outside the cache directory are never touched; `Ok(false)` is
    /// returned for them.
    pub async fn delete(&self, file: &FileReference) -> Result<bool> {
        if !self.contains(&file.location) {
            tracing::debug!(
                location = %file.location.display(),
                "Not deleting file outside of cache"
            );
            return Ok(false);
        }

        match tokio::fs::remove_file(&file.location).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::NotFound(file.location.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        // Drop the per-write directory if it is now empty
        if let Some(parent) = file.location.parent() {
            if parent != self.cache_dir {
                let _ = tokio::fs::remove_dir(parent).await;
            }
        }

        Ok(true)
    }

    /// Remove everything in the cache directory, returning the number of
    /// top-level entries removed
    pub async fn clear(&self) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
            removed += 1;
        }

        tracing::info!(removed, "Cleared file cache");

        Ok(removed)
    }

    fn contains(&self, path: &Path) -> bool {
        let canonical_root = std::fs::canonicalize(&self.cache_dir);
        let canonical_path = std::fs::canonicalize(path);
        match (canonical_root, canonical_path) {
            (Ok(root), Ok(path)) => path.starts_with(root),
            _ => path.starts_with(&self.cache_dir),
        }
    }
}
