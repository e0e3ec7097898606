//! Save strategy for desktop hosts: write into the download directory

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use satchel_file::{sanitize_file_name, DataFile};

use crate::error::DeliveryError;
use crate::strategy::{DeliveryMethod, SaveStrategy};

pub struct DownloadDirSaver {
    download_dir: PathBuf,
}

impl DownloadDirSaver {
    pub fn new(download_dir: PathBuf) -> Self {
        Self { download_dir }
    }

    /// Create the first free file for `name`, appending " (n)" before the
    /// extension. Creation is exclusive, so concurrent saves never share a path.
    async fn create_target(&self, name: &str) -> std::io::Result<(PathBuf, File)> {
        let path = Path::new(name);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("download");
        let extension = path.extension().and_then(|e| e.to_str());

        let mut n = 0u32;
        loop {
            let file_name = match (n, extension) {
                (0, _) => name.to_string(),
                (_, Some(ext)) => format!("{} ({}).{}", stem, n, ext),
                (_, None) => format!("{} ({})", stem, n),
            };
            let candidate = self.download_dir.join(file_name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl SaveStrategy for DownloadDirSaver {
    fn name(&self) -> &'static str {
        "download-dir"
    }

    fn is_available(&self) -> bool {
        !self.download_dir.as_os_str().is_empty()
    }

    async fn attempt(&self, file: &DataFile) -> Result<DeliveryMethod, DeliveryError> {
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| DeliveryError::CannotOpen(e.to_string()))?;

        let (path, mut target) = self
            .create_target(&sanitize_file_name(&file.name))
            .await
            .map_err(|e| DeliveryError::CannotOpen(e.to_string()))?;

        let written = async {
            target.write_all(&file.data).await?;
            target.flush().await
        }
        .await;
        drop(target);
        if let Err(e) = written {
            // no truncated file under the attachment's name
            let _ = tokio::fs::remove_file(&path).await;
            return Err(DeliveryError::CannotOpen(e.to_string()));
        }

        match compute_sha256_hex(path.clone()).await {
            Ok(sha256) => tracing::info!(
                file = %file.name,
                path = %path.display(),
                sha256 = %sha256,
                "Saved attachment to download directory"
            ),
            Err(e) => tracing::info!(
                file = %file.name,
                path = %path.display(),
                hash_error = %e,
                "Saved attachment to download directory"
            ),
        }

        Ok(DeliveryMethod::DownloadDir(path))
    }
}

async fn compute_sha256_hex(path: PathBuf) -> std::io::Result<String> {
    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];

        loop {
            let n = std::io::Read::read(&mut reader, &mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(hex(&hasher.finalize()))
    })
    .await
    .unwrap_or_else(|e| Err(std::io::Error::other(e.to_string())))
}

fn hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
