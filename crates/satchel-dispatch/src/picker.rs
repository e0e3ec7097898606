//! Local file selection
//!
//! A [`FilePicker`] hands out a new [`SelectionSurface`] per invocation. The
//! caller owns the surface and drops it once the selection was read, so a
//! previous pick can never leave state behind that suppresses the next one.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use satchel_file::corrected_mime_type;

/// Constraints for a single picker invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerOptions {
    pub multiple: bool,
    /// Extensions without the leading dot
    pub allowed_extensions: Option<Vec<String>>,
}

impl PickerOptions {
    pub fn new(multiple: bool, allowed_extensions: Option<&[&str]>) -> Self {
        Self {
            multiple,
            allowed_extensions: allowed_extensions
                .map(|exts| exts.iter().map(|e| e.trim_start_matches('.').to_string()).collect()),
        }
    }

    /// Value for an `accept` attribute, e.g. `.pdf,.png`
    pub fn accept(&self) -> Option<String> {
        self.allowed_extensions.as_ref().map(|exts| {
            exts.iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// Whether a file called `name` passes the extension filter
    pub fn allows(&self, name: &str) -> bool {
        let Some(exts) = &self.allowed_extensions else {
            return true;
        };
        let Some(ext) = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
        else {
            return false;
        };
        exts.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// A file the user picked, not yet read
#[async_trait]
pub trait LocalFile: Send + Sync {
    fn name(&self) -> &str;

    fn mime_type(&self) -> Option<&str> {
        None
    }

    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

/// One-shot selection UI
#[async_trait]
pub trait SelectionSurface: Send {
    /// Wait for the user to finish. Cancelling yields an empty selection.
    async fn present(&mut self) -> Vec<Box<dyn LocalFile>>;
}

pub trait FilePicker: Send + Sync {
    fn surface(&self, options: &PickerOptions) -> Box<dyn SelectionSurface>;
}

/// A picked file on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalPath {
    name: String,
    path: PathBuf,
    mime_type: String,
}

impl LocalPath {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = corrected_mime_type(&name, None);
        Self {
            name,
            path,
            mime_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocalFile for LocalPath {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        Some(&self.mime_type)
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
