//! Attachment data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::mime::{corrected_mime_type, mime_from_extension, OCTET_STREAM};

/// Reference to an encrypted attachment stored remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileDescriptor {
    pub id: String,
    /// Display name shown to the user and suggested when saving
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
}

impl RemoteFileDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// File content held fully in memory
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataFile {
    /// A supplied MIME type is kept as given, even the generic
    /// `application/octet-stream`. Only a missing one is derived from `name`.
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = match mime_type.map(str::trim) {
            Some(mime) if !mime.is_empty() => mime.to_string(),
            _ => mime_from_extension(&name).unwrap_or(OCTET_STREAM).to_string(),
        };
        Self {
            name,
            mime_type,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

// Attachment bytes can be large, keep them out of logs.
impl std::fmt::Debug for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// A file already materialized on the native filesystem
///
/// Its MIME type is corrected from the extension, since native openers pick
/// the handling app from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub name: String,
    pub mime_type: String,
    pub location: PathBuf,
    pub size: u64,
}

impl FileReference {
    pub fn new(name: impl Into<String>, location: PathBuf, size: u64) -> Self {
        let name = name.into();
        Self {
            mime_type: corrected_mime_type(&name, None),
            name,
            location,
            size,
        }
    }
}

/// Decrypted attachment content
///
/// The variant is fixed by the environment that produced it: browser-side
/// workers hand back bytes, native platforms store the file themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum DecryptedPayload {
    #[serde(rename = "DataFile")]
    InMemory(DataFile),
    #[serde(rename = "FileReference")]
    Platform(FileReference),
}

impl DecryptedPayload {
    pub fn name(&self) -> &str {
        match self {
            DecryptedPayload::InMemory(file) => &file.name,
            DecryptedPayload::Platform(file) => &file.name,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            DecryptedPayload::InMemory(file) => &file.mime_type,
            DecryptedPayload::Platform(file) => &file.mime_type,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            DecryptedPayload::InMemory(file) => file.size(),
            DecryptedPayload::Platform(file) => file.size,
        }
    }

    pub fn is_on_device(&self) -> bool {
        matches!(self, DecryptedPayload::Platform(_))
    }
}

impl From<DataFile> for DecryptedPayload {
    fn from(file: DataFile) -> Self {
        DecryptedPayload::InMemory(file)
    }
}

impl From<FileReference> for DecryptedPayload {
    fn from(file: FileReference) -> Self {
        DecryptedPayload::Platform(file)
    }
}
