//! Host capabilities the dispatcher depends on

use async_trait::async_trait;

use satchel_file::{DecryptedPayload, FileReference, RemoteFileDescriptor};

use crate::error::{FetchError, OpenError};
use crate::message::{MessageKey, Notice};

/// Downloads an encrypted attachment and decrypts it.
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    async fn download_file_content(
        &self,
        descriptor: &RemoteFileDescriptor,
    ) -> Result<DecryptedPayload, FetchError>;
}

/// Opens a file already stored on the native filesystem.
#[async_trait]
pub trait NativeOpener: Send + Sync {
    async fn open(&self, file: &FileReference) -> Result<(), OpenError>;
}

/// Modal error dialog. Resolves once the user dismissed it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn error(&self, notice: Notice);
}

/// Blocking overlay shown while an operation runs
pub trait ProgressIndicator: Send + Sync {
    fn show(&self, message: MessageKey);
    fn dismiss(&self);
}
