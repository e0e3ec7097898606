//! Attachment I/O dispatcher
//!
//! Fetches decrypted attachments and gets them to the user, and reads local
//! files the user picks for attaching. Every public operation reports its
//! failures to the user itself and never hands an error back to the caller.

use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use satchel_file::{DataFile, DecryptedPayload, RemoteFileDescriptor};

use crate::capability::{AttachmentSource, NativeOpener, Notifier, ProgressIndicator};
use crate::error::{DeliveryError, DispatchError, FailureKind, FetchError};
use crate::message::{MessageKey, Notice};
use crate::picker::{FilePicker, LocalFile, PickerOptions};
use crate::strategy::{DeliveryMethod, SaveStrategy};

/// Environment the dispatcher runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser sandbox: payloads arrive in memory and must be saved
    #[default]
    Browser,
    /// Native app: the platform layer stores downloads itself
    Native,
}

impl Platform {
    pub fn is_native(&self) -> bool {
        matches!(self, Platform::Native)
    }
}

/// What to do with a local selection when some files cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalReadPolicy {
    /// Any failed read discards the whole selection
    #[default]
    AbortBatch,
    /// Return the files that could be read
    KeepSuccessful,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub platform: Platform,
    /// Parallel fetches per batch on non-native platforms
    pub batch_concurrency: usize,
    pub local_read_policy: LocalReadPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Browser,
            batch_concurrency: 4,
            local_read_policy: LocalReadPolicy::AbortBatch,
        }
    }
}

/// Result of fetching or delivering one attachment, as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(DeliveryMethod),
    /// Native platform kept the file in its download location
    LeftOnDevice,
    /// The operation failed and the user has been told
    Notified(FailureKind),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeliveryOutcome::Notified(_))
    }
}

/// Host capabilities wired into a dispatcher
#[derive(Clone)]
pub struct Capabilities {
    pub source: Arc<dyn AttachmentSource>,
    pub opener: Arc<dyn NativeOpener>,
    pub notifier: Arc<dyn Notifier>,
    pub progress: Arc<dyn ProgressIndicator>,
    pub picker: Arc<dyn FilePicker>,
}

pub struct Dispatcher {
    config: DispatcherConfig,
    capabilities: Capabilities,
    /// Tried in order, first available wins
    strategies: Vec<Box<dyn SaveStrategy>>,
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        capabilities: Capabilities,
        strategies: Vec<Box<dyn SaveStrategy>>,
    ) -> Self {
        Self {
            config,
            capabilities,
            strategies,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Download one attachment and deliver it
    pub async fn fetch_and_deliver(&self, descriptor: &RemoteFileDescriptor) -> DeliveryOutcome {
        self.with_progress(async {
            match self
                .capabilities
                .source
                .download_file_content(descriptor)
                .await
            {
                Ok(_) if self.config.platform.is_native() => {
                    tracing::debug!(file_id = %descriptor.id, "Attachment stored by platform");
                    DeliveryOutcome::LeftOnDevice
                }
                Ok(payload) => self.deliver(&payload).await,
                Err(e) => {
                    tracing::warn!(file_id = %descriptor.id, error = %e, "Attachment download failed");
                    let key = fetch_failure_key(&e);
                    self.capabilities.notifier.error(Notice::new(key)).await;
                    DeliveryOutcome::Notified(key.kind())
                }
            }
        })
        .await
    }

    /// Download several attachments and deliver them in input order.
    ///
    /// A failing item is reported on its own and does not stop the others.
    pub async fn fetch_and_deliver_all(
        &self,
        descriptors: &[RemoteFileDescriptor],
    ) -> Vec<DeliveryOutcome> {
        self.with_progress(async {
            let fetched: Vec<Result<DecryptedPayload, FailureKind>> =
                if self.config.platform.is_native() {
                    let mut fetched = Vec::with_capacity(descriptors.len());
                    for descriptor in descriptors {
                        fetched.push(self.fetch_one(descriptor).await);
                    }
                    fetched
                } else {
                    stream::iter(descriptors)
                        .map(|descriptor| self.fetch_one(descriptor))
                        .buffered(self.config.batch_concurrency.max(1))
                        .collect()
                        .await
                };

            let mut outcomes = Vec::with_capacity(fetched.len());
            for result in fetched {
                let outcome = match result {
                    Ok(_) if self.config.platform.is_native() => DeliveryOutcome::LeftOnDevice,
                    Ok(payload) => self.deliver(&payload).await,
                    Err(kind) => DeliveryOutcome::Notified(kind),
                };
                outcomes.push(outcome);
            }

            tracing::info!(
                total = descriptors.len(),
                failed = outcomes.iter().filter(|o| !o.is_success()).count(),
                "Finished attachment batch"
            );

            outcomes
        })
        .await
    }

    async fn fetch_one(
        &self,
        descriptor: &RemoteFileDescriptor,
    ) -> Result<DecryptedPayload, FailureKind> {
        match self
            .capabilities
            .source
            .download_file_content(descriptor)
            .await
        {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(
                    file_id = %descriptor.id,
                    file = %descriptor.name,
                    error = %e,
                    "Attachment download failed"
                );
                let key = fetch_failure_key(&e);
                self.capabilities
                    .notifier
                    .error(Notice::about(key, descriptor.name.clone()))
                    .await;
                Err(key.kind())
            }
        }
    }

    /// Open or save a payload, telling the user if that fails
    pub async fn deliver(&self, payload: &DecryptedPayload) -> DeliveryOutcome {
        match self.try_deliver(payload).await {
            Ok(method) => {
                tracing::info!(file = %payload.name(), method = ?method, "Delivered attachment");
                DeliveryOutcome::Delivered(method)
            }
            Err(e) => {
                tracing::warn!(file = %payload.name(), error = %e, "Could not deliver attachment");
                let key = delivery_failure_key(&e);
                self.capabilities.notifier.error(Notice::new(key)).await;
                DeliveryOutcome::Notified(key.kind())
            }
        }
    }

    /// The save/open policy without the notification boundary
    pub async fn try_deliver(
        &self,
        payload: &DecryptedPayload,
    ) -> Result<DeliveryMethod, DeliveryError> {
        match payload {
            DecryptedPayload::Platform(file) => {
                self.capabilities.opener.open(file).await?;
                Ok(DeliveryMethod::NativeOpen)
            }
            DecryptedPayload::InMemory(file) => {
                let strategy = self
                    .strategies
                    .iter()
                    .find(|s| s.is_available())
                    .ok_or(DeliveryError::Unsupported)?;

                tracing::debug!(file = %file.name, strategy = strategy.name(), "Saving attachment");
                strategy.attempt(file).await
            }
        }
    }

    /// Let the user pick local files and read them into memory.
    ///
    /// Cancelling yields an empty list. Read failures are reported to the
    /// user; see [`LocalReadPolicy`] for what is returned then.
    pub async fn select_local_files(
        &self,
        allow_multiple: bool,
        allowed_extensions: Option<&[&str]>,
    ) -> Vec<DataFile> {
        let options = PickerOptions::new(allow_multiple, allowed_extensions);

        // The surface lives only for this invocation
        let selection = {
            let mut surface = self.capabilities.picker.surface(&options);
            surface.present().await
        };

        if selection.is_empty() {
            tracing::debug!("File selection cancelled");
            return Vec::new();
        }

        // Hosts treat `accept` as a hint only
        let selection: Vec<Box<dyn LocalFile>> = selection
            .into_iter()
            .filter(|file| {
                let allowed = options.allows(file.name());
                if !allowed {
                    tracing::warn!(file = %file.name(), "Skipping file with disallowed extension");
                }
                allowed
            })
            .collect();
        if selection.is_empty() {
            return Vec::new();
        }

        let (files, errors) = self.read_selection(&selection).await;
        if errors.is_empty() {
            return files;
        }

        for e in &errors {
            tracing::warn!(error = %e, "Could not read selected file");
        }
        self.capabilities
            .notifier
            .error(Notice::new(MessageKey::CouldNotAttachFile))
            .await;

        match self.config.local_read_policy {
            LocalReadPolicy::AbortBatch => Vec::new(),
            LocalReadPolicy::KeepSuccessful => files,
        }
    }

    /// Read every selected file fully, keeping selection order
    pub async fn read_local_files(
        &self,
        selection: &[Box<dyn LocalFile>],
    ) -> crate::Result<Vec<DataFile>> {
        let (files, errors) = self.read_selection(selection).await;

        match (self.config.local_read_policy, errors.into_iter().next()) {
            (LocalReadPolicy::AbortBatch, Some(e)) => Err(e),
            _ => Ok(files),
        }
    }

    async fn read_selection(
        &self,
        selection: &[Box<dyn LocalFile>],
    ) -> (Vec<DataFile>, Vec<DispatchError>) {
        let reads = join_all(selection.iter().map(|file| read_local_file(file.as_ref()))).await;

        let mut files = Vec::with_capacity(reads.len());
        let mut errors = Vec::new();
        for read in reads {
            match read {
                Ok(file) => files.push(file),
                Err(e) => errors.push(e),
            }
        }
        (files, errors)
    }

    async fn with_progress<F: Future>(&self, operation: F) -> F::Output {
        self.capabilities.progress.show(MessageKey::PleaseWait);
        let output = operation.await;
        self.capabilities.progress.dismiss();
        output
    }
}

async fn read_local_file(file: &dyn LocalFile) -> crate::Result<DataFile> {
    let data = file.read().await.map_err(|e| {
        tracing::debug!(file = %file.name(), error = %e, "Local read failed");
        DispatchError::CouldNotLoadFile(file.name().to_string())
    })?;
    Ok(DataFile::new(file.name(), file.mime_type(), data))
}

fn fetch_failure_key(error: &FetchError) -> MessageKey {
    match error {
        FetchError::Crypto(_) => MessageKey::Corrupted,
        FetchError::Io(_) => MessageKey::CouldNotAttachFile,
    }
}

fn delivery_failure_key(error: &DeliveryError) -> MessageKey {
    match error {
        DeliveryError::SaveNotPossible { .. } => MessageKey::SaveDownloadNotPossible,
        DeliveryError::CannotOpen(_) | DeliveryError::Unsupported | DeliveryError::Open(_) => {
            MessageKey::CanNotOpenFileOnDevice
        }
    }
}
