//! In-memory capability fakes shared by the unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use satchel_file::{DecryptedPayload, FileReference, RemoteFileDescriptor};

use crate::capability::{AttachmentSource, NativeOpener, Notifier, ProgressIndicator};
use crate::error::{FetchError, HostError, OpenError};
use crate::message::{MessageKey, Notice};
use crate::picker::{FilePicker, LocalFile, PickerOptions, SelectionSurface};
use crate::strategy::{Blob, BrowserHost, ObjectUrl, SaveBlobApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SaveBlob {
        api: SaveBlobApi,
        name: String,
        mime_type: String,
        data: Vec<u8>,
    },
    CreateObjectUrl {
        mime_type: String,
        data: Vec<u8>,
    },
    Revoke(ObjectUrl),
    ClickLink {
        url: ObjectUrl,
        name: String,
    },
    Legacy {
        url: ObjectUrl,
        name: String,
    },
}

#[derive(Default)]
pub struct FakeBrowser {
    save_apis: Vec<SaveBlobApi>,
    download_attribute: bool,
    fail_save: bool,
    fail_click: bool,
    calls: Mutex<Vec<HostCall>>,
    live_urls: Mutex<Vec<ObjectUrl>>,
    next_url: AtomicUsize,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save_apis(mut self, apis: Vec<SaveBlobApi>) -> Self {
        self.save_apis = apis;
        self
    }

    pub fn with_download_attribute(mut self) -> Self {
        self.download_attribute = true;
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn failing_click(mut self) -> Self {
        self.fail_click = true;
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn live_urls(&self) -> Vec<ObjectUrl> {
        self.live_urls.lock().clone()
    }

    /// Names of every file that reached the user, in order
    pub fn delivered_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                HostCall::SaveBlob { name, .. }
                | HostCall::ClickLink { name, .. }
                | HostCall::Legacy { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BrowserHost for FakeBrowser {
    fn save_blob_apis(&self) -> Vec<SaveBlobApi> {
        self.save_apis.clone()
    }

    fn save_blob(&self, api: SaveBlobApi, blob: Blob<'_>, name: &str) -> Result<(), HostError> {
        if self.fail_save {
            return Err(HostError("access denied".to_string()));
        }
        self.calls.lock().push(HostCall::SaveBlob {
            api,
            name: name.to_string(),
            mime_type: blob.mime_type.to_string(),
            data: blob.data.to_vec(),
        });
        Ok(())
    }

    fn supports_download_attribute(&self) -> bool {
        self.download_attribute
    }

    fn create_object_url(&self, blob: Blob<'_>) -> Result<ObjectUrl, HostError> {
        let n = self.next_url.fetch_add(1, Ordering::SeqCst);
        let url = ObjectUrl(format!("blob:https://app.local/{}", n));
        self.calls.lock().push(HostCall::CreateObjectUrl {
            mime_type: blob.mime_type.to_string(),
            data: blob.data.to_vec(),
        });
        self.live_urls.lock().push(url.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &ObjectUrl) {
        self.calls.lock().push(HostCall::Revoke(url.clone()));
        self.live_urls.lock().retain(|u| u != url);
    }

    fn click_download_link(&self, url: &ObjectUrl, name: &str) -> Result<(), HostError> {
        if self.fail_click {
            return Err(HostError("click blocked".to_string()));
        }
        self.calls.lock().push(HostCall::ClickLink {
            url: url.clone(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn legacy_download(&self, name: &str, url: ObjectUrl) -> Result<(), HostError> {
        self.calls.lock().push(HostCall::Legacy {
            url,
            name: name.to_string(),
        });
        Ok(())
    }
}

/// Attachment source answering from a fixed table, with per-item latency
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, (Duration, Result<DecryptedPayload, FetchError>)>,
    requested: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        id: &str,
        delay_ms: u64,
        response: Result<DecryptedPayload, FetchError>,
    ) -> Self {
        self.responses
            .insert(id.to_string(), (Duration::from_millis(delay_ms), response));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().clone()
    }

    /// Most fetches that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttachmentSource for FakeSource {
    async fn download_file_content(
        &self,
        descriptor: &RemoteFileDescriptor,
    ) -> Result<DecryptedPayload, FetchError> {
        self.requested.lock().push(descriptor.id.clone());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        let (delay, response) = self
            .responses
            .get(&descriptor.id)
            .cloned()
            .unwrap_or_else(|| (Duration::ZERO, Err(FetchError::Io("not found".to_string()))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().push(descriptor.id.clone());
        response
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn error(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Show(MessageKey),
    Dismiss,
}

#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }
}

impl ProgressIndicator for RecordingProgress {
    fn show(&self, message: MessageKey) {
        self.events.lock().push(ProgressEvent::Show(message));
    }

    fn dismiss(&self) {
        self.events.lock().push(ProgressEvent::Dismiss);
    }
}

#[derive(Default)]
pub struct FakeOpener {
    fail: bool,
    opened: Mutex<Vec<FileReference>>,
}

impl FakeOpener {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<FileReference> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl NativeOpener for FakeOpener {
    async fn open(&self, file: &FileReference) -> Result<(), OpenError> {
        if self.fail {
            return Err(OpenError {
                file: file.name.clone(),
                reason: "no application registered".to_string(),
            });
        }
        self.opened.lock().push(file.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeLocalFile {
    name: String,
    content: Option<Vec<u8>>,
}

impl FakeLocalFile {
    pub fn ok(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            content: Some(content.to_vec()),
        }
    }

    pub fn broken(name: &str) -> Self {
        Self {
            name: name.to_string(),
            content: None,
        }
    }
}

#[async_trait]
impl LocalFile for FakeLocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        self.content
            .clone()
            .ok_or_else(|| std::io::Error::other("read aborted"))
    }
}

/// Picker whose surfaces refuse to be presented twice, like a file input
/// that still holds its previous value
#[derive(Default)]
pub struct FakePicker {
    selection: Vec<FakeLocalFile>,
    created: Arc<AtomicUsize>,
    disposed: Arc<AtomicUsize>,
    options: Mutex<Vec<PickerOptions>>,
}

impl FakePicker {
    pub fn selecting(selection: Vec<FakeLocalFile>) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn disposed(&self) -> usize {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn options(&self) -> Vec<PickerOptions> {
        self.options.lock().clone()
    }
}

impl FilePicker for FakePicker {
    fn surface(&self, options: &PickerOptions) -> Box<dyn SelectionSurface> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.options.lock().push(options.clone());
        Box::new(FakeSurface {
            selection: self.selection.clone(),
            used: false,
            disposed: self.disposed.clone(),
        })
    }
}

struct FakeSurface {
    selection: Vec<FakeLocalFile>,
    used: bool,
    disposed: Arc<AtomicUsize>,
}

#[async_trait]
impl SelectionSurface for FakeSurface {
    async fn present(&mut self) -> Vec<Box<dyn LocalFile>> {
        if self.used {
            return Vec::new();
        }
        self.used = true;
        self.selection
            .iter()
            .cloned()
            .map(|f| Box::new(f) as Box<dyn LocalFile>)
            .collect()
    }
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}
