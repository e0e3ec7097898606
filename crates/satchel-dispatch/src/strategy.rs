//! Save strategies
//!
//! Each strategy is one way of getting an in-memory file onto the user's
//! device. The dispatcher walks an ordered list and uses the first strategy
//! that reports itself available; it never tries a second one for the same
//! file.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use satchel_file::DataFile;

use crate::error::{DeliveryError, HostError};

/// How a payload ended up being delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMethod {
    /// Handed to the platform's native opener
    NativeOpen,
    /// Passed to a save-blob API of the host
    SaveBlob(SaveBlobApi),
    /// Clicked a hidden link carrying the `download` attribute
    DownloadLink,
    /// Shown through the legacy download dialog
    LegacyDownload,
    /// Written to the download directory
    DownloadDir(PathBuf),
}

#[async_trait]
pub trait SaveStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    async fn attempt(&self, file: &DataFile) -> Result<DeliveryMethod, DeliveryError>;
}

/// Save-blob APIs a browser host may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveBlobApi {
    MsSaveOrOpenBlob,
    MsSaveBlob,
    SaveAs,
    WebkitSaveAs,
    MozSaveAs,
    MsSaveAs,
    SaveBlob,
    MozSaveBlob,
    WebkitSaveBlob,
}

impl SaveBlobApi {
    /// Probe order. The IE variants must be called directly, so they go first.
    pub const PRIORITY: [SaveBlobApi; 9] = [
        SaveBlobApi::MsSaveOrOpenBlob,
        SaveBlobApi::MsSaveBlob,
        SaveBlobApi::SaveAs,
        SaveBlobApi::WebkitSaveAs,
        SaveBlobApi::MozSaveAs,
        SaveBlobApi::MsSaveAs,
        SaveBlobApi::SaveBlob,
        SaveBlobApi::MozSaveBlob,
        SaveBlobApi::WebkitSaveBlob,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaveBlobApi::MsSaveOrOpenBlob => "navigator.msSaveOrOpenBlob",
            SaveBlobApi::MsSaveBlob => "navigator.msSaveBlob",
            SaveBlobApi::SaveAs => "window.saveAs",
            SaveBlobApi::WebkitSaveAs => "window.webkitSaveAs",
            SaveBlobApi::MozSaveAs => "window.mozSaveAs",
            SaveBlobApi::MsSaveAs => "window.msSaveAs",
            SaveBlobApi::SaveBlob => "navigator.saveBlob",
            SaveBlobApi::MozSaveBlob => "navigator.mozSaveBlob",
            SaveBlobApi::WebkitSaveBlob => "navigator.webkitSaveBlob",
        }
    }
}

/// Binary object handed to browser APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob<'a> {
    pub data: &'a [u8],
    pub mime_type: &'a str,
}

impl<'a> From<&'a DataFile> for Blob<'a> {
    fn from(file: &'a DataFile) -> Self {
        Self {
            data: &file.data,
            mime_type: &file.mime_type,
        }
    }
}

/// Reference-counted URL pointing at a blob
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(pub String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Download surface of a browser
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Save-blob APIs present on this host, in any order
    fn save_blob_apis(&self) -> Vec<SaveBlobApi>;

    fn save_blob(&self, api: SaveBlobApi, blob: Blob<'_>, name: &str) -> Result<(), HostError>;

    fn supports_download_attribute(&self) -> bool;

    fn create_object_url(&self, blob: Blob<'_>) -> Result<ObjectUrl, HostError>;

    fn revoke_object_url(&self, url: &ObjectUrl);

    /// Append a hidden `<a download>` link, click it and remove it again
    fn click_download_link(&self, url: &ObjectUrl, name: &str) -> Result<(), HostError>;

    /// Let the user open the URL in a new surface. Takes over the URL.
    async fn legacy_download(&self, name: &str, url: ObjectUrl) -> Result<(), HostError>;
}

/// Ordered strategy list for a browser host
pub fn browser_strategies(host: Arc<dyn BrowserHost>) -> Vec<Box<dyn SaveStrategy>> {
    vec![
        Box::new(NativeSaveStrategy::new(host.clone())),
        Box::new(DownloadLinkStrategy::new(host.clone())),
        Box::new(LegacyDownloadStrategy::new(host)),
    ]
}

pub struct NativeSaveStrategy {
    host: Arc<dyn BrowserHost>,
}

impl NativeSaveStrategy {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self { host }
    }

    fn probe(&self) -> Option<SaveBlobApi> {
        let present = self.host.save_blob_apis();
        SaveBlobApi::PRIORITY
            .into_iter()
            .find(|api| present.contains(api))
    }
}

#[async_trait]
impl SaveStrategy for NativeSaveStrategy {
    fn name(&self) -> &'static str {
        "save-blob"
    }

    fn is_available(&self) -> bool {
        self.probe().is_some()
    }

    async fn attempt(&self, file: &DataFile) -> Result<DeliveryMethod, DeliveryError> {
        let api = self.probe().ok_or(DeliveryError::Unsupported)?;

        self.host
            .save_blob(api, Blob::from(file), &file.name)
            .map_err(|e| DeliveryError::SaveNotPossible {
                api: api.as_str().to_string(),
                reason: e.to_string(),
            })?;

        Ok(DeliveryMethod::SaveBlob(api))
    }
}

pub struct DownloadLinkStrategy {
    host: Arc<dyn BrowserHost>,
}

impl DownloadLinkStrategy {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SaveStrategy for DownloadLinkStrategy {
    fn name(&self) -> &'static str {
        "download-link"
    }

    fn is_available(&self) -> bool {
        self.host.supports_download_attribute()
    }

    async fn attempt(&self, file: &DataFile) -> Result<DeliveryMethod, DeliveryError> {
        let url = self
            .host
            .create_object_url(Blob::from(file))
            .map_err(|e| DeliveryError::CannotOpen(e.to_string()))?;

        let clicked = self.host.click_download_link(&url, &file.name);
        self.host.revoke_object_url(&url);

        clicked.map_err(|e| DeliveryError::CannotOpen(e.to_string()))?;
        Ok(DeliveryMethod::DownloadLink)
    }
}

/// Last resort for hosts without the `download` attribute
pub struct LegacyDownloadStrategy {
    host: Arc<dyn BrowserHost>,
}

impl LegacyDownloadStrategy {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl SaveStrategy for LegacyDownloadStrategy {
    fn name(&self) -> &'static str {
        "legacy-download"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn attempt(&self, file: &DataFile) -> Result<DeliveryMethod, DeliveryError> {
        let url = self
            .host
            .create_object_url(Blob::from(file))
            .map_err(|e| DeliveryError::CannotOpen(e.to_string()))?;

        self.host
            .legacy_download(&file.name, url)
            .await
            .map_err(|e| DeliveryError::CannotOpen(e.to_string()))?;

        Ok(DeliveryMethod::LegacyDownload)
    }
}
