//! Satchel Attachment Dispatcher
//!
//! - Download and decrypt attachments through a remote worker
//! - Open them natively or save them via the first available save strategy
//! - Pick local files for attaching and read them into memory
//! - Report every failure to the user as a single modal dialog

mod capability;
mod dispatcher;
mod download_dir;
mod error;
mod message;
mod picker;
mod strategy;

#[cfg(test)]
mod testing;

pub use capability::{AttachmentSource, NativeOpener, Notifier, ProgressIndicator};
pub use dispatcher::{
    Capabilities, DeliveryOutcome, Dispatcher, DispatcherConfig, LocalReadPolicy, Platform,
};
pub use download_dir::DownloadDirSaver;
pub use error::{DeliveryError, DispatchError, FailureKind, FetchError, HostError, OpenError};
pub use message::{Lang, MessageKey, Notice};
pub use picker::{FilePicker, LocalFile, LocalPath, PickerOptions, SelectionSurface};
pub use strategy::{
    browser_strategies, Blob, BrowserHost, DeliveryMethod, DownloadLinkStrategy,
    LegacyDownloadStrategy, NativeSaveStrategy, ObjectUrl, SaveBlobApi, SaveStrategy,
};

pub type Result<T> = std::result::Result<T, DispatchError>;
