//! Satchel Core
//!
//! Configuration, logging and wiring for the attachment dispatcher.

mod config;
mod error;
mod progress;
mod satchel;

pub use config::Config;
pub use error::CoreError;
pub use progress::ProgressOverlay;
pub use satchel::{Satchel, SatchelBuilder};

// Re-export the building blocks
pub use satchel_dispatch::{
    browser_strategies, AttachmentSource, Blob, BrowserHost, Capabilities, DeliveryError,
    DeliveryMethod, DeliveryOutcome, DispatchError, Dispatcher, DispatcherConfig,
    DownloadDirSaver, FailureKind, FetchError, FilePicker, HostError, Lang, LocalFile,
    LocalPath, LocalReadPolicy, MessageKey, NativeOpener, Notice, Notifier, ObjectUrl,
    OpenError, PickerOptions, Platform, ProgressIndicator, SaveBlobApi, SaveStrategy,
    SelectionSurface,
};
pub use satchel_file::{
    DataFile, DecryptedPayload, FileError, FileReference, NativeFileStore, RemoteFileDescriptor,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
