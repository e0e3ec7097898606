//! Top-level attachment I/O container

use std::path::PathBuf;
use std::sync::Arc;

use satchel_dispatch::{
    browser_strategies, AttachmentSource, BrowserHost, Capabilities, Dispatcher, DownloadDirSaver,
    FilePicker, LocalFile, LocalPath, NativeOpener, Notifier, ProgressIndicator, SaveStrategy,
};
use satchel_file::{DataFile, NativeFileStore};

use crate::config::Config;
use crate::error::CoreError;
use crate::progress::ProgressOverlay;
use crate::Result;

/// Owns the configuration, the native file store and the dispatcher
pub struct Satchel {
    config: Config,
    file_store: NativeFileStore,
    dispatcher: Dispatcher,
}

impl Satchel {
    pub fn builder(config: Config) -> SatchelBuilder {
        SatchelBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn file_store(&self) -> &NativeFileStore {
        &self.file_store
    }

    /// Read files handed over without the picker, e.g. dropped onto the
    /// composer. Read failures are returned, not shown to the user.
    pub async fn attach_paths(&self, paths: Vec<PathBuf>) -> Result<Vec<DataFile>> {
        let selection: Vec<Box<dyn LocalFile>> = paths
            .into_iter()
            .map(|path| Box::new(LocalPath::new(path)) as Box<dyn LocalFile>)
            .collect();
        Ok(self.dispatcher.read_local_files(&selection).await?)
    }

    /// Drop every decrypted attachment kept on the device
    pub async fn clear_file_data(&self) -> Result<usize> {
        Ok(self.file_store.clear().await?)
    }
}

pub struct SatchelBuilder {
    config: Config,
    source: Option<Arc<dyn AttachmentSource>>,
    opener: Option<Arc<dyn NativeOpener>>,
    notifier: Option<Arc<dyn Notifier>>,
    progress: Option<Arc<dyn ProgressIndicator>>,
    picker: Option<Arc<dyn FilePicker>>,
    browser: Option<Arc<dyn BrowserHost>>,
}

impl SatchelBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            source: None,
            opener: None,
            notifier: None,
            progress: None,
            picker: None,
            browser: None,
        }
    }

    pub fn source(mut self, source: Arc<dyn AttachmentSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn opener(mut self, opener: Arc<dyn NativeOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Defaults to a [`ProgressOverlay`]
    pub fn progress(mut self, progress: Arc<dyn ProgressIndicator>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn picker(mut self, picker: Arc<dyn FilePicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Deliver through the browser's download APIs instead of the
    /// download directory
    pub fn browser(mut self, browser: Arc<dyn BrowserHost>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn build(self) -> Result<Satchel> {
        self.config.validate()?;

        let capabilities = Capabilities {
            source: self.source.ok_or(CoreError::MissingCapability("source"))?,
            opener: self.opener.ok_or(CoreError::MissingCapability("opener"))?,
            notifier: self
                .notifier
                .ok_or(CoreError::MissingCapability("notifier"))?,
            progress: self
                .progress
                .unwrap_or_else(|| Arc::new(ProgressOverlay::new())),
            picker: self.picker.ok_or(CoreError::MissingCapability("picker"))?,
        };

        if self.config.platform.is_native() {
            std::fs::create_dir_all(&self.config.cache_dir)?;
        }

        let strategies: Vec<Box<dyn SaveStrategy>> = match self.browser {
            Some(browser) => browser_strategies(browser),
            None => vec![Box::new(DownloadDirSaver::new(
                self.config.download_dir.clone(),
            ))],
        };

        tracing::info!(
            platform = ?self.config.platform,
            strategies = ?strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "Satchel initialized"
        );

        Ok(Satchel {
            file_store: NativeFileStore::new(self.config.cache_dir.clone()),
            dispatcher: Dispatcher::new(self.config.dispatcher_config(), capabilities, strategies),
            config: self.config,
        })
    }
}
