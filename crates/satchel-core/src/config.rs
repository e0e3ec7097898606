//! Satchel configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use satchel_dispatch::{DispatcherConfig, LocalReadPolicy, Platform};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Browser sandbox or native app
    pub platform: Platform,
    /// Where native platforms keep decrypted attachments
    pub cache_dir: PathBuf,
    /// Target directory for saved attachments on desktop hosts
    pub download_dir: PathBuf,
    /// Parallel attachment downloads per batch
    pub batch_concurrency: usize,
    /// Handling of partially unreadable local selections
    pub local_read_policy: LocalReadPolicy,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let download_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("Downloads"));
        let dispatcher = DispatcherConfig::default();

        Self {
            platform: dispatcher.platform,
            cache_dir: data_dir.join("cache"),
            download_dir,
            batch_concurrency: dispatcher.batch_concurrency,
            local_read_policy: dispatcher.local_read_policy,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Satchel"))
            .unwrap_or_else(|| PathBuf::from(".satchel"))
    }

    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_concurrency == 0 {
            return Err(CoreError::Config(
                "batch_concurrency must be at least 1".to_string(),
            ));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("cache_dir must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            platform: self.platform,
            batch_concurrency: self.batch_concurrency,
            local_read_policy: self.local_read_policy,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for common directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }

    pub fn download_dir() -> Option<PathBuf> {
        #[cfg(any(target_os = "windows", target_os = "macos"))]
        {
            let home = if cfg!(target_os = "windows") {
                "USERPROFILE"
            } else {
                "HOME"
            };
            std::env::var(home)
                .ok()
                .map(|h| PathBuf::from(h).join("Downloads"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DOWNLOAD_DIR")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join("Downloads"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
