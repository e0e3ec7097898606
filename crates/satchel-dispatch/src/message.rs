//! User-facing message keys

use serde::{Deserialize, Serialize};

use crate::error::FailureKind;

/// Translation keys for every dialog the dispatcher can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    PleaseWait,
    Corrupted,
    CouldNotAttachFile,
    SaveDownloadNotPossible,
    CanNotOpenFileOnDevice,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::PleaseWait => "pleaseWait_msg",
            MessageKey::Corrupted => "corrupted_msg",
            MessageKey::CouldNotAttachFile => "couldNotAttachFile_msg",
            MessageKey::SaveDownloadNotPossible => "saveDownloadNotPossibleIe_msg",
            MessageKey::CanNotOpenFileOnDevice => "canNotOpenFileOnDevice_msg",
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            MessageKey::Corrupted => FailureKind::Corrupted,
            _ => FailureKind::Generic,
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key to text lookup
pub trait Lang: Send + Sync {
    fn get(&self, key: MessageKey) -> String;
}

/// A modal error message, optionally naming the file it is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub key: MessageKey,
    pub subject: Option<String>,
}

impl Notice {
    pub fn new(key: MessageKey) -> Self {
        Self { key, subject: None }
    }

    pub fn about(key: MessageKey, subject: impl Into<String>) -> Self {
        Self {
            key,
            subject: Some(subject.into()),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.key.kind()
    }

    /// Translated text, with the subject appended after a space
    pub fn text(&self, lang: &dyn Lang) -> String {
        let message = lang.get(self.key);
        match &self.subject {
            Some(subject) => format!("{} {}", message, subject),
            None => message,
        }
    }
}
