//! Satchel File Model
//!
//! Attachment descriptors, decrypted payloads and the on-device file store
//! used by native platforms.

mod error;
mod file;
mod mime;
mod store;

pub use error::FileError;
pub use file::{DataFile, DecryptedPayload, FileReference, RemoteFileDescriptor};
pub use mime::{corrected_mime_type, mime_from_extension, sanitize_file_name, OCTET_STREAM};
pub use store::NativeFileStore;

pub type Result<T> = std::result::Result<T, FileError>;
