//! MIME type and file name helpers

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Look up a MIME type from the extension of `file_name`
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    let mime = match extension.as_str() {
        // Documents
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "ics" => "text/calendar",
        "vcf" => "text/vcard",
        "rtf" => "application/rtf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "json" => "application/json",
        "xml" => "application/xml",
        "eml" => "message/rfc822",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",

        // Audio / video
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",

        // Archives
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "rar" => "application/x-rar-compressed",
        "7z" => "application/x-7z-compressed",

        _ => return None,
    };

    Some(mime)
}

/// Pick the MIME type to hand to an opener or save dialog.
///
/// A stored type wins unless it is missing, empty or the generic
/// `application/octet-stream`, in which case the extension decides.
pub fn corrected_mime_type(file_name: &str, stored: Option<&str>) -> String {
    match stored.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != OCTET_STREAM => mime.to_string(),
        _ => mime_from_extension(file_name)
            .unwrap_or(OCTET_STREAM)
            .to_string(),
    }
}

/// Reduce a display name to a bare file name safe to create on disk
pub fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .trim();

    if name.is_empty() {
        "download".to_string()
    } else {
        name.to_string()
    }
}
