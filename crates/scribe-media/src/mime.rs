//! MIME type resolution from file extensions.

use std::path::Path;

/// Fallback when no declaration exists and the extension is unknown.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Resolve the MIME type for a media file.
///
/// A caller-declared type always wins (the file picker knows best). With no
/// declaration, the extension is mapped for the common audio/video formats;
/// anything else falls back to `application/octet-stream`, which the
/// inference service accepts for sniffable media.
#[must_use]
pub fn resolve_mime(path: &Path, declared: Option<&str>) -> String {
    if let Some(mime) = declared {
        if !mime.is_empty() {
            return mime.to_string();
        }
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/m4a",
        Some("aac") => "audio/aac",
        Some("ogg" | "oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mpeg" | "mpg") => "video/mpeg",
        Some("avi") => "video/x-msvideo",
        _ => FALLBACK_MIME,
    }
    .to_string()
}
