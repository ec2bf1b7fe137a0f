//! Media payload types and byte-size formatting.

use serde::{Deserialize, Serialize};

/// Name and size of the file currently being processed.
///
/// Shown alongside the phase timeline while an attempt is in flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Original file name.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// An encoded media file plus its metadata, ready for transport to the
/// inference service.
///
/// Created by the media encoder once the size check passes; immutable;
/// discarded when a new file is selected or the session resets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    /// Original file name.
    pub name: String,
    /// File size in bytes. Invariant: `size_bytes <= MAX_MEDIA_BYTES`.
    pub size_bytes: u64,
    /// Declared or resolved MIME type (e.g. `"audio/mpeg"`).
    pub mime_type: String,
    /// Base64-encoded file content (standard alphabet, no data-URI prefix).
    pub encoded_data: String,
}

impl MediaPayload {
    /// The active-file descriptor for this payload.
    #[must_use]
    pub fn file_info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
        }
    }
}

/// Format a byte count for display: `"2.5 MB"`, `"340 KB"`, `"0 Bytes"`.
///
/// Units stop at MB (the accepted size limit is 100 MiB, so GB never occurs
/// for valid files); larger values still render in MB.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const K: f64 = 1024.0;
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let bytes_f = bytes as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (bytes_f.log(K).floor() as usize).min(UNITS.len() - 1);
    let value = bytes_f / K.powi(i32::try_from(index).unwrap_or(0));

    // Two decimals with trailing zeros trimmed: 2.00 → "2", 2.50 → "2.5"
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[index])
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
