//! File reading and base64 encoding.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use scribe_core::{MediaPayload, ScribeError};

use crate::mime::resolve_mime;

/// Errors that can occur while encoding a media file.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// File exceeds the accepted size limit (checked before any read).
    #[error("file is {size_bytes} bytes, limit is {limit_bytes}")]
    SizeLimit {
        /// Actual file size in bytes.
        size_bytes: u64,
        /// Configured limit in bytes.
        limit_bytes: u64,
    },

    /// Reading the file failed (missing, unreadable, disappeared mid-read).
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// Supplied base64 content did not decode.
    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The attempt was cancelled before the read completed.
    #[error("encode cancelled")]
    Cancelled,
}

impl From<EncodeError> for ScribeError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::SizeLimit {
                size_bytes,
                limit_bytes,
            } => Self::SizeLimit {
                size_bytes,
                limit_bytes,
            },
            EncodeError::Io(e) => Self::Read {
                message: e.to_string(),
            },
            EncodeError::Decode(e) => Self::Read {
                message: e.to_string(),
            },
            EncodeError::Cancelled => Self::Cancelled,
        }
    }
}

/// Read a file and encode it into a [`MediaPayload`].
///
/// The size check runs against file metadata before any content is read, so
/// oversized files are rejected without touching the encoder. The read
/// itself races against `cancel`; a cancelled attempt returns
/// [`EncodeError::Cancelled`] and no partial payload.
pub async fn encode_file(
    path: &Path,
    declared_mime: Option<&str>,
    max_bytes: u64,
    cancel: &CancellationToken,
) -> Result<MediaPayload, EncodeError> {
    let metadata = tokio::fs::metadata(path).await?;
    let size_bytes = metadata.len();
    if size_bytes > max_bytes {
        return Err(EncodeError::SizeLimit {
            size_bytes,
            limit_bytes: max_bytes,
        });
    }

    let bytes = tokio::select! {
        () = cancel.cancelled() => return Err(EncodeError::Cancelled),
        result = tokio::fs::read(path) => result?,
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("media")
        .to_string();
    let mime_type = resolve_mime(path, declared_mime);
    let encoded_data = STANDARD.encode(&bytes);

    debug!(
        name = %name,
        size_bytes,
        mime = %mime_type,
        encoded_len = encoded_data.len(),
        "media file encoded"
    );

    Ok(MediaPayload {
        name,
        size_bytes,
        mime_type,
        encoded_data,
    })
}

/// Build a [`MediaPayload`] from already-encoded content (e.g. a browser
/// `FileReader` result submitted over the API).
///
/// Strips a `data:` URI prefix if present, verifies the content decodes, and
/// enforces the size limit against the decoded length.
pub fn payload_from_encoded(
    name: &str,
    mime_type: &str,
    raw: &str,
    max_bytes: u64,
) -> Result<MediaPayload, EncodeError> {
    let encoded = strip_data_uri(raw);
    let decoded = STANDARD.decode(encoded)?;
    let size_bytes = decoded.len() as u64;
    if size_bytes > max_bytes {
        return Err(EncodeError::SizeLimit {
            size_bytes,
            limit_bytes: max_bytes,
        });
    }

    Ok(MediaPayload {
        name: name.to_string(),
        size_bytes,
        mime_type: mime_type.to_string(),
        encoded_data: encoded.to_string(),
    })
}

/// Strip a `data:<mime>;base64,` prefix, returning the bare base64 content.
///
/// Content without the prefix passes through unchanged.
#[must_use]
fn strip_data_uri(raw: &str) -> &str {
    if raw.starts_with("data:") {
        raw.split_once(',').map_or(raw, |(_, rest)| rest)
    } else {
        raw
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
