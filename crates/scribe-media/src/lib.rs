//! # scribe-media
//!
//! The media encoder: turns a selected file into a transportable
//! [`MediaPayload`](scribe_core::MediaPayload).
//!
//! - Size validation happens before any read (fail fast on oversized files)
//! - File content is read asynchronously and base64-encoded with the
//!   standard alphabet
//! - MIME type is the caller's declaration when present, otherwise resolved
//!   from the file extension
//! - The read is cancellation-aware via `CancellationToken`

#![deny(unsafe_code)]

pub mod encoder;
pub mod mime;

pub use encoder::{EncodeError, encode_file, payload_from_encoded};
pub use mime::resolve_mime;
