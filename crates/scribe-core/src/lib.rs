//! # scribe-core
//!
//! Foundation types, errors, and constants for VibeScribe.
//!
//! This crate provides the shared vocabulary that all other scribe crates
//! depend on:
//!
//! - **Media types**: [`MediaPayload`] (encoded file ready for transport)
//!   and [`FileInfo`] (the active-file descriptor shown while processing)
//! - **Report type**: [`AnalysisResult`], the structured output of one
//!   analysis call
//! - **Errors**: [`ScribeError`] hierarchy via `thiserror`, with the
//!   user-facing message for every failure kind
//! - **Constants**: size limit and package metadata

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod media;
pub mod report;

pub use constants::{MAX_MEDIA_BYTES, NAME, VERSION};
pub use errors::{ScribeError, ScribeResult};
pub use media::{FileInfo, MediaPayload, format_size};
pub use report::AnalysisResult;
