//! # scribe-server
//!
//! The HTTP presentation layer: a small JSON API over the orchestrator.
//! Submitting a file returns immediately; progress is polled from the
//! session snapshot endpoint.

#![deny(unsafe_code)]

pub mod server;

pub use server::{AppState, ScribeServer};
