//! # scribe-llm
//!
//! The analysis client. One non-streaming `generateContent` call per attempt
//! carries the base64 media inline plus a fixed instruction prompt, declares
//! a strict JSON response schema, and deserializes the model's text into an
//! [`AnalysisResult`](scribe_core::AnalysisResult).
//!
//! No retry, no streaming, no chunked upload. The orchestrator decides what
//! to do with a failure; this crate only classifies it.

#![deny(unsafe_code)]

pub mod client;
pub mod gemini;
pub mod prompt;
pub mod types;

pub use client::{AnalysisClient, ClientError};
pub use gemini::{GeminiClient, GeminiConfig};
