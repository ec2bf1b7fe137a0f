//! # scribe-runtime
//!
//! The orchestrator: drives one analysis attempt at a time through encode,
//! the remote call, and finalization, mapping progress onto the session
//! state machine and publishing every change through a watch channel.
//!
//! Single attempt in flight, guarded here. State is mutated only by the
//! attempt that owns it; observers read snapshots.

#![deny(unsafe_code)]

pub mod config;
pub mod orchestrator;

pub use config::{OrchestratorConfig, PacingConfig};
pub use orchestrator::Orchestrator;
