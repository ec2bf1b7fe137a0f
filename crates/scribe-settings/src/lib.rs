//! # scribe-settings
//!
//! Layered configuration for the scribe binary and server.
//!
//! Loading flow:
//! 1. Compiled [`ScribeSettings::default()`]
//! 2. Deep-merge of `~/.scribe/settings.json` when it exists
//! 3. `SCRIBE_*` environment overrides (highest priority)
//!
//! Credential validation happens at startup via
//! [`ScribeSettings::validate`], so a missing API key fails before any
//! attempt reaches the user.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{ApiSettings, LimitSettings, PacingSettings, ScribeSettings, ServerSettings};
