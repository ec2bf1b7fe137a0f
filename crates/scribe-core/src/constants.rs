//! Package-level constants.

/// Current version of VibeScribe (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "scribe";

/// Maximum accepted media file size in bytes (100 MiB).
///
/// Enforced before any read or encode work begins.
pub const MAX_MEDIA_BYTES: u64 = 104_857_600;
