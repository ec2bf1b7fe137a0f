//! Orchestrator configuration.

use std::time::Duration;

use scribe_core::MAX_MEDIA_BYTES;

/// Delays that pace the phase timeline.
///
/// The single `generateContent` call exposes no separable upload or
/// inference progress, so the upload and finalize phases advance on timers.
/// This is presentation pacing, not measurement; tests zero it out.
#[derive(Clone, Copy, Debug)]
pub struct PacingConfig {
    /// How long the upload phase stays active once the call starts.
    pub upload_settle: Duration,
    /// How long the finalize phase holds before completing.
    pub finalize_hold: Duration,
}

impl PacingConfig {
    /// No artificial delays. Used in tests and one-shot scripting.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            upload_settle: Duration::ZERO,
            finalize_hold: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            upload_settle: Duration::from_millis(1_000),
            finalize_hold: Duration::from_millis(800),
        }
    }
}

/// Orchestrator configuration.
#[derive(Clone, Copy, Debug)]
pub struct OrchestratorConfig {
    /// Maximum accepted media size in bytes.
    pub max_media_bytes: u64,
    /// Phase pacing.
    pub pacing: PacingConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_media_bytes: MAX_MEDIA_BYTES,
            pacing: PacingConfig::default(),
        }
    }
}
