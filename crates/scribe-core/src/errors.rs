//! Error hierarchy for VibeScribe.
//!
//! Every failure an analysis attempt can hit maps to one [`ScribeError`]
//! variant. The `Display` impl is the exact user-facing message shown in the
//! error panel; [`ScribeError::code`] is the machine-readable counterpart
//! used in logs and API responses.
//!
//! All errors are terminal for the current attempt: none are retried. The
//! orchestrator catches them at its boundary, marks the active phase as
//! errored, and surfaces the message.

use thiserror::Error;

/// Result type alias for scribe operations.
pub type ScribeResult<T> = Result<T, ScribeError>;

/// Top-level error type for an analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScribeError {
    /// File exceeds the size limit. Rejected before any I/O.
    #[error("File size exceeds 100MB limit.")]
    SizeLimit {
        /// Actual file size in bytes.
        size_bytes: u64,
        /// Configured limit in bytes.
        limit_bytes: u64,
    },

    /// The local file could not be read.
    #[error("Failed to read file from disk.")]
    Read {
        /// Underlying I/O failure description (logged, not shown).
        message: String,
    },

    /// The remote call succeeded transport-wise but returned no usable text.
    #[error("The AI returned an empty response. Please try again with a different file.")]
    EmptyResponse,

    /// The returned text was not valid JSON matching the expected shape.
    #[error("Analysis failed: the AI response was not valid JSON.")]
    Parse {
        /// Parser failure description (logged, not shown).
        message: String,
    },

    /// Credential or setup problem inferred from the failure.
    #[error("API Key configuration error. Please ensure your environment is set up correctly.")]
    Configuration {
        /// Underlying failure description (logged, not shown).
        message: String,
    },

    /// Catch-all for other remote-call failures.
    #[error("Analysis failed: {message}")]
    Analysis {
        /// Underlying failure description.
        message: String,
    },

    /// URL ingestion is a rejecting stub.
    #[error("URL processing is currently restricted. Please upload a local file.")]
    Restricted,

    /// The attempt was cancelled by the user.
    #[error("Analysis cancelled.")]
    Cancelled,

    /// Another attempt is already in flight.
    #[error("An analysis is already in progress.")]
    Busy,
}

impl ScribeError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SizeLimit { .. } => "SIZE_LIMIT",
            Self::Read { .. } => "READ_ERROR",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Analysis { .. } => "ANALYSIS_ERROR",
            Self::Restricted => "RESTRICTED_FEATURE",
            Self::Cancelled => "CANCELLED",
            Self::Busy => "BUSY",
        }
    }

    /// The user-facing message (same text as `Display`).
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
