//! Session state as a tagged union.
//!
//! Each variant carries exactly the data valid while the session is in it.
//! A completed session always has a result; a failed session always has a
//! message; an idle session carries nothing. Transitions consume the old
//! state and return the new one; a transition that does not apply to the
//! current variant leaves the state unchanged.

use serde::Serialize;

use scribe_core::{AnalysisResult, FileInfo};

use crate::phase::{Phase, PhaseTimeline};

/// The session lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No attempt submitted or the last one was cleared.
    Idle,
    /// Reading and encoding the file, then transferring it.
    Uploading {
        file: FileInfo,
        phases: PhaseTimeline,
    },
    /// The remote transcription and analysis call is in flight.
    Transcribing {
        file: FileInfo,
        phases: PhaseTimeline,
    },
    /// Assembling the final report.
    Summarizing {
        file: FileInfo,
        phases: PhaseTimeline,
    },
    /// The attempt finished and produced a report.
    Completed {
        file: FileInfo,
        phases: PhaseTimeline,
        result: AnalysisResult,
    },
    /// The attempt failed. `file` is absent for submissions that never had
    /// one (the URL path).
    Failed {
        file: Option<FileInfo>,
        phases: PhaseTimeline,
        message: String,
    },
}

/// Coarse status derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Uploading,
    Transcribing,
    Summarizing,
    Completed,
    Error,
}

impl SessionState {
    /// Derive the coarse status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Uploading { .. } => SessionStatus::Uploading,
            SessionState::Transcribing { .. } => SessionStatus::Transcribing,
            SessionState::Summarizing { .. } => SessionStatus::Summarizing,
            SessionState::Completed { .. } => SessionStatus::Completed,
            SessionState::Failed { .. } => SessionStatus::Error,
        }
    }

    /// Whether an attempt is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::Uploading { .. }
                | SessionState::Transcribing { .. }
                | SessionState::Summarizing { .. }
        )
    }

    /// Start a new attempt: fresh timeline, state moves to Uploading.
    ///
    /// Valid from any terminal state (Idle, Completed, Failed). The busy
    /// guard at the orchestrator keeps this from firing mid-attempt.
    #[must_use]
    pub fn begin_upload(self, file: FileInfo) -> Self {
        if self.is_busy() {
            return self;
        }
        SessionState::Uploading {
            file,
            phases: PhaseTimeline::new(),
        }
    }

    /// Uploading → Transcribing. Unchanged from any other state.
    #[must_use]
    pub fn begin_transcribing(self) -> Self {
        match self {
            SessionState::Uploading { file, phases } => {
                SessionState::Transcribing { file, phases }
            }
            other => other,
        }
    }

    /// Transcribing → Summarizing. Unchanged from any other state.
    #[must_use]
    pub fn begin_summarizing(self) -> Self {
        match self {
            SessionState::Transcribing { file, phases } => {
                SessionState::Summarizing { file, phases }
            }
            other => other,
        }
    }

    /// Summarizing → Completed with the report. Unchanged from any other
    /// state, so a result can never be attached outside a finished attempt.
    #[must_use]
    pub fn complete(self, result: AnalysisResult) -> Self {
        match self {
            SessionState::Summarizing { file, phases } => SessionState::Completed {
                file,
                phases,
                result,
            },
            other => other,
        }
    }

    /// Fail the session from any state. The active phase (if any) flips to
    /// error; completed phases keep their state.
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        let (file, mut phases) = match self {
            SessionState::Idle => (None, PhaseTimeline::new()),
            SessionState::Uploading { file, phases }
            | SessionState::Transcribing { file, phases }
            | SessionState::Summarizing { file, phases }
            | SessionState::Completed { file, phases, .. } => (Some(file), phases),
            SessionState::Failed { file, phases, .. } => (file, phases),
        };
        phases.fail_active();
        SessionState::Failed {
            file,
            phases,
            message: message.into(),
        }
    }

    /// Back to Idle, dropping file, phases, result, and error.
    #[must_use]
    pub fn reset(self) -> Self {
        SessionState::Idle
    }

    /// Mutable timeline access while an attempt is in flight.
    pub fn phases_mut(&mut self) -> Option<&mut PhaseTimeline> {
        match self {
            SessionState::Idle => None,
            SessionState::Uploading { phases, .. }
            | SessionState::Transcribing { phases, .. }
            | SessionState::Summarizing { phases, .. }
            | SessionState::Completed { phases, .. }
            | SessionState::Failed { phases, .. } => Some(phases),
        }
    }

    /// The active file, when one exists.
    #[must_use]
    pub fn file(&self) -> Option<&FileInfo> {
        match self {
            SessionState::Idle => None,
            SessionState::Uploading { file, .. }
            | SessionState::Transcribing { file, .. }
            | SessionState::Summarizing { file, .. }
            | SessionState::Completed { file, .. } => Some(file),
            SessionState::Failed { file, .. } => file.as_ref(),
        }
    }

    /// The report, once completed.
    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The failure message, once failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Serializable projection for presentation consumers.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let phases = match self {
            SessionState::Idle => PhaseTimeline::new(),
            SessionState::Uploading { phases, .. }
            | SessionState::Transcribing { phases, .. }
            | SessionState::Summarizing { phases, .. }
            | SessionState::Completed { phases, .. }
            | SessionState::Failed { phases, .. } => phases.clone(),
        };
        SessionSnapshot {
            status: self.status(),
            phases: phases.phases().to_vec(),
            file: self.file().cloned(),
            result: self.result().cloned(),
            error: self.error().map(str::to_string),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

/// Read-only view of the session, served over the API and rendered by the
/// CLI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub phases: Vec<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
