//! The four-phase processing timeline shown while an attempt runs.

use serde::{Deserialize, Serialize};

/// Identifier for one processing phase. The order here is the order phases
/// run and the order they render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    /// Reading and encoding the local file.
    Read,
    /// Transferring the encoded payload to the inference service.
    Upload,
    /// The remote transcription and analysis call.
    Analyze,
    /// Assembling the final report.
    Finalize,
}

impl PhaseId {
    /// All phases, in execution order.
    pub const ALL: [PhaseId; 4] = [
        PhaseId::Read,
        PhaseId::Upload,
        PhaseId::Analyze,
        PhaseId::Finalize,
    ];

    /// Human-readable label for this phase.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PhaseId::Read => "Reading and preparing media file",
            PhaseId::Upload => "Uploading data to Gemini AI",
            PhaseId::Analyze => "AI Transcription and Analysis",
            PhaseId::Finalize => "Generating executive report",
        }
    }
}

/// Progress state of one phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    Active,
    Completed,
    Error,
}

/// One entry in the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub id: PhaseId,
    pub label: &'static str,
    pub status: PhaseStatus,
}

/// The ordered timeline of all four phases.
///
/// Freshly constructed (and reset) timelines have every phase pending. The
/// orchestrator drives phases forward one at a time; on failure only the
/// active phase flips to error, completed phases keep their state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseTimeline {
    phases: [Phase; 4],
}

impl PhaseTimeline {
    /// A timeline with all phases pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: PhaseId::ALL.map(|id| Phase {
                id,
                label: id.label(),
                status: PhaseStatus::Pending,
            }),
        }
    }

    /// Set the status of one phase.
    pub fn set(&mut self, id: PhaseId, status: PhaseStatus) {
        for phase in &mut self.phases {
            if phase.id == id {
                phase.status = status;
            }
        }
    }

    /// Status of one phase.
    #[must_use]
    pub fn status(&self, id: PhaseId) -> PhaseStatus {
        self.phases
            .iter()
            .find(|p| p.id == id)
            .map_or(PhaseStatus::Pending, |p| p.status)
    }

    /// Flip the currently active phase (if any) to error.
    pub fn fail_active(&mut self) {
        for phase in &mut self.phases {
            if phase.status == PhaseStatus::Active {
                phase.status = PhaseStatus::Error;
            }
        }
    }

    /// Number of completed phases.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.phases
            .iter()
            .filter(|p| p.status == PhaseStatus::Completed)
            .count()
    }

    /// Whether every phase is completed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.completed_count() == self.phases.len()
    }

    /// The phases in order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
}

impl Default for PhaseTimeline {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
