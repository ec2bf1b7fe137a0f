//! # scribe-session
//!
//! The session state machine and the four-phase processing timeline.
//!
//! A session is always in exactly one [`SessionState`]; the state carries
//! exactly the data valid for it, so combinations like "completed with no
//! result" cannot be constructed. Presentation consumers read a serializable
//! [`SessionSnapshot`] projection rather than the state itself.

#![deny(unsafe_code)]

pub mod phase;
pub mod state;

pub use phase::{Phase, PhaseId, PhaseStatus, PhaseTimeline};
pub use state::{SessionSnapshot, SessionState, SessionStatus};
