//! Project lifecycle state machine
//!
//! Two entry points share one state enum:
//! - the guarded transition table consulted by `update_status`
//!   ([`ProjectStateMachine::check_target`])
//! - event-driven transitions used by the specialized lifecycle
//!   operations ([`ProjectStateMachine::transition`]), each with its own
//!   precondition independent of the table

use std::str::FromStr;

use lingodesk_common::{Error, StateError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Project State
// ============================================================================

/// Lifecycle state of a translation project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    Created,
    Assigned,
    Completed,
    Approved,
    Rejected,
    Closed,
}

impl ProjectState {
    pub const ALL: [ProjectState; 6] = [
        Self::Created,
        Self::Assigned,
        Self::Completed,
        Self::Approved,
        Self::Rejected,
        Self::Closed,
    ];

    /// CLOSED admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Targets reachable through the guarded transition table.
    ///
    /// CREATED is left only by creation-time auto-assignment, so it has no
    /// caller-reachable targets here.
    pub fn valid_transitions(&self) -> &'static [ProjectState] {
        match self {
            Self::Created => &[],
            Self::Assigned => &[Self::Completed],
            Self::Completed => &[Self::Approved, Self::Rejected],
            Self::Rejected => &[Self::Assigned, Self::Closed],
            Self::Approved => &[Self::Closed],
            Self::Closed => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Assigned => "ASSIGNED",
            Self::Completed => "COMPLETED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Closed => "CLOSED",
        }
    }

    /// Parse a persisted value; anything unrecognized is data corruption
    pub fn from_stored(raw: &str) -> Result<Self, Error> {
        raw.parse()
            .map_err(|_| Error::CorruptRecord(format!("unknown project state '{}'", raw)))
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectState {
    type Err = Error;

    /// Exact upper-case names only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::UnknownState(s.to_string()))
    }
}

// ============================================================================
// Project Events
// ============================================================================

/// Events that drive the specialized lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectEvent {
    /// Auto-assignment or an administrator picked a translator
    TranslatorAssigned,
    /// Auto-assignment found nobody for the language
    NoTranslatorAvailable,
    /// The translator uploaded the translated file
    TranslationSubmitted,
    /// The customer approved the translation
    Accept,
    /// The customer rejected the translation
    Reject,
    /// An administrator closed the project
    Close,
}

impl std::fmt::Display for ProjectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TranslatorAssigned => write!(f, "translator_assigned"),
            Self::NoTranslatorAvailable => write!(f, "no_translator_available"),
            Self::TranslationSubmitted => write!(f, "translation_submitted"),
            Self::Accept => write!(f, "accept"),
            Self::Reject => write!(f, "reject"),
            Self::Close => write!(f, "close"),
        }
    }
}

// ============================================================================
// Project State Machine
// ============================================================================

/// Project state machine
pub struct ProjectStateMachine;

impl ProjectStateMachine {
    /// Apply an event to `current`
    pub fn transition(
        current: ProjectState,
        event: ProjectEvent,
    ) -> Result<ProjectState, StateError> {
        use ProjectEvent as E;
        use ProjectState as S;

        let next = match (current, event) {
            (S::Created | S::Rejected, E::TranslatorAssigned) => S::Assigned,
            (S::Created, E::NoTranslatorAvailable) => S::Closed,
            (S::Assigned | S::Rejected, E::TranslationSubmitted) => S::Completed,
            (S::Completed, E::Accept) => S::Approved,
            (S::Completed, E::Reject) => S::Rejected,
            (S::Closed, E::Close) => {
                return Err(StateError::TerminalState(current.to_string()));
            }
            (_, E::Close) => S::Closed,

            // Assignment events are guarded like table transitions
            (_, E::TranslatorAssigned) => {
                return Err(Self::invalid_transition(current, S::Assigned, event));
            }
            (_, E::NoTranslatorAvailable) => {
                return Err(Self::invalid_transition(current, S::Closed, event));
            }

            // Submission and review events require one precondition state
            (_, E::TranslationSubmitted | E::Accept | E::Reject) => {
                return Err(StateError::InvalidState {
                    state: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check a caller-requested target against the transition table
    pub fn check_target(current: ProjectState, target: ProjectState) -> Result<(), StateError> {
        if current.valid_transitions().contains(&target) {
            Ok(())
        } else {
            Err(StateError::InvalidTransition {
                from: current.to_string(),
                to: target.to_string(),
                event: "update_status".to_string(),
            })
        }
    }

    /// Check if an event applies without performing it
    pub fn can_transition(current: ProjectState, event: ProjectEvent) -> bool {
        Self::transition(current, event).is_ok()
    }

    fn invalid_transition(from: ProjectState, to: ProjectState, event: ProjectEvent) -> StateError {
        StateError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
            event: event.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
