use serde::Serialize;
use std::fmt;

/// Import session lifecycle
///
/// `Idle → Reading → Parsing → Applying → Done → Idle` on success,
/// `Reading | Parsing → Failed → Idle` on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    Idle,
    Reading,
    Parsing,
    Applying,
    Done,
    Failed,
}

impl SessionState {
    /// Whether an import is in flight
    #[inline]
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        Idle => vec![Reading],
        Reading => vec![Parsing, Failed],
        Parsing => vec![Applying, Failed],
        Applying => vec![Done],
        Done => vec![Idle],
        Failed => vec![Idle],
    }
}

/// Validates a session state transition.
pub fn validate_transition(from: SessionState, to: SessionState) -> Result<(), crate::SessionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(crate::SessionError::IllegalTransition { from, to })
    }
}
