//! Widget visibility state machine.

use serde::{Deserialize, Serialize};

/// Visibility of the chat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationState {
    /// Only the floating launcher button is visible.
    #[default]
    Closed,
    /// Header and message body are visible.
    Open,
    /// Header visible, body hidden.
    Minimized,
}

/// User intents that move the panel between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationEvent {
    /// Tap on the floating launcher button.
    Launch,
    Minimize,
    Expand,
    Dismiss,
}

impl PresentationState {
    /// Returns the state reached by `event`, or `None` when the event does not
    /// apply in this state.
    pub fn transition(self, event: PresentationEvent) -> Option<PresentationState> {
        use PresentationEvent::*;
        use PresentationState::*;

        match (self, event) {
            (Closed, Launch) => Some(Open),
            (Open, Minimize) => Some(Minimized),
            (Minimized, Expand) => Some(Open),
            (Open | Minimized, Dismiss) => Some(Closed),
            _ => None,
        }
    }

    /// Open and Minimized both show the conversation header.
    pub fn is_active(self) -> bool {
        !matches!(self, PresentationState::Closed)
    }

    pub fn shows_body(self) -> bool {
        matches!(self, PresentationState::Open)
    }
}
