// Message types exchanged between the orchestrator, the TUI, and spawned
// backend request tasks.
//
// Three channels connect the pieces:
//   - `UserCommand`: TUI -> orchestrator (keyboard intent)
//   - `ServiceEvent`: spawned request tasks -> orchestrator (backend replies)
//   - `UiUpdate`: orchestrator -> TUI (state for rendering)

use crate::chat::ChatMessage;
use crate::screening::{SeverityClass, QUESTION_COUNT};
use crate::service::ServiceError;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Which screen the app is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Landing,
    Screening,
    Chat,
}

// ---------------------------------------------------------------------------
// UserCommand (TUI -> orchestrator)
// ---------------------------------------------------------------------------

/// A user intent produced by the TUI input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Open the questionnaire view (fresh or resumed).
    StartScreening,
    /// Open the chat view.
    OpenChat,
    /// Return to the landing view.
    GoHome,
    /// Record the given option value (0..=3) for the question on screen.
    AnswerCurrent(u8),
    /// Step back to the previous question.
    PreviousQuestion,
    /// Step forward to the next already-answered question.
    NextQuestion,
    /// Discard all answers and start the questionnaire over.
    RestartScreening,
    /// Send a chat message to the backend.
    SendMessage(String),
    Quit,
}

// ---------------------------------------------------------------------------
// ServiceEvent (request tasks -> orchestrator)
// ---------------------------------------------------------------------------

/// Outcome of a spawned backend request.
///
/// Every event carries the chat generation that was current when the task
/// was spawned; the orchestrator discards events whose generation no longer
/// matches (the user left and re-entered the chat in the meantime).
#[derive(Debug)]
pub enum ServiceEvent {
    /// The backend acknowledged a forwarded score with a reply message.
    ScoreReply { generation: u64, message: String },
    /// Forwarding the score failed.
    ScoreFailed {
        generation: u64,
        error: ServiceError,
    },
    /// The backend answered a user query. `None` when the reply had no
    /// response field, which the UI surfaces as a fixed fallback line.
    QueryReply {
        generation: u64,
        response: Option<String>,
    },
    /// The query request failed.
    QueryFailed {
        generation: u64,
        error: ServiceError,
    },
}

impl ServiceEvent {
    /// The generation stamped on this event at spawn time.
    pub fn generation(&self) -> u64 {
        match self {
            ServiceEvent::ScoreReply { generation, .. }
            | ServiceEvent::ScoreFailed { generation, .. }
            | ServiceEvent::QueryReply { generation, .. }
            | ServiceEvent::QueryFailed { generation, .. } => *generation,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Questionnaire state for rendering, pushed after every screening command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreeningSnapshot {
    /// Index of the question on screen (0-based).
    pub current: usize,
    /// Recorded option values by question index.
    pub answers: [Option<u8>; QUESTION_COUNT],
    /// How many questions have a recorded answer.
    pub answered: usize,
    /// Progress gauge value (0..=100).
    pub progress_percent: u8,
    /// Set once the final question has been answered.
    pub outcome: Option<ScreeningOutcome>,
}

/// Final score and band, present only on a completed questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreeningOutcome {
    pub score: u8,
    pub severity: SeverityClass,
}

// ---------------------------------------------------------------------------
// UiUpdate (orchestrator -> TUI)
// ---------------------------------------------------------------------------

/// An incremental update applied to the TUI's `ViewState`.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Switch the active view.
    ViewChanged(ViewId),
    /// Replace the questionnaire display state.
    ScreeningSnapshot(Box<ScreeningSnapshot>),
    /// Replace the chat transcript wholesale (sent when the chat opens).
    ChatReset(Vec<ChatMessage>),
    /// Append a single message to the transcript.
    MessageAppended(Box<ChatMessage>),
    /// Whether a backend reply is currently in flight.
    ReplyPending(bool),
    /// Most recent stored score, for the status bar. Sent at startup when
    /// a previous session left one behind.
    LastScore { score: u8, severity: SeverityClass },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_event_generation_accessor() {
        let events = [
            ServiceEvent::ScoreReply {
                generation: 3,
                message: "ok".into(),
            },
            ServiceEvent::QueryReply {
                generation: 3,
                response: None,
            },
        ];
        for event in &events {
            assert_eq!(event.generation(), 3);
        }
    }

    #[test]
    fn screening_snapshot_outcome_only_when_complete() {
        let snapshot = ScreeningSnapshot {
            current: 4,
            answers: [None; QUESTION_COUNT],
            answered: 0,
            progress_percent: 44,
            outcome: None,
        };
        assert!(snapshot.outcome.is_none());

        let done = ScreeningSnapshot {
            outcome: Some(ScreeningOutcome {
                score: 12,
                severity: SeverityClass::Moderate,
            }),
            ..snapshot
        };
        assert_eq!(done.outcome.map(|o| o.score), Some(12));
    }
}
