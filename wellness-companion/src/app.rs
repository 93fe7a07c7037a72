// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// backend replies from spawned request tasks. Owns the questionnaire state
// machine, the chat transcript, and the session context that decides whether
// a finished score still needs to be announced and forwarded.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::chat::ChatLog;
use crate::config::Config;
use crate::db::Database;
use crate::protocol::{
    ScreeningOutcome, ScreeningSnapshot, ServiceEvent, UiUpdate, UserCommand, ViewId,
};
use crate::screening::{AnswerOutcome, Screening, SeverityClass};
use crate::service::WellnessClient;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Bot line shown when forwarding a finished score to the backend fails.
pub const SCORE_FORWARD_FALLBACK: &str =
    "I'm having trouble connecting to the server. Please try again later.";

/// Bot line shown when the backend reply carries no response field.
pub const EMPTY_REPLY_FALLBACK: &str = "I'm not sure how to respond to that.";

/// Bot line shown when a chat query fails outright.
pub const QUERY_FALLBACK: &str = "I'm having trouble processing your request. Please try again.";

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

/// Delivery status of a finished score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDelivery {
    /// The score has not been announced in the chat yet.
    Pending,
    /// The score was announced (and forwarding attempted) once. It will not
    /// be announced again, whatever the forward request returned.
    Delivered,
}

/// The finished-score hand-off between the questionnaire and the chat.
///
/// Lives in the orchestrator for the whole session; the persisted slot in
/// the database is a restart fallback, not the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// Most recent finished score, if any.
    pub score: Option<u8>,
    pub delivery: ScoreDelivery,
}

impl SessionContext {
    /// A session with nothing to deliver.
    pub fn new() -> Self {
        SessionContext {
            score: None,
            delivery: ScoreDelivery::Delivered,
        }
    }

    /// A session restored from the persisted slot. The stored score shows
    /// up in the status bar but is never forwarded again.
    pub fn recovered(score: u8) -> Self {
        SessionContext {
            score: Some(score),
            delivery: ScoreDelivery::Delivered,
        }
    }

    /// Record a freshly finished questionnaire and arm delivery.
    pub fn record_completion(&mut self, score: u8) {
        self.score = Some(score);
        self.delivery = ScoreDelivery::Pending;
    }

    /// Take the score for announcement if delivery is still pending.
    ///
    /// Flips to `Delivered` before any request is made, so a failed forward
    /// is surfaced in the chat but never retried.
    pub fn take_pending(&mut self) -> Option<u8> {
        match (self.score, self.delivery) {
            (Some(score), ScoreDelivery::Pending) => {
                self.delivery = ScoreDelivery::Delivered;
                Some(score)
            }
            _ => None,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        SessionContext::new()
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub screening: Screening,
    pub chat: ChatLog,
    pub session: SessionContext,
    pub active_view: ViewId,
    /// Monotonically increasing counter identifying the current chat mount.
    /// Incremented each time the chat view opens. Replies from requests
    /// spawned under an older mount are discarded in `handle_service_event`.
    ///
    /// u64 overflow is not a practical concern: at one increment per second
    /// it would take ~584 billion years to wrap.
    pub chat_generation: u64,
    /// Set while a backend request from the current chat mount is
    /// outstanding; drives the typing indicator.
    pub reply_pending: bool,
    /// HTTP client for the wellness backend. Wrapped in Arc for sharing
    /// with spawned request tasks.
    pub client: Arc<WellnessClient>,
    /// Sender for backend reply events; spawned tasks use a clone of this
    /// sender to report back to the main event loop.
    pub svc_tx: mpsc::Sender<ServiceEvent>,
}

impl AppState {
    /// Create a new AppState with the given components.
    ///
    /// On startup, callers should run `recover_last_score` to restore the
    /// persisted score slot into the session context.
    pub fn new(
        config: Config,
        db: Database,
        client: WellnessClient,
        svc_tx: mpsc::Sender<ServiceEvent>,
    ) -> Self {
        AppState {
            config,
            db,
            screening: Screening::new(),
            chat: ChatLog::new(),
            session: SessionContext::new(),
            active_view: ViewId::Landing,
            chat_generation: 0,
            reply_pending: false,
            client: Arc::new(client),
            svc_tx,
        }
    }

    /// Build a questionnaire snapshot for the TUI.
    pub fn screening_snapshot(&self) -> ScreeningSnapshot {
        let outcome = if self.screening.is_complete() {
            Some(ScreeningOutcome {
                score: self.screening.score(),
                severity: self.screening.severity(),
            })
        } else {
            None
        };
        ScreeningSnapshot {
            current: self.screening.current_question(),
            answers: *self.screening.answers(),
            answered: self.screening.answered_count(),
            progress_percent: self.screening.progress_percent(),
            outcome,
        }
    }

    /// Open the chat view: reseed the transcript with the greeting, bump the
    /// mount generation, and hand any pending score to the delivery path.
    ///
    /// The announcement lands in the transcript and delivery flips to
    /// `Delivered` before the forward request is even spawned, so the score
    /// is announced and forwarded at most once per completion.
    pub fn open_chat(&mut self) {
        self.chat = ChatLog::new();
        self.chat_generation += 1;
        self.reply_pending = false;

        if let Some(score) = self.session.take_pending() {
            self.chat
                .push_score_announcement(score_announcement_text(score));
            self.forward_score(score);
        }
    }

    /// Spawn a task that forwards a finished score to the backend. The
    /// reply (or failure) comes back as a `ServiceEvent` stamped with the
    /// current chat generation.
    fn forward_score(&mut self, score: u8) {
        let client = Arc::clone(&self.client);
        let tx = self.svc_tx.clone();
        let generation = self.chat_generation;

        self.reply_pending = true;
        info!("Forwarding score {} to backend (gen: {})", score, generation);

        tokio::spawn(async move {
            let event = match client.send_score(score).await {
                Ok(message) => ServiceEvent::ScoreReply {
                    generation,
                    message,
                },
                Err(error) => ServiceEvent::ScoreFailed { generation, error },
            };
            let _ = tx.send(event).await;
        });
    }

    /// Append a user message to the transcript and spawn a task that relays
    /// it to the backend. The message is shown immediately; the reply comes
    /// back asynchronously as a `ServiceEvent`.
    pub fn send_user_message(&mut self, text: String) {
        self.chat.push_user(text.clone());

        let client = Arc::clone(&self.client);
        let tx = self.svc_tx.clone();
        let generation = self.chat_generation;
        let timestamp = Utc::now();

        self.reply_pending = true;

        tokio::spawn(async move {
            let event = match client.send_query(&text, timestamp).await {
                Ok(response) => ServiceEvent::QueryReply {
                    generation,
                    response,
                },
                Err(error) => ServiceEvent::QueryFailed { generation, error },
            };
            let _ = tx.send(event).await;
        });
    }
}

/// Chat line announcing a finished score.
pub fn score_announcement_text(score: u8) -> String {
    format!("You just completed the PHQ-9 test and scored {}.", score)
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

/// Restore the last stored score from the database slot.
///
/// A recovered score is display-only: it appears in the status bar, but the
/// session context marks it `Delivered` so it is never forwarded again.
pub fn recover_last_score(state: &mut AppState) -> anyhow::Result<Option<u8>> {
    match state.db.load_last_score()? {
        Some(score) => {
            info!("Recovered stored score {} from a previous session", score);
            state.session = SessionContext::recovered(score);
            Ok(Some(score))
        }
        None => {
            info!("No stored score found, starting fresh");
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. Backend reply events from spawned request tasks
/// 2. User commands from the TUI
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut svc_rx: mpsc::Receiver<ServiceEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Surface a recovered score in the status bar before the first command.
    if let Some(score) = state.session.score {
        let severity = SeverityClass::from_score(score);
        let _ = ui_tx.send(UiUpdate::LastScore { score, severity }).await;
    }

    // Track whether the service channel is still open. When it closes we
    // stop polling it so tokio::select! never spins on a closed receiver.
    let mut svc_open = true;

    loop {
        tokio::select! {
            // --- Backend replies ---
            event = svc_rx.recv(), if svc_open => {
                match event {
                    Some(event) => {
                        handle_service_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("Service channel closed");
                        svc_open = false;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::StartScreening => {
            info!("Opening questionnaire view");
            state.active_view = ViewId::Screening;
            let _ = ui_tx.send(UiUpdate::ViewChanged(ViewId::Screening)).await;
            send_screening_snapshot(state, ui_tx).await;
        }
        UserCommand::OpenChat => {
            state.open_chat();
            info!("Opened chat view (gen: {})", state.chat_generation);
            state.active_view = ViewId::Chat;
            let _ = ui_tx.send(UiUpdate::ViewChanged(ViewId::Chat)).await;
            let _ = ui_tx
                .send(UiUpdate::ChatReset(state.chat.messages().to_vec()))
                .await;
            let _ = ui_tx.send(UiUpdate::ReplyPending(state.reply_pending)).await;
        }
        UserCommand::GoHome => {
            state.active_view = ViewId::Landing;
            let _ = ui_tx.send(UiUpdate::ViewChanged(ViewId::Landing)).await;
        }
        UserCommand::AnswerCurrent(value) => {
            let question = state.screening.current_question();
            match state.screening.record_answer(question, value) {
                Ok(AnswerOutcome::Advanced) => {
                    send_screening_snapshot(state, ui_tx).await;
                }
                Ok(AnswerOutcome::Completed { score, severity }) => {
                    info!(
                        "Questionnaire complete: score {} ({})",
                        score,
                        severity.label()
                    );
                    state.session.record_completion(score);
                    if let Err(e) = state.db.save_last_score(score) {
                        warn!("Failed to persist score to DB: {}", e);
                    }
                    let _ = ui_tx.send(UiUpdate::LastScore { score, severity }).await;
                    send_screening_snapshot(state, ui_tx).await;
                }
                Err(e) => {
                    debug!("Rejected answer for question {}: {}", question, e);
                }
            }
        }
        UserCommand::PreviousQuestion => {
            match state.screening.go_back() {
                Ok(()) => send_screening_snapshot(state, ui_tx).await,
                Err(e) => debug!("Rejected back-navigation: {}", e),
            }
        }
        UserCommand::NextQuestion => {
            match state.screening.go_forward() {
                Ok(()) => send_screening_snapshot(state, ui_tx).await,
                Err(e) => debug!("Rejected forward-navigation: {}", e),
            }
        }
        UserCommand::RestartScreening => {
            info!("Restarting questionnaire");
            state.screening.restart();
            send_screening_snapshot(state, ui_tx).await;
        }
        UserCommand::SendMessage(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                debug!("Ignoring empty chat message");
                return;
            }
            state.send_user_message(trimmed.to_string());
            if let Some(msg) = state.chat.last() {
                let _ = ui_tx
                    .send(UiUpdate::MessageAppended(Box::new(msg.clone())))
                    .await;
            }
            let _ = ui_tx.send(UiUpdate::ReplyPending(true)).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Push the current questionnaire snapshot to the TUI.
async fn send_screening_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::ScreeningSnapshot(Box::new(
            state.screening_snapshot(),
        )))
        .await;
}

/// Handle a backend reply event from a spawned request task.
///
/// **Generation check**: every event carries the chat generation that was
/// current when its task was spawned. If it no longer matches
/// `state.chat_generation`, the user has left and re-entered the chat since
/// the request went out; the transcript it belonged to is gone, so the
/// event is silently discarded.
async fn handle_service_event(
    state: &mut AppState,
    event: ServiceEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let event_generation = event.generation();
    if event_generation != state.chat_generation {
        debug!(
            "Discarding stale backend reply (event gen: {}, current gen: {})",
            event_generation, state.chat_generation
        );
        return;
    }

    match event {
        ServiceEvent::ScoreReply { message, .. } => {
            state.chat.push_score_response(message);
        }
        ServiceEvent::ScoreFailed { error, .. } => {
            warn!("Score forward failed: {}", error);
            state.chat.push_error(SCORE_FORWARD_FALLBACK);
        }
        ServiceEvent::QueryReply { response, .. } => match response {
            Some(text) => state.chat.push_bot(text),
            None => state.chat.push_bot(EMPTY_REPLY_FALLBACK),
        },
        ServiceEvent::QueryFailed { error, .. } => {
            warn!("Chat query failed: {}", error);
            state.chat.push_error(QUERY_FALLBACK);
        }
    }

    state.reply_pending = false;
    if let Some(msg) = state.chat.last() {
        let _ = ui_tx
            .send(UiUpdate::MessageAppended(Box::new(msg.clone())))
            .await;
    }
    let _ = ui_tx.send(UiUpdate::ReplyPending(false)).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
