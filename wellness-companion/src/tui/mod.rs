// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps. Keyboard
// events flow the other way as `UserCommand` messages.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::chat::ChatMessage;
use crate::protocol::{ScreeningSnapshot, UiUpdate, UserCommand, ViewId};
use crate::screening::SeverityClass;

use layout::{
    build_chat_layout, build_landing_layout, build_results_layout, build_screening_layout,
};

/// Keyboard hints shown while answering the questionnaire.
const SCREENING_HELP: &str = " 1-4:Answer | \u{2190}/\u{2192}:Back/Forward | r:Restart | Esc:Home | q:Quit";
/// Keyboard hints shown on the results screen.
const RESULTS_HELP: &str = " r:Retake | c:Chat | Esc:Home | q:Quit";
/// Keyboard hints shown in the chat view, where most keys type.
const CHAT_HELP: &str = " Enter:Send | \u{2191}/\u{2193}:Scroll | Esc:Home | Ctrl+C:Quit";

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the active view.
/// Purely presentational concerns (the chat input line, scroll position,
/// the quit dialog, the landing carousel clock) live only here.
pub struct ViewState {
    /// Which view fills the frame.
    pub active_view: ViewId,
    /// Questionnaire progress as last reported by the orchestrator.
    pub screening: ScreeningSnapshot,
    /// Chat transcript in display order.
    pub chat_messages: Vec<ChatMessage>,
    /// Whether the assistant is still working on a reply.
    pub reply_pending: bool,
    /// Text typed into the chat input line but not yet sent.
    pub chat_input: String,
    /// Transcript scroll offset in lines up from the bottom (0 = follow).
    pub chat_scroll: usize,
    /// Most recently completed score and its severity band, if any.
    pub last_score: Option<(u8, SeverityClass)>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    /// When the landing carousel started, for slide rotation.
    pub carousel_started: Instant,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_view: ViewId::Landing,
            screening: ScreeningSnapshot::default(),
            chat_messages: Vec::new(),
            reply_pending: false,
            chat_input: String::new(),
            chat_scroll: 0,
            last_score: None,
            confirm_quit: false,
            carousel_started: Instant::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::ViewChanged(view) => {
            state.active_view = view;
            if view == ViewId::Chat {
                // Entering the chat starts with a clear input line and the
                // transcript pinned to the newest message.
                state.chat_input.clear();
                state.chat_scroll = 0;
            }
        }
        UiUpdate::ScreeningSnapshot(snapshot) => {
            state.screening = *snapshot;
        }
        UiUpdate::ChatReset(messages) => {
            state.chat_messages = messages;
            state.chat_scroll = 0;
        }
        UiUpdate::MessageAppended(message) => {
            state.chat_messages.push(*message);
            // Snap back to the newest message when the transcript grows.
            state.chat_scroll = 0;
        }
        UiUpdate::ReplyPending(pending) => {
            state.reply_pending = pending;
        }
        UiUpdate::LastScore { score, severity } => {
            state.last_score = Some((score, severity));
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame for the active view.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    match state.active_view {
        ViewId::Landing => render_landing(frame, state),
        ViewId::Screening => {
            if state.screening.outcome.is_some() {
                render_results(frame, state);
            } else {
                render_screening(frame, state);
            }
        }
        ViewId::Chat => render_chat(frame, state),
    }

    // The quit dialog overlays whatever view is underneath.
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_landing(frame: &mut Frame, state: &ViewState) {
    let layout = build_landing_layout(frame.area());
    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::landing::render(frame, layout.hero, state);
    widgets::landing::render_footer(frame, layout.footer);
}

fn render_screening(frame: &mut Frame, state: &ViewState) {
    let layout = build_screening_layout(frame.area());
    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::questionnaire::render_progress(frame, layout.progress, state);
    widgets::questionnaire::render(frame, layout.body, state);
    render_help_bar(frame, layout.help_bar, SCREENING_HELP);
}

fn render_results(frame: &mut Frame, state: &ViewState) {
    let layout = build_results_layout(frame.area());
    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::results::render(frame, layout.summary, state);
    render_help_bar(frame, layout.help_bar, RESULTS_HELP);
}

fn render_chat(frame: &mut Frame, state: &ViewState) {
    let layout = build_chat_layout(frame.area());
    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::chat_log::render(frame, layout.transcript, state);
    widgets::chat_input::render(frame, layout.input, state);
    render_help_bar(frame, layout.help_bar, CHAT_HELP);
}

fn render_help_bar(frame: &mut Frame, area: Rect, text: &str) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) => {
                        // Input error -- break out
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatLog, GREETING};
    use crate::protocol::ScreeningOutcome;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(state: &ViewState) {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, state))
            .unwrap();
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.active_view, ViewId::Landing);
        assert_eq!(state.screening, ScreeningSnapshot::default());
        assert!(state.chat_messages.is_empty());
        assert!(!state.reply_pending);
        assert!(state.chat_input.is_empty());
        assert_eq!(state.chat_scroll, 0);
        assert!(state.last_score.is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn apply_ui_update_view_changed() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::ViewChanged(ViewId::Screening));
        assert_eq!(state.active_view, ViewId::Screening);
    }

    #[test]
    fn entering_chat_clears_input_and_scroll() {
        let mut state = ViewState::default();
        state.chat_input = "left over".to_string();
        state.chat_scroll = 7;
        apply_ui_update(&mut state, UiUpdate::ViewChanged(ViewId::Chat));
        assert_eq!(state.active_view, ViewId::Chat);
        assert!(state.chat_input.is_empty());
        assert_eq!(state.chat_scroll, 0);
    }

    #[test]
    fn leaving_chat_keeps_input_untouched() {
        let mut state = ViewState::default();
        state.active_view = ViewId::Chat;
        state.chat_input = "typing".to_string();
        apply_ui_update(&mut state, UiUpdate::ViewChanged(ViewId::Landing));
        assert_eq!(state.chat_input, "typing");
    }

    #[test]
    fn apply_ui_update_screening_snapshot() {
        let mut state = ViewState::default();
        let mut snapshot = ScreeningSnapshot::default();
        snapshot.current = 4;
        snapshot.answered = 4;
        snapshot.progress_percent = 44;
        apply_ui_update(&mut state, UiUpdate::ScreeningSnapshot(Box::new(snapshot)));
        assert_eq!(state.screening.current, 4);
        assert_eq!(state.screening.answered, 4);
        assert_eq!(state.screening.progress_percent, 44);
    }

    #[test]
    fn apply_ui_update_chat_reset() {
        let mut state = ViewState::default();
        state.chat_scroll = 12;
        let log = ChatLog::new();
        apply_ui_update(&mut state, UiUpdate::ChatReset(log.messages().to_vec()));
        assert_eq!(state.chat_messages.len(), 1);
        assert_eq!(state.chat_messages[0].text, GREETING);
        assert_eq!(state.chat_scroll, 0);
    }

    #[test]
    fn apply_ui_update_message_appended_snaps_to_bottom() {
        let mut state = ViewState::default();
        state.chat_scroll = 5;
        let mut log = ChatLog::new();
        log.push_user("hello");
        let message = log.last().unwrap().clone();
        apply_ui_update(&mut state, UiUpdate::MessageAppended(Box::new(message)));
        assert_eq!(state.chat_messages.len(), 1);
        assert_eq!(state.chat_messages[0].text, "hello");
        assert_eq!(state.chat_scroll, 0);
    }

    #[test]
    fn apply_ui_update_reply_pending() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::ReplyPending(true));
        assert!(state.reply_pending);
        apply_ui_update(&mut state, UiUpdate::ReplyPending(false));
        assert!(!state.reply_pending);
    }

    #[test]
    fn apply_ui_update_last_score() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::LastScore {
                score: 16,
                severity: SeverityClass::High,
            },
        );
        assert_eq!(state.last_score, Some((16, SeverityClass::High)));
    }

    #[test]
    fn render_frame_landing_smoke() {
        let state = ViewState::default();
        draw(&state);
    }

    #[test]
    fn render_frame_questionnaire_smoke() {
        let mut state = ViewState::default();
        state.active_view = ViewId::Screening;
        state.screening.current = 3;
        state.screening.answered = 3;
        state.screening.progress_percent = 33;
        draw(&state);
    }

    #[test]
    fn render_frame_results_smoke() {
        let mut state = ViewState::default();
        state.active_view = ViewId::Screening;
        state.screening.outcome = Some(ScreeningOutcome {
            score: 21,
            severity: SeverityClass::High,
        });
        state.last_score = Some((21, SeverityClass::High));
        draw(&state);
    }

    #[test]
    fn render_frame_chat_smoke() {
        let mut state = ViewState::default();
        state.active_view = ViewId::Chat;
        let mut log = ChatLog::new();
        log.push_user("hi");
        log.push_bot("Hello!");
        state.chat_messages = log.messages().to_vec();
        state.reply_pending = true;
        state.chat_input = "how do I".to_string();
        draw(&state);
    }

    #[test]
    fn render_frame_quit_overlay_smoke() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        draw(&state);
    }
}
