// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState mutations (chat typing, scrolling,
// the quit confirmation modal).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::{UserCommand, ViewId};

use super::ViewState;

/// Lines scrolled per PageUp/PageDown in the chat transcript.
const CHAT_PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator. Returns `None` when the key was handled locally by
/// mutating `ViewState` (typing, scrolling, modal toggles) or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything
    // else is blocked.
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match view_state.active_view {
        ViewId::Landing => handle_landing_key(key_event, view_state),
        ViewId::Screening => {
            if view_state.screening.outcome.is_some() {
                handle_results_key(key_event, view_state)
            } else {
                handle_question_key(key_event, view_state)
            }
        }
        ViewId::Chat => handle_chat_key(key_event, view_state),
    }
}

/// Landing view: menu selection.
fn handle_landing_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('s') | KeyCode::Enter => Some(UserCommand::StartScreening),
        KeyCode::Char('c') => Some(UserCommand::OpenChat),
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Questionnaire: digits answer, arrows navigate.
fn handle_question_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        // 1-4 map onto option values 0-3
        KeyCode::Char(c @ '1'..='4') => {
            let value = c as u8 - b'1';
            Some(UserCommand::AnswerCurrent(value))
        }
        KeyCode::Left | KeyCode::Char('h') => Some(UserCommand::PreviousQuestion),
        KeyCode::Right | KeyCode::Char('l') => Some(UserCommand::NextQuestion),
        KeyCode::Char('r') => Some(UserCommand::RestartScreening),
        KeyCode::Esc => Some(UserCommand::GoHome),
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Results screen: retake or hand off to the chat.
fn handle_results_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('r') => Some(UserCommand::RestartScreening),
        KeyCode::Char('c') | KeyCode::Enter => Some(UserCommand::OpenChat),
        KeyCode::Esc => Some(UserCommand::GoHome),
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Chat view: the input line captures printable characters, so there is no
/// single-key quit here; Esc leaves the view and Ctrl+C quits.
fn handle_chat_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => {
            if view_state.chat_input.trim().is_empty() {
                // Nothing to send; keep whatever whitespace is typed.
                return None;
            }
            let text = std::mem::take(&mut view_state.chat_input);
            Some(UserCommand::SendMessage(text))
        }
        KeyCode::Backspace => {
            view_state.chat_input.pop();
            None
        }
        KeyCode::Esc => Some(UserCommand::GoHome),
        KeyCode::Up => {
            view_state.chat_scroll = view_state.chat_scroll.saturating_add(1);
            None
        }
        KeyCode::Down => {
            view_state.chat_scroll = view_state.chat_scroll.saturating_sub(1);
            None
        }
        KeyCode::PageUp => {
            view_state.chat_scroll = view_state.chat_scroll.saturating_add(CHAT_PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.chat_scroll = view_state.chat_scroll.saturating_sub(CHAT_PAGE_SIZE);
            None
        }
        KeyCode::Char(c) => {
            view_state.chat_input.push(c);
            None
        }
        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to the previous view)
/// - All other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ScreeningOutcome;
    use crate::screening::SeverityClass;
    use crossterm::event::{KeyEventState, KeyModifiers};

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Helper to create a KeyEvent with Ctrl modifier.
    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state_in(view: ViewId) -> ViewState {
        let mut state = ViewState::default();
        state.active_view = view;
        state
    }

    fn results_state() -> ViewState {
        let mut state = state_in(ViewId::Screening);
        state.screening.outcome = Some(ScreeningOutcome {
            score: 12,
            severity: SeverityClass::Moderate,
        });
        state
    }

    // -- Landing --

    #[test]
    fn landing_s_starts_screening() {
        let mut state = state_in(ViewId::Landing);
        let result = handle_key(key(KeyCode::Char('s')), &mut state);
        assert_eq!(result, Some(UserCommand::StartScreening));
    }

    #[test]
    fn landing_enter_starts_screening() {
        let mut state = state_in(ViewId::Landing);
        let result = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(result, Some(UserCommand::StartScreening));
    }

    #[test]
    fn landing_c_opens_chat() {
        let mut state = state_in(ViewId::Landing);
        let result = handle_key(key(KeyCode::Char('c')), &mut state);
        assert_eq!(result, Some(UserCommand::OpenChat));
    }

    #[test]
    fn landing_unknown_key_is_ignored() {
        let mut state = state_in(ViewId::Landing);
        let result = handle_key(key(KeyCode::Char('x')), &mut state);
        assert!(result.is_none());
    }

    // -- Questionnaire --

    #[test]
    fn digits_map_to_option_values() {
        let mut state = state_in(ViewId::Screening);
        assert_eq!(
            handle_key(key(KeyCode::Char('1')), &mut state),
            Some(UserCommand::AnswerCurrent(0))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('4')), &mut state),
            Some(UserCommand::AnswerCurrent(3))
        );
    }

    #[test]
    fn out_of_range_digits_are_ignored() {
        let mut state = state_in(ViewId::Screening);
        assert!(handle_key(key(KeyCode::Char('5')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('0')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('9')), &mut state).is_none());
    }

    #[test]
    fn arrows_navigate_questions() {
        let mut state = state_in(ViewId::Screening);
        assert_eq!(
            handle_key(key(KeyCode::Left), &mut state),
            Some(UserCommand::PreviousQuestion)
        );
        assert_eq!(
            handle_key(key(KeyCode::Right), &mut state),
            Some(UserCommand::NextQuestion)
        );
    }

    #[test]
    fn vim_keys_navigate_questions() {
        let mut state = state_in(ViewId::Screening);
        assert_eq!(
            handle_key(key(KeyCode::Char('h')), &mut state),
            Some(UserCommand::PreviousQuestion)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('l')), &mut state),
            Some(UserCommand::NextQuestion)
        );
    }

    #[test]
    fn esc_leaves_questionnaire_for_home() {
        let mut state = state_in(ViewId::Screening);
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::GoHome)
        );
    }

    #[test]
    fn r_restarts_questionnaire() {
        let mut state = state_in(ViewId::Screening);
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::RestartScreening)
        );
    }

    // -- Results --

    #[test]
    fn results_r_retakes() {
        let mut state = results_state();
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::RestartScreening)
        );
    }

    #[test]
    fn results_c_opens_chat() {
        let mut state = results_state();
        assert_eq!(
            handle_key(key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::OpenChat)
        );
    }

    #[test]
    fn results_enter_opens_chat() {
        let mut state = results_state();
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::OpenChat)
        );
    }

    #[test]
    fn results_digits_do_not_answer() {
        // Answering keys go dead once the outcome is on screen.
        let mut state = results_state();
        assert!(handle_key(key(KeyCode::Char('2')), &mut state).is_none());
    }

    // -- Chat typing --

    #[test]
    fn chat_chars_append_to_input() {
        let mut state = state_in(ViewId::Chat);
        handle_key(key(KeyCode::Char('h')), &mut state);
        handle_key(key(KeyCode::Char('e')), &mut state);
        handle_key(key(KeyCode::Char('y')), &mut state);
        assert_eq!(state.chat_input, "hey");
    }

    #[test]
    fn chat_q_types_instead_of_quitting() {
        let mut state = state_in(ViewId::Chat);
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none());
        assert_eq!(state.chat_input, "q");
        assert!(!state.confirm_quit);
    }

    #[test]
    fn chat_backspace_removes_char() {
        let mut state = state_in(ViewId::Chat);
        state.chat_input = "hell".to_string();
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.chat_input, "hel");
    }

    #[test]
    fn chat_backspace_on_empty_is_noop() {
        let mut state = state_in(ViewId::Chat);
        handle_key(key(KeyCode::Backspace), &mut state);
        assert!(state.chat_input.is_empty());
    }

    #[test]
    fn chat_enter_sends_and_clears_input() {
        let mut state = state_in(ViewId::Chat);
        state.chat_input = "how are you".to_string();
        let result = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            result,
            Some(UserCommand::SendMessage("how are you".to_string()))
        );
        assert!(state.chat_input.is_empty());
    }

    #[test]
    fn chat_enter_on_whitespace_sends_nothing() {
        let mut state = state_in(ViewId::Chat);
        state.chat_input = "   ".to_string();
        let result = handle_key(key(KeyCode::Enter), &mut state);
        assert!(result.is_none());
        assert_eq!(state.chat_input, "   ");
    }

    #[test]
    fn chat_esc_goes_home() {
        let mut state = state_in(ViewId::Chat);
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::GoHome)
        );
    }

    #[test]
    fn chat_scroll_keys_adjust_offset() {
        let mut state = state_in(ViewId::Chat);
        handle_key(key(KeyCode::Up), &mut state);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.chat_scroll, 2);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.chat_scroll, 1);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.chat_scroll, 1 + CHAT_PAGE_SIZE);
        handle_key(key(KeyCode::PageDown), &mut state);
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.chat_scroll, 0);
    }

    #[test]
    fn chat_scroll_down_does_not_underflow() {
        let mut state = state_in(ViewId::Chat);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.chat_scroll, 0);
    }

    // -- Quit confirmation --

    #[test]
    fn q_enters_confirm_quit_mode() {
        let mut state = state_in(ViewId::Landing);
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none(), "q should not send Quit immediately");
        assert!(state.confirm_quit);
    }

    #[test]
    fn q_on_questionnaire_enters_confirm_quit_mode() {
        let mut state = state_in(ViewId::Screening);
        let result = handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(result.is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn confirm_quit_y_sends_quit() {
        let mut state = state_in(ViewId::Landing);
        state.confirm_quit = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn double_q_workflow_quits() {
        let mut state = state_in(ViewId::Landing);
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirm_quit_n_cancels() {
        let mut state = state_in(ViewId::Screening);
        state.confirm_quit = true;
        let result = handle_key(key(KeyCode::Char('n')), &mut state);
        assert!(result.is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirm_quit_esc_cancels() {
        let mut state = state_in(ViewId::Landing);
        state.confirm_quit = true;
        let result = handle_key(key(KeyCode::Esc), &mut state);
        assert!(result.is_none());
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirm_quit_blocks_other_keys() {
        let mut state = state_in(ViewId::Screening);
        state.confirm_quit = true;
        assert!(handle_key(key(KeyCode::Char('1')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Left), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_immediately_from_any_view() {
        for view in [ViewId::Landing, ViewId::Screening, ViewId::Chat] {
            let mut state = state_in(view);
            let result = handle_key(ctrl_key(KeyCode::Char('c')), &mut state);
            assert_eq!(result, Some(UserCommand::Quit), "Ctrl+C in {:?}", view);
        }
    }

    #[test]
    fn ctrl_c_quits_even_during_confirmation() {
        let mut state = state_in(ViewId::Landing);
        state.confirm_quit = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn ctrl_c_quits_while_typing_in_chat() {
        let mut state = state_in(ViewId::Chat);
        state.chat_input = "half a thought".to_string();
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    // -- KeyEventKind filtering --

    #[test]
    fn release_events_are_ignored() {
        let mut state = state_in(ViewId::Chat);
        let release_event = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let result = handle_key(release_event, &mut state);
        assert!(result.is_none());
        assert!(state.chat_input.is_empty(), "release must not type");
    }

    #[test]
    fn repeat_events_are_ignored() {
        let mut state = state_in(ViewId::Screening);
        let repeat_event = KeyEvent {
            code: KeyCode::Char('1'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Repeat,
            state: KeyEventState::NONE,
        };
        let result = handle_key(repeat_event, &mut state);
        assert!(result.is_none(), "repeat must not answer");
    }
}
