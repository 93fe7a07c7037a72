// Chat input line: the message being typed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the bordered input box with a block cursor.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = if state.chat_input.is_empty() {
        Line::from(Span::styled(
            "Type a message...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(state.chat_input.clone()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ])
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message (Enter to send) "),
    );
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
