// Chat transcript widget: sender-styled message lines with scrollback.
//
// The transcript stays pinned to the newest message; `ViewState::chat_scroll`
// counts lines scrolled up from the bottom, so 0 means "follow new messages".

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::chat::{ChatMessage, Sender};
use crate::tui::ViewState;

/// Render the transcript into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines: Vec<Line> = Vec::new();
    for msg in &state.chat_messages {
        lines.push(message_line(msg));
    }
    if state.reply_pending {
        lines.push(typing_line());
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    // Clamp the user's offset, then convert from "lines above the bottom"
    // to the top-based offset Paragraph::scroll expects.
    let from_bottom = state.chat_scroll.min(max_scroll);
    let scroll = (max_scroll - from_bottom) as u16;

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" WellNest "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Build the display line for one message.
pub fn message_line(msg: &ChatMessage) -> Line<'static> {
    if msg.is_score {
        // Score hand-off announcement: a quiet system line.
        return Line::from(Span::styled(
            format!("• {}", msg.text),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    match msg.sender {
        Sender::User => Line::from(vec![
            Span::styled(
                "You: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(msg.text.clone()),
        ]),
        Sender::Bot | Sender::System => {
            let text_style = if msg.is_error {
                Style::default().fg(Color::Red)
            } else if msg.is_score_response {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    "WellNest: ",
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.text.clone(), text_style),
            ])
        }
    }
}

/// Indicator line shown while a backend reply is outstanding.
fn typing_line() -> Line<'static> {
    Line::from(Span::styled(
        "WellNest is typing...",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
