// Status bar widget: app name, active view, last stored score.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::ViewId;
use crate::tui::ViewState;

use super::severity_color;

/// Render the status bar into the given area.
///
/// Layout: [app name] [view indicator] [last score, when present]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " WellNest ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));
    spans.extend(view_spans(state.active_view));

    if let Some((score, severity)) = state.last_score {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("last score: {} ({})", score, severity.label()),
            Style::default().fg(severity_color(severity)),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Build view indicator spans with the active view highlighted.
/// E.g. "[Home] [Check-in] [Chat]"
pub fn view_spans(active: ViewId) -> Vec<Span<'static>> {
    let views = [ViewId::Landing, ViewId::Screening, ViewId::Chat];

    let mut spans = Vec::new();
    for view in views {
        let style = if view == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", view_label(view)), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Return the label for a view.
pub fn view_label(view: ViewId) -> &'static str {
    match view {
        ViewId::Landing => "Home",
        ViewId::Screening => "Check-in",
        ViewId::Chat => "Chat",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
