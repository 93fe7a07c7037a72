// Results screen: final score, severity band message, and next steps.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::screening::{result_message, SeverityClass, MAX_SCORE};
use crate::tui::ViewState;

use super::severity_color;

/// Render the results summary. The caller only routes here once the
/// questionnaire is complete; with no outcome this draws nothing.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(outcome) = state.screening.outcome else {
        return;
    };

    let zones = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(7)])
        .split(area);

    render_headline(frame, zones[0], outcome.score, outcome.severity);
    render_guidance(frame, zones[1], outcome.severity);
}

fn render_headline(frame: &mut Frame, area: Rect, score: u8, severity: SeverityClass) {
    let line = Line::from(vec![
        Span::styled(
            format!("Your score: {} / {}", score, MAX_SCORE),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("({})", severity.label()),
            Style::default()
                .fg(severity_color(severity))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let paragraph = Paragraph::new(line)
        .centered()
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_guidance(frame: &mut Frame, area: Rect, severity: SeverityClass) {
    let msg = result_message(severity);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            msg.message,
            Style::default().fg(severity_color(severity)),
        )),
        Line::from(""),
        Line::from(Span::styled(
            msg.suggestion,
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  r  ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Retake the check-in"),
        ]),
        Line::from(vec![
            Span::styled(
                "  c  ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Talk it through with the WellNest assistant"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Your Result ")
                .border_style(Style::default().fg(severity_color(severity))),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
