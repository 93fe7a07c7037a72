// Questionnaire view: progress gauge, question text, and answer options.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::screening::{ANSWER_OPTIONS, QUESTIONS, QUESTION_COUNT};
use crate::tui::ViewState;

/// Shared PHQ-9 instruction shown above every question.
const LEAD_IN: &str =
    "Over the last 2 weeks, how often have you been bothered by the following problem?";

/// Render the progress gauge with an answered-count label.
pub fn render_progress(frame: &mut Frame, area: Rect, state: &ViewState) {
    let percent = state.screening.progress_percent.min(100) as u16;
    let label = format!(
        "{} of {} answered",
        state.screening.answered, QUESTION_COUNT
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(percent)
        .label(label);
    frame.render_widget(gauge, area);
}

/// Render the question body: prompt on top, answer options below.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let zones = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(6)])
        .split(area);

    render_question(frame, zones[0], state);
    render_options(frame, zones[1], state);
}

fn render_question(frame: &mut Frame, area: Rect, state: &ViewState) {
    let index = state.screening.current;
    let question = QUESTIONS.get(index).copied().unwrap_or("");

    let mut lines = vec![
        Line::from(Span::styled(LEAD_IN, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            question,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    // No previous answer to revisit on the first question.
    if index > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "(press ← to revisit your previous answer)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!(" Question {} of {} ", index + 1, QUESTION_COUNT);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_options(frame: &mut Frame, area: Rect, state: &ViewState) {
    let recorded = state
        .screening
        .answers
        .get(state.screening.current)
        .copied()
        .flatten();

    let items: Vec<ListItem> = ANSWER_OPTIONS
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let selected = recorded == Some(*value);
            ListItem::new(option_line(i + 1, label, selected))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Press 1-4 to answer "),
    );
    frame.render_widget(list, area);
}

/// Build one answer option row; the recorded answer gets a filled marker
/// and an accent style.
fn option_line(number: usize, label: &str, selected: bool) -> Line<'static> {
    let marker = if selected { "●" } else { "○" };
    let label_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!(" {}  ", number), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{} {}", marker, label), label_style),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
