// Landing view: hero banner, rotating feature spotlight, and the main menu.
//
// Content mirrors the product landing page. The spotlight advances on its
// own every few seconds; the render tick keeps it moving without any input
// events.

use std::time::Duration;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Seconds each spotlight entry stays on screen.
const SLIDE_SECS: u64 = 3;

/// Rotating (title, description) pairs shown in the feature spotlight.
const SPOTLIGHT: [(&str, &str); 4] = [
    (
        "AI-Powered Support",
        "24/7 access to our AI companion for immediate mental health support.",
    ),
    (
        "Community",
        "Connect with others who understand your journey in a safe space.",
    ),
    (
        "Progress Tracking",
        "Monitor your mental wellness journey with our intuitive tools.",
    ),
    (
        "Privacy First",
        "Your data is encrypted and your privacy is our top priority.",
    ),
];

/// Key-features list shown below the spotlight.
const KEY_FEATURES: [(&str, &str); 4] = [
    (
        "AI Chat Support",
        "Instant coping strategies in English + regional languages",
    ),
    (
        "Confidential Counseling",
        "Book stigma-free sessions with campus counselors",
    ),
    (
        "Resource Hub",
        "Relaxation audio, guides, videos curated for students",
    ),
    (
        "Peer Community",
        "Anonymous, moderated student support forum",
    ),
];

/// The three "How It Works" steps.
const HOW_IT_WORKS: [&str; 3] = [
    "Take a quick wellness check (PHQ-9 / GAD-7)",
    "Get instant guidance or book a counselor",
    "Explore resources & connect with peers",
];

const FOOTER_TEXT: &str = "© 2025 MindEase | Built for Students, Backed by Empathy";

/// Render the landing hero: title, spotlight, feature lists, and menu.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let zones = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // banner + headline
            Constraint::Length(3), // feature spotlight
            Constraint::Min(9),    // key features + how it works
            Constraint::Length(4), // menu
        ])
        .split(area);

    render_title(frame, zones[0]);
    render_spotlight(frame, zones[1], state.carousel_started.elapsed());
    render_feature_lists(frame, zones[2]);
    render_menu(frame, zones[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "WellNest",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Welcome to MindEase",
            Style::default().fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            "Your Mental Health, Your Safe Space",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let paragraph = Paragraph::new(lines).centered();
    frame.render_widget(paragraph, area);
}

fn render_spotlight(frame: &mut Frame, area: Rect, elapsed: Duration) {
    let index = slide_index(elapsed);
    let (title, description) = SPOTLIGHT[index];

    let mut dots: Vec<Span> = Vec::new();
    for i in 0..SPOTLIGHT.len() {
        let dot = if i == index { "\u{25cf}" } else { "\u{25cb}" };
        dots.push(Span::styled(dot, Style::default().fg(Color::Magenta)));
        dots.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::Gray),
        )),
        Line::from(dots),
    ];
    let paragraph = Paragraph::new(lines).centered();
    frame.render_widget(paragraph, area);
}

fn render_feature_lists(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "Key Features",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];
    for (title, description) in KEY_FEATURES {
        lines.push(Line::from(vec![
            Span::styled(title, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(": {}", description),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "How It Works",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    for (i, step) in HOW_IT_WORKS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("Step {}  ", i + 1),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(*step),
        ]));
    }

    let paragraph = Paragraph::new(lines).centered();
    frame.render_widget(paragraph, area);
}

fn render_menu(frame: &mut Frame, area: Rect) {
    let entries = [
        ("s", "Start the PHQ-9 check-in"),
        ("c", "Chat with the WellNest assistant"),
        ("q", "Quit"),
    ];
    let mut lines = vec![Line::from("")];
    for (binding, label) in entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}  ", binding),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(label),
        ]));
    }
    let paragraph = Paragraph::new(lines).centered();
    frame.render_widget(paragraph, area);
}

/// Render the copyright footer row.
pub fn render_footer(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(
        FOOTER_TEXT,
        Style::default().fg(Color::DarkGray),
    ))
    .centered();
    frame.render_widget(paragraph, area);
}

/// Which spotlight entry to show after the given elapsed time.
pub fn slide_index(elapsed: Duration) -> usize {
    (elapsed.as_secs() / SLIDE_SECS) as usize % SPOTLIGHT.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
