// Screen layouts: panel arrangement and sizing, one layout per view.
//
// Landing:                      Questionnaire:          Chat:
// +------------------------+    +------------------+    +------------------+
// | Status Bar (1 row)     |    | Status Bar (1)   |    | Status Bar (1)   |
// +------------------------+    +------------------+    +------------------+
// | Hero (fill)            |    | Progress (3)     |    | Transcript (fill)|
// |                        |    +------------------+    |                  |
// |                        |    | Body (fill)      |    +------------------+
// |                        |    |                  |    | Input (3)        |
// +------------------------+    +------------------+    +------------------+
// | Footer (1 row)         |    | Help Bar (1)     |    | Help Bar (1)     |
// +------------------------+    +------------------+    +------------------+
//
// The results screen replaces the questionnaire's progress/body zones with
// a single summary zone.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved areas for the landing view.
#[derive(Debug, Clone)]
pub struct LandingLayout {
    pub status_bar: Rect,
    /// Title, carousel, and menu.
    pub hero: Rect,
    /// Bottom row: copyright footer.
    pub footer: Rect,
}

/// Resolved areas for the questionnaire view.
#[derive(Debug, Clone)]
pub struct ScreeningLayout {
    pub status_bar: Rect,
    /// Progress gauge with border.
    pub progress: Rect,
    /// Question text and answer options.
    pub body: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Resolved areas for the results screen.
#[derive(Debug, Clone)]
pub struct ResultsLayout {
    pub status_bar: Rect,
    /// Score, band message, and suggestion.
    pub summary: Rect,
    pub help_bar: Rect,
}

/// Resolved areas for the chat view.
#[derive(Debug, Clone)]
pub struct ChatLayout {
    pub status_bar: Rect,
    /// Scrolling message transcript.
    pub transcript: Rect,
    /// Bordered input line.
    pub input: Rect,
    pub help_bar: Rect,
}

/// Build the landing view layout.
pub fn build_landing_layout(area: Rect) -> LandingLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // hero
            Constraint::Length(1), // footer
        ])
        .split(area);

    LandingLayout {
        status_bar: vertical[0],
        hero: vertical[1],
        footer: vertical[2],
    }
}

/// Build the questionnaire view layout.
pub fn build_screening_layout(area: Rect) -> ScreeningLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // progress gauge
            Constraint::Min(10),   // question + options
            Constraint::Length(1), // help bar
        ])
        .split(area);

    ScreeningLayout {
        status_bar: vertical[0],
        progress: vertical[1],
        body: vertical[2],
        help_bar: vertical[3],
    }
}

/// Build the results screen layout.
pub fn build_results_layout(area: Rect) -> ResultsLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // summary
            Constraint::Length(1), // help bar
        ])
        .split(area);

    ResultsLayout {
        status_bar: vertical[0],
        summary: vertical[1],
        help_bar: vertical[2],
    }
}

/// Build the chat view layout.
pub fn build_chat_layout(area: Rect) -> ChatLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(6),    // transcript
            Constraint::Length(3), // input box
            Constraint::Length(1), // help bar
        ])
        .split(area);

    ChatLayout {
        status_bar: vertical[0],
        transcript: vertical[1],
        input: vertical[2],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
