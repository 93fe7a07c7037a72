// TUI widget modules for each view zone.

pub mod chat_input;
pub mod chat_log;
pub mod landing;
pub mod questionnaire;
pub mod quit_confirm;
pub mod results;
pub mod status_bar;

use ratatui::style::Color;

use crate::screening::SeverityClass;

/// Accent color for a severity band, shared by the results screen and the
/// status bar.
pub fn severity_color(severity: SeverityClass) -> Color {
    match severity {
        SeverityClass::Low => Color::Green,
        SeverityClass::Moderate => Color::Yellow,
        SeverityClass::High => Color::Red,
    }
}
