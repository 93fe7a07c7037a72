// Severity banding over the PHQ-9 total score and the result text shown on
// the completion card.

/// Severity band for a PHQ-9 total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityClass {
    Low,
    Moderate,
    High,
}

impl SeverityClass {
    /// Band for a total score: 0-4 low, 5-14 moderate, 15 and above high.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => SeverityClass::Low,
            5..=14 => SeverityClass::Moderate,
            _ => SeverityClass::High,
        }
    }

    /// Lowercase display label.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityClass::Low => "low",
            SeverityClass::Moderate => "moderate",
            SeverityClass::High => "high",
        }
    }
}

/// The summary shown when a screening completes. Fully determined by the
/// severity band; no independent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultMessage {
    pub message: &'static str,
    pub severity: SeverityClass,
    pub suggestion: &'static str,
}

/// Result text for a severity band.
pub fn result_message(severity: SeverityClass) -> ResultMessage {
    match severity {
        SeverityClass::Low => ResultMessage {
            message: "Your mental health appears to be in good shape!",
            severity,
            suggestion: "Continue practicing good self-care and check in with yourself regularly.",
        },
        SeverityClass::Moderate => ResultMessage {
            message: "You're experiencing some difficulties with your mental health.",
            severity,
            suggestion: "Consider talking to our AI chatbot for support and guidance.",
        },
        SeverityClass::High => ResultMessage {
            message: "You may be experiencing significant depression.",
            severity,
            suggestion: "We strongly recommend speaking with a mental health professional. \
                         Would you like help finding a counselor?",
        },
    }
}
