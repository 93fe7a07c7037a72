// PHQ-9 screening: fixed instrument content, the answer state machine,
// and severity banding over the total score.

pub mod engine;
pub mod severity;

pub use engine::{AnswerOutcome, Screening, ScreeningError, ScreeningPhase};
pub use severity::{result_message, ResultMessage, SeverityClass};

/// Number of questions in the PHQ-9 instrument.
pub const QUESTION_COUNT: usize = 9;

/// Highest selectable answer value ("Nearly every day").
pub const MAX_ANSWER_VALUE: u8 = 3;

/// Maximum possible total score (every question at the highest value).
pub const MAX_SCORE: u8 = 27;

/// The nine PHQ-9 questions in presentation order. Standard instrument
/// wording; the index into this array is the question index used everywhere.
pub const QUESTIONS: [&str; QUESTION_COUNT] = [
    "Little interest or pleasure in doing things?",
    "Feeling down, depressed, or hopeless?",
    "Trouble falling or staying asleep, or sleeping too much?",
    "Feeling tired or having little energy?",
    "Poor appetite or overeating?",
    "Feeling bad about yourself — or that you are a failure or have let yourself or your family down?",
    "Trouble concentrating on things, such as reading the newspaper or watching television?",
    "Moving or speaking so slowly that other people could have noticed? Or so fidgety or restless that you have been moving a lot more than usual?",
    "Thoughts that you would be better off dead, or thoughts of hurting yourself in some way?",
];

/// The four answer options shown for every question: display label and the
/// ordinal value it records.
pub const ANSWER_OPTIONS: [(&str, u8); 4] = [
    ("Not at all", 0),
    ("Several days", 1),
    ("More than half the days", 2),
    ("Nearly every day", 3),
];
