// Answer state machine for a single screening session.
//
// The engine owns the nine answer slots and the position of the question
// being displayed. Answers are recorded only through `record_answer`, which
// validates at the boundary; the total score is always derived from the
// slots, never stored.

use thiserror::Error;

use super::severity::SeverityClass;
use super::{MAX_ANSWER_VALUE, QUESTION_COUNT};

/// Invalid input rejected at the engine boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreeningError {
    /// The question index is outside the nine-question range.
    #[error("question index {0} is out of range for a nine-question screening")]
    InvalidQuestion(usize),
    /// The answer value is outside the 0..=3 option domain.
    #[error("answer value {0} is not one of the answer options (0..=3)")]
    InvalidValue(u8),
    /// The screening already completed; answers are frozen until a restart.
    #[error("the screening is already complete; restart to answer again")]
    AlreadyComplete,
}

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningPhase {
    /// Questions are still being answered; navigation is allowed.
    InProgress,
    /// All nine questions were submitted; answers are frozen.
    Complete,
}

/// What a successful `record_answer` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was recorded and the next question is now displayed.
    Advanced,
    /// The final question was answered; the screening is complete and the
    /// score and severity were computed from the full answer sequence.
    Completed { score: u8, severity: SeverityClass },
}

/// A single PHQ-9 screening session.
#[derive(Debug, Clone)]
pub struct Screening {
    /// One slot per question; `None` until the respondent picks an option.
    answers: [Option<u8>; QUESTION_COUNT],
    /// Index of the question currently displayed.
    current: usize,
    phase: ScreeningPhase,
}

impl Default for Screening {
    fn default() -> Self {
        Self::new()
    }
}

impl Screening {
    /// Fresh session: all answers cleared, first question displayed.
    pub fn new() -> Self {
        Screening {
            answers: [None; QUESTION_COUNT],
            current: 0,
            phase: ScreeningPhase::InProgress,
        }
    }

    /// Record an answer for a question.
    ///
    /// Rejects the call when the screening is already complete, when the
    /// index is out of range, or when the value is not one of the four
    /// options. On success the display position moves past the answered
    /// question; answering the final question completes the screening
    /// exactly once.
    pub fn record_answer(
        &mut self,
        question_index: usize,
        value: u8,
    ) -> Result<AnswerOutcome, ScreeningError> {
        if self.phase == ScreeningPhase::Complete {
            return Err(ScreeningError::AlreadyComplete);
        }
        if question_index >= QUESTION_COUNT {
            return Err(ScreeningError::InvalidQuestion(question_index));
        }
        if value > MAX_ANSWER_VALUE {
            return Err(ScreeningError::InvalidValue(value));
        }

        self.answers[question_index] = Some(value);

        if question_index == QUESTION_COUNT - 1 {
            self.phase = ScreeningPhase::Complete;
            Ok(AnswerOutcome::Completed {
                score: self.score(),
                severity: self.severity(),
            })
        } else {
            self.current = question_index + 1;
            Ok(AnswerOutcome::Advanced)
        }
    }

    /// Re-initialize to a fresh session. A distinct operation, not a state
    /// transition; callable from any phase.
    pub fn restart(&mut self) {
        *self = Screening::new();
    }

    /// Move back to the previous question. No-op at the first question;
    /// rejected once the screening is complete.
    pub fn go_back(&mut self) -> Result<(), ScreeningError> {
        if self.phase == ScreeningPhase::Complete {
            return Err(ScreeningError::AlreadyComplete);
        }
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Move forward to the next question, but only across questions that
    /// were already answered; never skips ahead of the first unanswered
    /// question. Rejected once the screening is complete.
    pub fn go_forward(&mut self) -> Result<(), ScreeningError> {
        if self.phase == ScreeningPhase::Complete {
            return Err(ScreeningError::AlreadyComplete);
        }
        if self.answers[self.current].is_some() && self.current + 1 < QUESTION_COUNT {
            self.current += 1;
        }
        Ok(())
    }

    /// Total score: the sum of the recorded answers. Unanswered slots
    /// contribute zero, so the value always equals the sum of the current
    /// answer sequence.
    pub fn score(&self) -> u8 {
        self.answers.iter().flatten().sum()
    }

    /// Severity band of the current total score.
    pub fn severity(&self) -> SeverityClass {
        SeverityClass::from_score(self.score())
    }

    /// How many of the nine questions have an answer recorded.
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Percentage shown by the progress gauge. Based on the index of the
    /// question currently displayed rather than on `answered_count`, so the
    /// final question reads 88 until it is submitted; completion reads 100.
    /// This mirrors the shipped product behavior.
    pub fn progress_percent(&self) -> u8 {
        match self.phase {
            ScreeningPhase::Complete => 100,
            ScreeningPhase::InProgress => (self.current * 100 / QUESTION_COUNT) as u8,
        }
    }

    /// Index of the question currently displayed.
    pub fn current_question(&self) -> usize {
        self.current
    }

    /// The recorded answer for a question, if any. Out-of-range indices
    /// read as unanswered.
    pub fn answer(&self, question_index: usize) -> Option<u8> {
        self.answers.get(question_index).copied().flatten()
    }

    /// All nine answer slots in question order.
    pub fn answers(&self) -> &[Option<u8>; QUESTION_COUNT] {
        &self.answers
    }

    pub fn phase(&self) -> ScreeningPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ScreeningPhase::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answer every question with the same value and return the engine.
    fn completed_with(value: u8) -> Screening {
        let mut s = Screening::new();
        for i in 0..QUESTION_COUNT {
            s.record_answer(i, value).unwrap();
        }
        s
    }

    // --- Construction ---

    #[test]
    fn fresh_session_starts_at_question_zero() {
        let s = Screening::new();
        assert_eq!(s.current_question(), 0);
        assert_eq!(s.phase(), ScreeningPhase::InProgress);
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.score(), 0);
        assert!(s.answers().iter().all(|a| a.is_none()));
    }

    // --- Recording answers ---

    #[test]
    fn recording_advances_to_the_next_question() {
        let mut s = Screening::new();
        let outcome = s.record_answer(0, 2).unwrap();
        assert_eq!(outcome, AnswerOutcome::Advanced);
        assert_eq!(s.current_question(), 1);
        assert_eq!(s.answer(0), Some(2));
        assert_eq!(s.answered_count(), 1);
    }

    #[test]
    fn final_answer_completes_the_screening() {
        let mut s = Screening::new();
        for i in 0..QUESTION_COUNT - 1 {
            assert_eq!(s.record_answer(i, 1).unwrap(), AnswerOutcome::Advanced);
        }
        let outcome = s.record_answer(QUESTION_COUNT - 1, 1).unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome::Completed {
                score: 9,
                severity: SeverityClass::Moderate
            }
        );
        assert!(s.is_complete());
    }

    #[test]
    fn completion_happens_exactly_once() {
        let mut s = completed_with(1);
        // Any further recording before a restart is rejected.
        assert_eq!(s.record_answer(0, 2), Err(ScreeningError::AlreadyComplete));
        assert_eq!(
            s.record_answer(QUESTION_COUNT - 1, 3),
            Err(ScreeningError::AlreadyComplete)
        );
        // The frozen answers are untouched by the rejected calls.
        assert_eq!(s.answer(0), Some(1));
        assert_eq!(s.score(), 9);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut s = Screening::new();
        assert_eq!(
            s.record_answer(QUESTION_COUNT, 1),
            Err(ScreeningError::InvalidQuestion(QUESTION_COUNT))
        );
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.current_question(), 0);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let mut s = Screening::new();
        assert_eq!(s.record_answer(0, 4), Err(ScreeningError::InvalidValue(4)));
        assert_eq!(s.record_answer(0, 255), Err(ScreeningError::InvalidValue(255)));
        assert_eq!(s.answer(0), None);
    }

    #[test]
    fn re_answering_an_earlier_question_overwrites_and_advances() {
        let mut s = Screening::new();
        s.record_answer(0, 3).unwrap();
        s.record_answer(1, 3).unwrap();
        s.record_answer(2, 3).unwrap();
        s.go_back().unwrap();
        s.go_back().unwrap();
        assert_eq!(s.current_question(), 1);

        // Picking a different option replaces the old answer and moves on.
        s.record_answer(1, 0).unwrap();
        assert_eq!(s.answer(1), Some(0));
        assert_eq!(s.current_question(), 2);
        assert_eq!(s.score(), 6);
    }

    // --- Score derivation ---

    #[test]
    fn score_is_the_sum_of_answers() {
        let mut s = Screening::new();
        let values = [3, 0, 2, 1, 3, 0, 1, 2, 3];
        for (i, v) in values.into_iter().enumerate() {
            s.record_answer(i, v).unwrap();
        }
        assert_eq!(s.score(), values.iter().sum::<u8>());
        assert!(s.score() <= 27);
    }

    #[test]
    fn all_threes_scores_twenty_seven_high() {
        let s = completed_with(3);
        assert_eq!(s.score(), 27);
        assert_eq!(s.severity(), SeverityClass::High);
    }

    #[test]
    fn all_zeros_scores_zero_low() {
        let s = completed_with(0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.severity(), SeverityClass::Low);
    }

    #[test]
    fn all_ones_scores_nine_moderate() {
        let s = completed_with(1);
        assert_eq!(s.score(), 9);
        assert_eq!(s.severity(), SeverityClass::Moderate);
    }

    #[test]
    fn unanswered_slots_contribute_zero() {
        let mut s = Screening::new();
        s.record_answer(0, 3).unwrap();
        s.record_answer(4, 2).unwrap();
        assert_eq!(s.score(), 5);
        assert_eq!(s.severity(), SeverityClass::Moderate);
    }

    // --- Navigation ---

    #[test]
    fn back_at_question_zero_is_a_noop() {
        let mut s = Screening::new();
        s.go_back().unwrap();
        assert_eq!(s.current_question(), 0);
    }

    #[test]
    fn back_returns_to_the_previous_question() {
        let mut s = Screening::new();
        s.record_answer(0, 1).unwrap();
        s.record_answer(1, 1).unwrap();
        assert_eq!(s.current_question(), 2);
        s.go_back().unwrap();
        assert_eq!(s.current_question(), 1);
    }

    #[test]
    fn forward_moves_only_across_answered_questions() {
        let mut s = Screening::new();
        s.record_answer(0, 1).unwrap();
        s.record_answer(1, 1).unwrap();
        s.go_back().unwrap();
        s.go_back().unwrap();
        assert_eq!(s.current_question(), 0);

        s.go_forward().unwrap();
        s.go_forward().unwrap();
        assert_eq!(s.current_question(), 2);

        // Question 2 is unanswered, so forward stops here.
        s.go_forward().unwrap();
        assert_eq!(s.current_question(), 2);
    }

    #[test]
    fn navigation_is_rejected_after_completion() {
        let mut s = completed_with(2);
        assert_eq!(s.go_back(), Err(ScreeningError::AlreadyComplete));
        assert_eq!(s.go_forward(), Err(ScreeningError::AlreadyComplete));
    }

    #[test]
    fn navigation_does_not_change_the_score() {
        let mut s = Screening::new();
        s.record_answer(0, 3).unwrap();
        s.record_answer(1, 2).unwrap();
        let before = s.score();
        s.go_back().unwrap();
        s.go_back().unwrap();
        s.go_forward().unwrap();
        assert_eq!(s.score(), before);
        assert_eq!(s.severity(), SeverityClass::from_score(before));
    }

    // --- Restart ---

    #[test]
    fn restart_clears_a_completed_screening() {
        let mut s = completed_with(3);
        s.restart();
        assert_eq!(s.phase(), ScreeningPhase::InProgress);
        assert_eq!(s.current_question(), 0);
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn restart_clears_a_session_in_progress() {
        let mut s = Screening::new();
        s.record_answer(0, 2).unwrap();
        s.record_answer(1, 2).unwrap();
        s.restart();
        assert_eq!(s.answered_count(), 0);
        assert_eq!(s.current_question(), 0);
    }

    #[test]
    fn restart_allows_answering_again() {
        let mut s = completed_with(0);
        s.restart();
        assert_eq!(s.record_answer(0, 1).unwrap(), AnswerOutcome::Advanced);
    }

    // --- Progress reporting ---

    #[test]
    fn progress_tracks_the_displayed_question() {
        let mut s = Screening::new();
        assert_eq!(s.progress_percent(), 0);
        s.record_answer(0, 1).unwrap();
        assert_eq!(s.progress_percent(), 11);
        for i in 1..QUESTION_COUNT - 1 {
            s.record_answer(i, 1).unwrap();
        }
        // Eight answers given, but the gauge reads the displayed index.
        assert_eq!(s.answered_count(), 8);
        assert_eq!(s.progress_percent(), 88);
        s.record_answer(QUESTION_COUNT - 1, 1).unwrap();
        assert_eq!(s.progress_percent(), 100);
    }

    #[test]
    fn answered_count_tracks_answers_not_position() {
        let mut s = Screening::new();
        s.record_answer(0, 1).unwrap();
        s.record_answer(1, 1).unwrap();
        s.go_back().unwrap();
        s.go_back().unwrap();
        assert_eq!(s.current_question(), 0);
        assert_eq!(s.answered_count(), 2);
    }
}
