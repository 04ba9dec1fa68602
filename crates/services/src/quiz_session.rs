//! In-progress quiz attempt: answer capture, navigation, and scoring.

use std::collections::HashMap;

use url::Url;

use signlearn_core::model::{QuestionId, Quiz, QuizQuestion};

use crate::error::QuizSessionError;

//
// ─── VIEW TYPES ────────────────────────────────────────────────────────────────
//

/// What the UI renders for the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizStep<'a> {
    /// Zero-based position of the question.
    pub index: usize,
    pub total: usize,
    pub question: &'a QuizQuestion,
    /// The locked-in answer, if the question has been answered.
    pub selected: Option<&'a str>,
    /// Explanations are shown exactly while the question is answered.
    pub show_explanation: bool,
}

/// Transient signal returned when an answer locks in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
}

/// Advisory request to seek the lesson video to a hint position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekRequest {
    pub url: Url,
    pub position_secs: u32,
}

/// Terminal result of a finished attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub score_percent: f64,
    pub correct: usize,
    pub total: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a quiz.
///
/// The first answer to each question is final; revisiting an answered
/// question shows the recorded answer and its explanation but accepts no
/// change. Scoring happens once, when `next` is called on the last question.
pub struct QuizSession {
    quiz: Quiz,
    video_url: Option<Url>,
    index: usize,
    answers: HashMap<QuestionId, String>,
    completed: bool,
}

impl QuizSession {
    /// Starts an attempt at the first question.
    ///
    /// `video_url` is the lesson video carried over from the handoff, used
    /// only for timestamp jumps. Empty quizzes are unrepresentable: `Quiz`
    /// construction already rejects them.
    #[must_use]
    pub fn new(quiz: Quiz, video_url: Option<Url>) -> Self {
        Self {
            quiz,
            video_url,
            index: 0,
            answers: HashMap::new(),
            completed: false,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The current question and its presentation state.
    #[must_use]
    pub fn current(&self) -> QuizStep<'_> {
        let question = &self.quiz.questions()[self.index];
        let selected = self.answers.get(question.id()).map(String::as_str);
        QuizStep {
            index: self.index,
            total: self.quiz.question_count(),
            question,
            selected,
            show_explanation: selected.is_some(),
        }
    }

    /// Share of questions answered so far, in percent.
    #[must_use]
    pub fn answered_percent(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            100.0 * self.answers.len() as f64 / self.quiz.question_count() as f64
        }
    }

    /// Lock in an answer for the current question.
    ///
    /// The first answer wins: calling again (with any option) returns the
    /// feedback for the recorded answer and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` after the attempt has finished.
    pub fn select_answer(&mut self, option: &str) -> Result<AnswerFeedback, QuizSessionError> {
        if self.completed {
            return Err(QuizSessionError::Completed);
        }

        let question = &self.quiz.questions()[self.index];
        let recorded = self
            .answers
            .entry(question.id().clone())
            .or_insert_with(|| option.to_owned());

        Ok(AnswerFeedback {
            correct: question.is_correct(recorded),
            correct_answer: question.correct_answer().to_owned(),
        })
    }

    /// Advance past the current question.
    ///
    /// On the last question this finishes the attempt and returns the
    /// outcome exactly once.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::CurrentUnanswered` when the current
    /// question has no recorded answer, and `QuizSessionError::Completed`
    /// after the attempt has finished.
    pub fn next(&mut self) -> Result<Option<QuizOutcome>, QuizSessionError> {
        if self.completed {
            return Err(QuizSessionError::Completed);
        }
        let question = &self.quiz.questions()[self.index];
        if !self.answers.contains_key(question.id()) {
            return Err(QuizSessionError::CurrentUnanswered);
        }

        if self.index + 1 < self.quiz.question_count() {
            self.index += 1;
            return Ok(None);
        }

        self.completed = true;
        let correct = self
            .quiz
            .questions()
            .iter()
            .filter(|q| {
                self.answers
                    .get(q.id())
                    .is_some_and(|answer| q.is_correct(answer))
            })
            .count();
        Ok(Some(QuizOutcome {
            score_percent: self.quiz.score_percent(&self.answers),
            correct,
            total: self.quiz.question_count(),
        }))
    }

    /// Step back to the previous question. Returns whether a step was taken;
    /// at the first question this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Completed` after the attempt has finished.
    pub fn previous(&mut self) -> Result<bool, QuizSessionError> {
        if self.completed {
            return Err(QuizSessionError::Completed);
        }
        if self.index == 0 {
            return Ok(false);
        }
        self.index -= 1;
        Ok(true)
    }

    /// Advisory seek into the lesson video at the current question's hint
    /// position. `None` unless both a hint and a video URL exist. Never
    /// mutates quiz state.
    #[must_use]
    pub fn jump_to_video_timestamp(&self) -> Option<SeekRequest> {
        let position_secs = self.quiz.questions()[self.index].video_timestamp()?;
        let url = self.video_url.clone()?;
        Some(SeekRequest { url, position_secs })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
