use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::ids::{LessonId, QuestionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz must contain at least one question")]
    NoQuestions,

    #[error("duplicate question id within quiz: {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question must offer at least two options")]
    TooFewOptions,

    #[error("correct answer is not one of the offered options")]
    CorrectAnswerNotInOptions,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// The designated correct answer is always a member of `options`; matching is
/// exact, case-sensitive string equality.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: Option<String>,
    video_timestamp: Option<u32>,
}

impl QuizQuestion {
    /// Creates a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyPrompt`, `QuizError::TooFewOptions`, or
    /// `QuizError::CorrectAnswerNotInOptions` when the content is malformed.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: Option<String>,
        video_timestamp: Option<u32>,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuizError::TooFewOptions);
        }
        let correct_answer = correct_answer.into();
        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuizError::CorrectAnswerNotInOptions);
        }

        Ok(Self {
            id,
            prompt: prompt.trim().to_owned(),
            options,
            correct_answer,
            explanation,
            video_timestamp,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Optional hint position (seconds) into the lesson video.
    #[must_use]
    pub fn video_timestamp(&self) -> Option<u32> {
        self.video_timestamp
    }

    /// Whether the given option is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions associated with exactly one lesson.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    id: QuizId,
    lesson_id: LessonId,
    title: String,
    description: String,
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Creates a new quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list and
    /// `QuizError::DuplicateQuestionId` when question ids collide.
    pub fn new(
        id: QuizId,
        lesson_id: LessonId,
        title: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<QuizQuestion>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id().clone()) {
                return Err(QuizError::DuplicateQuestionId(question.id().clone()));
            }
        }

        Ok(Self {
            id,
            lesson_id,
            title: title.into(),
            description: description.into(),
            questions,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Final score as a percentage of correctly answered questions.
    ///
    /// Division is safe: construction guarantees at least one question.
    #[must_use]
    pub fn score_percent(&self, answers: &HashMap<QuestionId, String>) -> f64 {
        let correct = self
            .questions
            .iter()
            .filter(|question| {
                answers
                    .get(question.id())
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count();

        #[allow(clippy::cast_precision_loss)]
        {
            100.0 * correct as f64 / self.questions.len() as f64
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
