use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{
    DictionaryEntry, Lesson, LessonId, LessonTrack, Quiz, QuizId, QuizQuestion, QuestionId,
    SignCategory, VideoRef,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Configuration errors in static content, reported distinctly from
/// runtime/network failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate lesson id: {0}")]
    DuplicateLessonId(LessonId),

    #[error("duplicate quiz id: {0}")]
    DuplicateQuizId(QuizId),

    #[error("quiz {quiz} references unknown lesson {lesson}")]
    DanglingLessonRef { quiz: QuizId, lesson: LessonId },

    #[error("lesson {0} has more than one quiz")]
    DuplicateQuizForLesson(LessonId),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The static content catalog: lessons, their quizzes, and the dictionary.
///
/// Construction validates the lesson↔quiz references so the engines never see
/// a dangling association at runtime.
#[derive(Debug, Clone)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    quizzes: Vec<Quiz>,
    dictionary: Vec<DictionaryEntry>,
    quiz_by_lesson: HashMap<LessonId, usize>,
}

impl Catalog {
    /// Creates a catalog from content lists.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for duplicate ids, a quiz whose `lesson_id`
    /// resolves to no lesson, or a lesson with more than one quiz.
    pub fn new(
        lessons: Vec<Lesson>,
        quizzes: Vec<Quiz>,
        dictionary: Vec<DictionaryEntry>,
    ) -> Result<Self, CatalogError> {
        let mut lesson_ids = HashSet::with_capacity(lessons.len());
        for lesson in &lessons {
            if !lesson_ids.insert(lesson.id().clone()) {
                return Err(CatalogError::DuplicateLessonId(lesson.id().clone()));
            }
        }

        let mut quiz_ids = HashSet::with_capacity(quizzes.len());
        let mut quiz_by_lesson = HashMap::with_capacity(quizzes.len());
        for (index, quiz) in quizzes.iter().enumerate() {
            if !quiz_ids.insert(quiz.id().clone()) {
                return Err(CatalogError::DuplicateQuizId(quiz.id().clone()));
            }
            if !lesson_ids.contains(quiz.lesson_id()) {
                return Err(CatalogError::DanglingLessonRef {
                    quiz: quiz.id().clone(),
                    lesson: quiz.lesson_id().clone(),
                });
            }
            if quiz_by_lesson.insert(quiz.lesson_id().clone(), index).is_some() {
                return Err(CatalogError::DuplicateQuizForLesson(quiz.lesson_id().clone()));
            }
        }

        Ok(Self {
            lessons,
            quizzes,
            dictionary,
            quiz_by_lesson,
        })
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    #[must_use]
    pub fn dictionary(&self) -> &[DictionaryEntry] {
        &self.dictionary
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    #[must_use]
    pub fn quiz(&self, id: &QuizId) -> Option<&Quiz> {
        self.quizzes.iter().find(|quiz| quiz.id() == id)
    }

    /// The single quiz associated with a lesson, if one exists.
    ///
    /// Absence is not an error: most lessons ship without a quiz.
    #[must_use]
    pub fn quiz_for_lesson(&self, lesson_id: &LessonId) -> Option<&Quiz> {
        self.quiz_by_lesson
            .get(lesson_id)
            .map(|&index| &self.quizzes[index])
    }

    /// Lessons belonging to one track, in catalog order.
    #[must_use]
    pub fn lessons_in(&self, track: LessonTrack) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|lesson| lesson.track() == track)
            .collect()
    }

    /// The content set the application ships with.
    ///
    /// # Panics
    ///
    /// Panics only if the built-in content is internally inconsistent, which
    /// is covered by tests.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_lessons(), builtin_quizzes(), builtin_dictionary())
            .expect("built-in catalog should be valid")
    }
}

//
// ─── BUILT-IN CONTENT ──────────────────────────────────────────────────────────
//

fn lesson(id: &str, track: LessonTrack, title: &str, description: &str, asset: &str) -> Lesson {
    let video = VideoRef::asset(asset).expect("built-in asset ref is non-empty");
    Lesson::new(LessonId::new(id), track, title, description, video)
        .expect("built-in lesson is valid")
}

fn builtin_lessons() -> Vec<Lesson> {
    use LessonTrack::{Alphabet, Numbers, Phrases};

    vec![
        lesson(
            "alphabet-1",
            Alphabet,
            "Letters A-E",
            "Learn the basic hand signs for letters A through E",
            "videos/alphabet-1.mp4",
        ),
        lesson(
            "alphabet-2",
            Alphabet,
            "Letters F-J",
            "Master the hand signs for letters F through J",
            "videos/alphabet-2.mp4",
        ),
        lesson(
            "alphabet-3",
            Alphabet,
            "Letters K-O",
            "Practice signing letters K through O",
            "videos/alphabet-3.mp4",
        ),
        lesson(
            "alphabet-4",
            Alphabet,
            "Letters P-T",
            "Learn to sign letters P through T",
            "videos/alphabet-4.mp4",
        ),
        lesson(
            "alphabet-5",
            Alphabet,
            "Letters U-Z",
            "Complete the alphabet with letters U through Z",
            "videos/alphabet-5.mp4",
        ),
        lesson(
            "numbers-1",
            Numbers,
            "Numbers 1-20",
            "Learn to sign basic numbers from 1 to 20",
            "videos/numbers-1.mp4",
        ),
        lesson(
            "numbers-2",
            Numbers,
            "Numbers 21-50",
            "Practice signing numbers from 21 to 50",
            "videos/numbers-2.mp4",
        ),
        lesson(
            "numbers-3",
            Numbers,
            "Numbers 51-100",
            "Master signing numbers from 51 to 100",
            "videos/numbers-3.mp4",
        ),
        lesson(
            "phrases-1",
            Phrases,
            "Greetings",
            "Learn basic greetings and introductions",
            "videos/phrases-1.mp4",
        ),
        lesson(
            "phrases-2",
            Phrases,
            "Common Questions",
            "Master frequently asked questions in sign language",
            "videos/phrases-2.mp4",
        ),
        lesson(
            "phrases-3",
            Phrases,
            "Daily Conversations",
            "Practice everyday conversational phrases",
            "videos/phrases-3.mp4",
        ),
        lesson(
            "phrases-4",
            Phrases,
            "Emergency Phrases",
            "Important phrases for emergency situations",
            "videos/phrases-4.mp4",
        ),
    ]
}

fn builtin_quizzes() -> Vec<Quiz> {
    let q1 = QuizQuestion::new(
        QuestionId::new("q1"),
        "What is the correct hand position for the letter 'A'?",
        vec![
            "Closed fist with thumb alongside".into(),
            "Open palm".into(),
            "Peace sign".into(),
            "Thumbs up".into(),
        ],
        "Closed fist with thumb alongside",
        Some(
            "The letter 'A' is signed by making a fist with your thumb alongside, \
             not wrapped around your fingers."
                .into(),
        ),
        Some(15),
    )
    .expect("built-in question is valid");

    let q2 = QuizQuestion::new(
        QuestionId::new("q2"),
        "Which finger is extended for the letter 'D'?",
        vec![
            "Index finger".into(),
            "Middle finger".into(),
            "Ring finger".into(),
            "Pinky finger".into(),
        ],
        "Index finger",
        Some(
            "The letter 'D' is signed by extending your index finger straight up \
             while keeping other fingers curved."
                .into(),
        ),
        Some(45),
    )
    .expect("built-in question is valid");

    vec![Quiz::new(
        QuizId::new("alphabet-1-quiz"),
        LessonId::new("alphabet-1"),
        "Letters A-E Quiz",
        "Test your knowledge of the first five letters of the sign language alphabet",
        vec![q1, q2],
    )
    .expect("built-in quiz is valid")]
}

fn entry(id: &str, word: &str, category: SignCategory, description: &str, asset: &str) -> DictionaryEntry {
    DictionaryEntry {
        id: id.to_owned(),
        word: word.to_owned(),
        category,
        description: description.to_owned(),
        video: VideoRef::asset(asset).expect("built-in asset ref is non-empty"),
    }
}

fn builtin_dictionary() -> Vec<DictionaryEntry> {
    use SignCategory::{Alphabet, CommonPhrase, Number};

    vec![
        entry(
            "alphabet-a",
            "A",
            Alphabet,
            "The letter A in sign language is formed by making a closed fist with \
             your thumb on the side of your index finger.",
            "videos/alphabet-1.mp4",
        ),
        entry(
            "alphabet-b",
            "B",
            Alphabet,
            "The letter B is formed by holding your palm forward with fingers \
             pointing up and thumb folded across the palm.",
            "videos/alphabet-1.mp4",
        ),
        entry(
            "alphabet-c",
            "C",
            Alphabet,
            "The letter C is formed by curving your fingers and thumb to form a C shape.",
            "videos/alphabet-1.mp4",
        ),
        entry(
            "number-1",
            "1",
            Number,
            "The number 1 is signed by extending your index finger upward while \
             keeping other fingers closed.",
            "videos/numbers-1.mp4",
        ),
        entry(
            "number-2",
            "2",
            Number,
            "The number 2 is signed by extending your index and middle fingers \
             while keeping other fingers closed.",
            "videos/numbers-1.mp4",
        ),
        entry(
            "number-3",
            "3",
            Number,
            "The number 3 is signed by extending your thumb, index, and middle fingers.",
            "videos/numbers-1.mp4",
        ),
        entry(
            "phrase-hello",
            "Hello",
            CommonPhrase,
            "To sign 'hello', place your hand near your forehead with palm facing \
             out, then move it outward and down.",
            "videos/phrases-1.mp4",
        ),
        entry(
            "phrase-thank-you",
            "Thank You",
            CommonPhrase,
            "To sign 'thank you', touch your lips with your fingertips, then move \
             your hand forward and down.",
            "videos/phrases-1.mp4",
        ),
        entry(
            "phrase-please",
            "Please",
            CommonPhrase,
            "To sign 'please', rub your palm in a circular motion on your chest.",
            "videos/phrases-1.mp4",
        ),
    ]
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
