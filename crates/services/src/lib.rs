#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod lesson_player;
pub mod quiz_session;
pub mod recorder;
pub mod route_guard;

pub use signlearn_core::Clock;

pub use auth::{AuthService, SessionStore};
pub use error::{AuthError, QuizSessionError};
pub use lesson_player::{LessonHandoff, LessonPlayer, VideoSource};
pub use quiz_session::{AnswerFeedback, QuizOutcome, QuizSession, QuizStep, SeekRequest};
pub use recorder::LearningRecorder;
pub use route_guard::RouteGuard;
