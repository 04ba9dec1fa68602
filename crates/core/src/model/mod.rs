mod activity;
mod dictionary;
mod ids;
mod lesson;
mod quiz;
mod session;

pub use activity::{ActivityKind, ActivityRecord};
pub use dictionary::{search as search_dictionary, DictionaryEntry, SignCategory};
pub use ids::{LessonId, ParseUserIdError, QuestionId, QuizId, UserId};
pub use lesson::{Lesson, LessonError, LessonTrack, VideoRef};
pub use quiz::{Quiz, QuizError, QuizQuestion};
pub use session::{AuthUser, SessionSnapshot};
