use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::LessonError;
use crate::model::QuizError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
