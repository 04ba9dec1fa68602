//! Shared error types for the services crate.

use thiserror::Error;

use platform::PlatformError;

/// Errors surfaced to the user by `AuthService`.
///
/// Auth failures never crash the session state machine; the session simply
/// stays anonymous.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Rejected credentials or registration, with a message safe to show.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Platform(PlatformError),
}

impl From<PlatformError> for AuthError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Unauthorized(message) => AuthError::Rejected(message),
            other => AuthError::Platform(other),
        }
    }
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz session already completed")]
    Completed,

    #[error("current question has no recorded answer")]
    CurrentUnanswered,
}
