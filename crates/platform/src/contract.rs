use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use signlearn_core::model::{ActivityRecord, AuthUser, LessonId, QuizId, UserId};

/// Nominal validity window for signed video URLs.
pub const SIGNED_URL_TTL_SECS: u32 = 3_600;

/// Errors surfaced by platform adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    /// Rejected credentials or a missing/expired session. The message is
    /// human-readable and safe to show to the user.
    #[error("{0}")]
    Unauthorized(String),

    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Asynchronous authentication-state event pushed by the identity service.
///
/// The Rust rendition of the subscribe callback: the platform's event source
/// feeds these into the auth gateway as they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
    TokenRefreshed(AuthUser),
    UserUpdated(AuthUser),
}

/// External identity service contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the session established in a previous run, if any.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport failures; an absent session is
    /// `Ok(None)`, not an error.
    async fn current_session(&self) -> Result<Option<AuthUser>, PlatformError>;

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Unauthorized` for rejected credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, PlatformError>;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if registration is rejected.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthUser, PlatformError>;

    /// Invalidate the current session.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on transport failures.
    async fn sign_out(&self) -> Result<(), PlatformError>;
}

/// Remote privilege-check procedure. Callers fail closed on `Err`.
#[async_trait]
pub trait PrivilegeCheck: Send + Sync {
    /// Whether the current session's user holds the admin role.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on RPC failure; callers must treat that as
    /// "not admin".
    async fn is_current_user_admin(&self) -> Result<bool, PlatformError>;
}

/// External object storage issuing time-limited signed URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Exchange a stored asset path for a playable signed URL.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` when signing fails.
    async fn signed_url(&self, asset: &str, ttl_secs: u32) -> Result<Url, PlatformError>;
}

/// Append-only activity log. Fire-and-forget from the caller's perspective:
/// callers log failures and never propagate them to the UI.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Append one activity record.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the write is rejected.
    async fn record(&self, record: &ActivityRecord) -> Result<(), PlatformError>;
}

/// Persisted row for a lesson interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonViewRow {
    pub lesson_id: LessonId,
    pub title: String,
    pub description: String,
    pub video_ref: String,
    pub user_id: UserId,
}

/// Persisted row for a completed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResultRow {
    pub quiz_id: QuizId,
    pub lesson_id: LessonId,
    pub user_id: UserId,
    pub score: f64,
    pub completed_at: DateTime<Utc>,
}

/// Best-effort lesson/quiz result persistence.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Upsert a lesson-interaction record.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the upsert is rejected.
    async fn upsert_lesson_view(&self, row: LessonViewRow) -> Result<(), PlatformError>;

    /// Upsert a quiz result.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the upsert is rejected.
    async fn upsert_quiz_result(&self, row: QuizResultRow) -> Result<(), PlatformError>;
}
