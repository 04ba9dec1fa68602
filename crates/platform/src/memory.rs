use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use signlearn_core::model::{ActivityRecord, AuthUser};

use crate::contract::{
    ActivityLog, IdentityProvider, LessonViewRow, ObjectStore, PlatformError, PrivilegeCheck,
    ProgressStore, QuizResultRow,
};

#[derive(Default)]
struct State {
    session: Option<AuthUser>,
    accounts: Vec<(String, String, AuthUser)>,
    is_admin: bool,
    fail_admin_rpc: bool,
    fail_signing: bool,
    fail_writes: bool,
    activities: Vec<ActivityRecord>,
    lesson_views: Vec<LessonViewRow>,
    quiz_results: Vec<QuizResultRow>,
}

/// In-memory implementation of every platform contract, for tests and
/// prototyping. Failure knobs make the fail-closed and best-effort paths
/// exercisable.
#[derive(Clone, Default)]
pub struct InMemoryPlatform {
    state: Arc<Mutex<State>>,
}

impl InMemoryPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, PlatformError> {
        self.state
            .lock()
            .map_err(|e| PlatformError::Connection(e.to_string()))
    }

    /// Register an account that `sign_in` will accept.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn register_account(&self, email: &str, password: &str, user: AuthUser) {
        let mut state = self.state.lock().expect("platform state lock");
        state.accounts.push((email.to_owned(), password.to_owned(), user));
    }

    /// Pre-establish a session, as if a previous run had signed in.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_session(&self, user: Option<AuthUser>) {
        self.state.lock().expect("platform state lock").session = user;
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_admin(&self, is_admin: bool) {
        self.state.lock().expect("platform state lock").is_admin = is_admin;
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_admin_rpc(&self, fail: bool) {
        self.state.lock().expect("platform state lock").fail_admin_rpc = fail;
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_signing(&self, fail: bool) {
        self.state.lock().expect("platform state lock").fail_signing = fail;
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().expect("platform state lock").fail_writes = fail;
    }

    /// Recorded activity entries, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.state.lock().expect("platform state lock").activities.clone()
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn lesson_views(&self) -> Vec<LessonViewRow> {
        self.state.lock().expect("platform state lock").lesson_views.clone()
    }

    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn quiz_results(&self) -> Vec<QuizResultRow> {
        self.state.lock().expect("platform state lock").quiz_results.clone()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryPlatform {
    async fn current_session(&self) -> Result<Option<AuthUser>, PlatformError> {
        Ok(self.lock()?.session.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, PlatformError> {
        let mut state = self.lock()?;
        let user = state
            .accounts
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| PlatformError::Unauthorized("Invalid login credentials".to_owned()))?;
        state.session = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _metadata: serde_json::Value,
    ) -> Result<AuthUser, PlatformError> {
        let mut state = self.lock()?;
        if state.accounts.iter().any(|(e, _, _)| e == email) {
            return Err(PlatformError::Unauthorized(
                "User already registered".to_owned(),
            ));
        }
        let user = AuthUser::new(signlearn_core::model::UserId::random(), email);
        state
            .accounts
            .push((email.to_owned(), password.to_owned(), user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), PlatformError> {
        let mut state = self.lock()?;
        state.session = None;
        Ok(())
    }
}

#[async_trait]
impl PrivilegeCheck for InMemoryPlatform {
    async fn is_current_user_admin(&self) -> Result<bool, PlatformError> {
        let state = self.lock()?;
        if state.fail_admin_rpc {
            return Err(PlatformError::Connection("rpc unavailable".to_owned()));
        }
        Ok(state.is_admin)
    }
}

#[async_trait]
impl ObjectStore for InMemoryPlatform {
    async fn signed_url(&self, asset: &str, ttl_secs: u32) -> Result<Url, PlatformError> {
        let state = self.lock()?;
        if state.fail_signing {
            return Err(PlatformError::Connection("signing unavailable".to_owned()));
        }
        let raw = format!("https://storage.example.com/sign/{asset}?expires_in={ttl_secs}");
        raw.parse()
            .map_err(|e: url::ParseError| PlatformError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl ActivityLog for InMemoryPlatform {
    async fn record(&self, record: &ActivityRecord) -> Result<(), PlatformError> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(PlatformError::Connection("write rejected".to_owned()));
        }
        state.activities.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for InMemoryPlatform {
    async fn upsert_lesson_view(&self, row: LessonViewRow) -> Result<(), PlatformError> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(PlatformError::Connection("write rejected".to_owned()));
        }
        state
            .lesson_views
            .retain(|existing| !(existing.lesson_id == row.lesson_id && existing.user_id == row.user_id));
        state.lesson_views.push(row);
        Ok(())
    }

    async fn upsert_quiz_result(&self, row: QuizResultRow) -> Result<(), PlatformError> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(PlatformError::Connection("write rejected".to_owned()));
        }
        state
            .quiz_results
            .retain(|existing| !(existing.quiz_id == row.quiz_id && existing.user_id == row.user_id));
        state.quiz_results.push(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signlearn_core::model::UserId;

    fn user() -> AuthUser {
        AuthUser::new(UserId::random(), "learner@example.com")
    }

    #[tokio::test]
    async fn sign_in_rejects_unknown_credentials() {
        let platform = InMemoryPlatform::new();
        let err = platform.sign_in("nobody@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, PlatformError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn sign_in_establishes_session() {
        let platform = InMemoryPlatform::new();
        let account = user();
        platform.register_account("learner@example.com", "pw", account.clone());

        let signed_in = platform.sign_in("learner@example.com", "pw").await.unwrap();
        assert_eq!(signed_in, account);
        assert_eq!(platform.current_session().await.unwrap(), Some(account));

        platform.sign_out().await.unwrap();
        assert_eq!(platform.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn admin_rpc_failure_knob() {
        let platform = InMemoryPlatform::new();
        platform.set_admin(true);
        assert!(platform.is_current_user_admin().await.unwrap());

        platform.fail_admin_rpc(true);
        assert!(platform.is_current_user_admin().await.is_err());
    }

    #[tokio::test]
    async fn signed_url_encodes_asset_and_ttl() {
        let platform = InMemoryPlatform::new();
        let url = platform.signed_url("videos/alphabet-1.mp4", 3_600).await.unwrap();
        assert!(url.as_str().contains("videos/alphabet-1.mp4"));
        assert!(url.as_str().contains("expires_in=3600"));
    }

    #[tokio::test]
    async fn lesson_view_upsert_replaces_existing_row() {
        let platform = InMemoryPlatform::new();
        let account = user();
        let row = LessonViewRow {
            lesson_id: "alphabet-1".into(),
            title: "Letters A-E".to_owned(),
            description: String::new(),
            video_ref: "videos/alphabet-1.mp4".to_owned(),
            user_id: account.id,
        };
        platform.upsert_lesson_view(row.clone()).await.unwrap();
        platform.upsert_lesson_view(row).await.unwrap();
        assert_eq!(platform.lesson_views().len(), 1);
    }
}
