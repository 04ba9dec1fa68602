use std::sync::Arc;

use serde_json::json;
use tokio::sync::watch;
use tracing::warn;

use platform::{ActivityLog, AuthEvent, IdentityProvider, PrivilegeCheck};
use signlearn_core::model::{ActivityKind, ActivityRecord, AuthUser, SessionSnapshot, UserId};
use signlearn_core::route::RedirectTarget;
use signlearn_core::Clock;

use crate::auth::store::SessionStore;
use crate::error::AuthError;

/// Gateway over the external identity service, and the single writer of the
/// session store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<SessionStore>,
    identity: Arc<dyn IdentityProvider>,
    privilege: Arc<dyn PrivilegeCheck>,
    activity: Arc<dyn ActivityLog>,
    clock: Clock,
}

impl AuthService {
    #[must_use]
    pub fn new(
        clock: Clock,
        identity: Arc<dyn IdentityProvider>,
        privilege: Arc<dyn PrivilegeCheck>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            identity,
            privilege,
            activity,
            clock,
        }
    }

    /// Current session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot()
    }

    /// Change-notified receiver of session snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.store.subscribe()
    }

    /// Resolve any session left over from a previous run, then settle the
    /// store's loading flag. Failures leave the session anonymous; startup
    /// never propagates an error.
    pub async fn initialize(&self) {
        match self.identity.current_session().await {
            Ok(Some(user)) => {
                self.store.set_user(user);
                self.check_admin_status().await;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "failed to restore session; starting anonymous");
            }
        }
        self.store.finish_loading();
    }

    /// Apply a pushed authentication-state change.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(user) => {
                self.store.set_user(user.clone());
                self.check_admin_status().await;
                self.record_activity(
                    ActivityKind::UserLogin,
                    json!({
                        "email": user.email,
                        "timestamp": self.clock.now().to_rfc3339(),
                    }),
                    user.id,
                )
                .await;
            }
            AuthEvent::SignedOut => {
                self.store.clear_user();
            }
            AuthEvent::TokenRefreshed(user) | AuthEvent::UserUpdated(user) => {
                self.store.set_user(user);
            }
        }
        self.store.finish_loading();
    }

    /// Fresh privilege check against the remote procedure.
    ///
    /// Fails closed: any RPC error is logged and answered as `false`. The
    /// result is cached into the snapshot only while the session still
    /// belongs to the user the check was dispatched for.
    pub async fn check_admin_status(&self) -> bool {
        let Some(dispatched_for) = self.store.snapshot().user_id() else {
            return false;
        };

        match self.privilege.is_current_user_admin().await {
            Ok(is_admin) => {
                self.store.set_admin_for(dispatched_for, is_admin);
                is_admin
            }
            Err(error) => {
                warn!(%error, "admin status check failed; treating as non-admin");
                false
            }
        }
    }

    /// Sign in with credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with a human-readable message for bad
    /// credentials; the session stays anonymous on any failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.identity.sign_in(email, password).await?;
        self.store.set_user(user.clone());
        self.check_admin_status().await;
        Ok(user)
    }

    /// Register a new account.
    ///
    /// The session is not established here; the identity service pushes a
    /// `SignedIn` event once the account is confirmed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when registration is refused.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthUser, AuthError> {
        let user = self.identity.sign_up(email, password, metadata).await?;
        Ok(user)
    }

    /// Sign out the current user and reset the session to anonymous.
    ///
    /// Returns the view the caller should navigate to. The logout activity
    /// record and the remote sign-out are best-effort: a failing platform
    /// never leaves the local session signed in.
    pub async fn sign_out(&self) -> RedirectTarget {
        if let Some(user) = self.store.snapshot().user {
            self.record_activity(
                ActivityKind::UserLogout,
                json!({
                    "email": user.email,
                    "timestamp": self.clock.now().to_rfc3339(),
                }),
                user.id,
            )
            .await;
        }

        if let Err(error) = self.identity.sign_out().await {
            warn!(%error, "remote sign-out failed; clearing local session anyway");
        }
        self.store.clear_user();

        RedirectTarget::SignIn {
            from: "/".to_owned(),
        }
    }

    async fn record_activity(&self, kind: ActivityKind, details: serde_json::Value, user_id: UserId) {
        let record = ActivityRecord::new(kind, details, user_id, self.clock.now());
        if let Err(error) = self.activity.record(&record).await {
            warn!(%error, activity = %kind, "failed to record activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::InMemoryPlatform;
    use signlearn_core::time::fixed_clock;

    fn service(platform: &InMemoryPlatform) -> AuthService {
        let shared = Arc::new(platform.clone());
        AuthService::new(
            fixed_clock(),
            shared.clone(),
            shared.clone(),
            shared,
        )
    }

    fn account(platform: &InMemoryPlatform, email: &str, password: &str) -> AuthUser {
        let user = AuthUser::new(UserId::random(), email);
        platform.register_account(email, password, user.clone());
        user
    }

    #[tokio::test]
    async fn initialize_without_session_settles_anonymous() {
        let platform = InMemoryPlatform::new();
        let auth = service(&platform);

        assert!(auth.snapshot().loading);
        auth.initialize().await;

        let snapshot = auth.snapshot();
        assert!(!snapshot.loading);
        assert!(!snapshot.is_authenticated());
    }

    #[tokio::test]
    async fn initialize_restores_existing_session_and_admin_flag() {
        let platform = InMemoryPlatform::new();
        let user = AuthUser::new(UserId::random(), "admin@example.com");
        platform.set_session(Some(user.clone()));
        platform.set_admin(true);

        let auth = service(&platform);
        auth.initialize().await;

        let snapshot = auth.snapshot();
        assert_eq!(snapshot.user, Some(user));
        assert!(snapshot.is_admin);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn sign_in_failure_keeps_session_anonymous() {
        let platform = InMemoryPlatform::new();
        let auth = service(&platform);
        auth.initialize().await;

        let err = auth.sign_in("nobody@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert!(!auth.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn sign_in_success_runs_admin_check() {
        let platform = InMemoryPlatform::new();
        account(&platform, "admin@example.com", "pw");
        platform.set_admin(true);

        let auth = service(&platform);
        auth.initialize().await;
        auth.sign_in("admin@example.com", "pw").await.unwrap();

        let snapshot = auth.snapshot();
        assert!(snapshot.is_authenticated());
        assert!(snapshot.is_admin);
    }

    #[tokio::test]
    async fn sign_up_leaves_session_anonymous_until_signed_in_event() {
        let platform = InMemoryPlatform::new();
        let auth = service(&platform);
        auth.initialize().await;

        let user = auth
            .sign_up(
                "new@example.com",
                "pw",
                serde_json::json!({ "full_name": "New Learner" }),
            )
            .await
            .unwrap();
        assert_eq!(user.email, "new@example.com");

        // Registration alone establishes nothing locally.
        assert!(!auth.snapshot().is_authenticated());

        // The platform pushes the sign-in once the account is confirmed.
        auth.handle_auth_event(AuthEvent::SignedIn(user.clone())).await;
        assert_eq!(auth.snapshot().user, Some(user));
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let platform = InMemoryPlatform::new();
        account(&platform, "taken@example.com", "pw");
        let auth = service(&platform);
        auth.initialize().await;

        let err = auth
            .sign_up("taken@example.com", "other-pw", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert!(!auth.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn signed_in_event_records_login_activity() {
        let platform = InMemoryPlatform::new();
        let auth = service(&platform);
        auth.initialize().await;

        let user = AuthUser::new(UserId::random(), "learner@example.com");
        auth.handle_auth_event(AuthEvent::SignedIn(user.clone())).await;

        let activities = platform.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].kind, ActivityKind::UserLogin);
        assert_eq!(activities[0].details["email"], "learner@example.com");
        assert_eq!(activities[0].user_id, user.id);
    }

    #[tokio::test]
    async fn sign_out_resets_admin_and_records_logout() {
        let platform = InMemoryPlatform::new();
        account(&platform, "admin@example.com", "pw");
        platform.set_admin(true);

        let auth = service(&platform);
        auth.initialize().await;
        auth.sign_in("admin@example.com", "pw").await.unwrap();
        assert!(auth.snapshot().is_admin);

        let target = auth.sign_out().await;
        assert!(matches!(target, RedirectTarget::SignIn { .. }));

        let snapshot = auth.snapshot();
        assert!(!snapshot.is_authenticated());
        assert!(!snapshot.is_admin);

        let kinds: Vec<_> = platform.activities().iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&ActivityKind::UserLogout));
    }

    #[tokio::test]
    async fn sign_out_clears_session_even_when_platform_fails() {
        let platform = InMemoryPlatform::new();
        account(&platform, "learner@example.com", "pw");
        let auth = service(&platform);
        auth.initialize().await;
        auth.sign_in("learner@example.com", "pw").await.unwrap();

        platform.fail_writes(true);
        auth.sign_out().await;
        assert!(!auth.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn admin_check_fails_closed_on_rpc_error() {
        let platform = InMemoryPlatform::new();
        account(&platform, "admin@example.com", "pw");
        platform.set_admin(true);

        let auth = service(&platform);
        auth.initialize().await;
        auth.sign_in("admin@example.com", "pw").await.unwrap();

        platform.fail_admin_rpc(true);
        assert!(!auth.check_admin_status().await);
    }

    #[tokio::test]
    async fn admin_check_without_user_is_false_without_rpc() {
        let platform = InMemoryPlatform::new();
        let auth = service(&platform);
        auth.initialize().await;
        assert!(!auth.check_admin_status().await);
    }

    #[tokio::test]
    async fn token_refresh_keeps_admin_flag_for_same_user() {
        let platform = InMemoryPlatform::new();
        let user = account(&platform, "admin@example.com", "pw");
        platform.set_admin(true);

        let auth = service(&platform);
        auth.initialize().await;
        auth.sign_in("admin@example.com", "pw").await.unwrap();
        assert!(auth.snapshot().is_admin);

        auth.handle_auth_event(AuthEvent::TokenRefreshed(user)).await;
        assert!(auth.snapshot().is_admin);
    }
}
