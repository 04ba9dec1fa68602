use tokio::sync::watch;

use signlearn_core::model::{AuthUser, SessionSnapshot, UserId};

/// Single-writer container for the process-wide session state.
///
/// Readers subscribe and receive immutable snapshots; only the auth gateway
/// and its event handler write. `loading` transitions true to false exactly
/// once and there is deliberately no way to flip it back.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Creates a store in the startup state: unknown identity, loading.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::initial());
        Self { tx }
    }

    /// Current snapshot, cloned out so the reader holds no lock.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// A change-notified receiver of snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Replace the session's user. A change of identity (including none to
    /// some) resets the cached admin flag until a fresh check lands.
    pub(crate) fn set_user(&self, user: AuthUser) {
        self.tx.send_modify(|session| {
            if session.user_id() != Some(user.id) {
                session.is_admin = false;
            }
            session.user = Some(user);
        });
    }

    /// Reset to anonymous: no user, no admin privilege.
    pub(crate) fn clear_user(&self) {
        self.tx.send_modify(|session| {
            session.user = None;
            session.is_admin = false;
        });
    }

    /// Cache a privilege-check result, but only if the session still belongs
    /// to the user the check was dispatched for. A check that resolves after
    /// the user changed is stale and dropped.
    pub(crate) fn set_admin_for(&self, dispatched_for: UserId, is_admin: bool) {
        self.tx.send_modify(|session| {
            if session.user_id() == Some(dispatched_for) {
                session.is_admin = is_admin;
            }
        });
    }

    /// Mark startup resolution as finished.
    pub(crate) fn finish_loading(&self) {
        self.tx.send_modify(|session| {
            session.loading = false;
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> AuthUser {
        AuthUser::new(UserId::random(), email)
    }

    #[test]
    fn starts_loading_and_anonymous() {
        let store = SessionStore::new();
        let snapshot = store.snapshot();
        assert!(snapshot.loading);
        assert!(!snapshot.is_authenticated());
    }

    #[test]
    fn loading_never_returns_to_true() {
        let store = SessionStore::new();
        store.finish_loading();
        store.set_user(user("a@example.com"));
        store.clear_user();
        assert!(!store.snapshot().loading);
    }

    #[test]
    fn identity_change_resets_admin_flag() {
        let store = SessionStore::new();
        let first = user("first@example.com");
        store.set_user(first.clone());
        store.set_admin_for(first.id, true);
        assert!(store.snapshot().is_admin);

        store.set_user(user("second@example.com"));
        assert!(!store.snapshot().is_admin);
    }

    #[test]
    fn stale_admin_result_is_dropped() {
        let store = SessionStore::new();
        let first = user("first@example.com");
        let second = user("second@example.com");
        store.set_user(first.clone());
        store.set_user(second.clone());

        // Check dispatched for the first user resolves after the switch.
        store.set_admin_for(first.id, true);
        assert!(!store.snapshot().is_admin);

        store.set_admin_for(second.id, true);
        assert!(store.snapshot().is_admin);
    }

    #[test]
    fn subscribers_observe_updates() {
        let store = SessionStore::new();
        let rx = store.subscribe();
        store.set_user(user("a@example.com"));
        assert!(rx.borrow().is_authenticated());
    }
}
