//! Navigation gatekeeper joining the session store to the route table.

use signlearn_core::route::{evaluate, RouteAccess, RouteDecision, RouteTable};

use crate::auth::AuthService;

/// Decides whether a navigation may proceed, running a fresh admin check when
/// the target route demands one.
#[derive(Clone)]
pub struct RouteGuard {
    auth: AuthService,
    routes: RouteTable,
}

impl RouteGuard {
    #[must_use]
    pub fn new(auth: AuthService, routes: RouteTable) -> Self {
        Self { auth, routes }
    }

    /// Guard over the application's shipped route map.
    #[must_use]
    pub fn with_builtin_routes(auth: AuthService) -> Self {
        Self::new(auth, RouteTable::builtin())
    }

    /// Decide one navigation to `path`.
    ///
    /// Admin-only routes trigger a privilege re-check on every visit; the
    /// cached admin flag in the snapshot is never trusted for them. While the
    /// session is still loading the decision is `Checking` and no check is
    /// dispatched.
    pub async fn decide(&self, path: &str) -> RouteDecision {
        let session = self.auth.snapshot();
        let access = self.routes.resolve(path).access();

        let fresh_admin = if access == RouteAccess::AdminOnly
            && !session.loading
            && session.is_authenticated()
        {
            Some(self.auth.check_admin_status().await)
        } else {
            None
        };

        evaluate(access, &session, fresh_admin, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use platform::InMemoryPlatform;
    use signlearn_core::model::{AuthUser, UserId};
    use signlearn_core::route::RedirectTarget;
    use signlearn_core::time::fixed_clock;

    fn auth(platform: &InMemoryPlatform) -> AuthService {
        let shared = Arc::new(platform.clone());
        AuthService::new(fixed_clock(), shared.clone(), shared.clone(), shared)
    }

    async fn signed_in(platform: &InMemoryPlatform, email: &str) -> AuthService {
        let user = AuthUser::new(UserId::random(), email);
        platform.register_account(email, "pw", user);
        let service = auth(platform);
        service.initialize().await;
        service.sign_in(email, "pw").await.unwrap();
        service
    }

    #[tokio::test]
    async fn loading_session_yields_checking() {
        let platform = InMemoryPlatform::new();
        let guard = RouteGuard::with_builtin_routes(auth(&platform));
        assert_eq!(guard.decide("/lessons").await, RouteDecision::Checking);
    }

    #[tokio::test]
    async fn anonymous_visitor_is_sent_to_sign_in_with_origin() {
        let platform = InMemoryPlatform::new();
        let service = auth(&platform);
        service.initialize().await;
        let guard = RouteGuard::with_builtin_routes(service);

        assert_eq!(
            guard.decide("/lessons/alphabet-1").await,
            RouteDecision::Redirect(RedirectTarget::SignIn {
                from: "/lessons/alphabet-1".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn signed_in_user_admitted_to_lessons_and_bounced_off_sign_in() {
        let platform = InMemoryPlatform::new();
        let service = signed_in(&platform, "learner@example.com").await;
        let guard = RouteGuard::with_builtin_routes(service);

        assert_eq!(guard.decide("/lessons").await, RouteDecision::Admitted);
        assert_eq!(
            guard.decide("/signin").await,
            RouteDecision::Redirect(RedirectTarget::Home)
        );
    }

    #[tokio::test]
    async fn admin_route_rechecks_privilege_every_visit() {
        let platform = InMemoryPlatform::new();
        platform.set_admin(true);
        let service = signed_in(&platform, "admin@example.com").await;
        let guard = RouteGuard::with_builtin_routes(service);

        assert_eq!(guard.decide("/admin").await, RouteDecision::Admitted);

        // Privilege revoked on the platform; the cached flag must not admit.
        platform.set_admin(false);
        assert_eq!(
            guard.decide("/admin").await,
            RouteDecision::Redirect(RedirectTarget::Home)
        );
    }

    #[tokio::test]
    async fn admin_route_fails_closed_when_check_errors() {
        let platform = InMemoryPlatform::new();
        platform.set_admin(true);
        let service = signed_in(&platform, "admin@example.com").await;
        let guard = RouteGuard::with_builtin_routes(service);

        platform.fail_admin_rpc(true);
        assert_eq!(
            guard.decide("/admin").await,
            RouteDecision::Redirect(RedirectTarget::Home)
        );
    }

    #[tokio::test]
    async fn non_admin_routes_never_dispatch_the_rpc() {
        let platform = InMemoryPlatform::new();
        let service = signed_in(&platform, "learner@example.com").await;
        let guard = RouteGuard::with_builtin_routes(service);

        // Would error if the guard consulted the RPC for an ordinary route.
        platform.fail_admin_rpc(true);
        assert_eq!(guard.decide("/dictionary").await, RouteDecision::Admitted);
    }
}
