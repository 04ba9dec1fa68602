use crate::model::SessionSnapshot;

//
// ─── POLICY ────────────────────────────────────────────────────────────────────
//

/// Declared access requirement for a navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAccess {
    /// Anyone may render the view.
    Public,
    /// Anyone anonymous; an authenticated user is bounced home
    /// (sign-in and sign-up pages).
    PublicOnlyWhenAnonymous,
    /// Requires a signed-in user.
    Authenticated,
    /// Requires a signed-in user with a fresh positive admin check.
    AdminOnly,
}

/// A declared route: path pattern plus its access level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    path: String,
    access: RouteAccess,
}

impl RoutePolicy {
    #[must_use]
    pub fn new(path: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            path: path.into(),
            access,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn access(&self) -> RouteAccess {
        self.access
    }
}

/// Declared routes with a fallback for unmatched paths.
///
/// Unmatched paths fall back to an authenticated not-found view, so a typo in
/// a URL never leaks a protected surface to anonymous visitors.
#[derive(Debug, Clone)]
pub struct RouteTable {
    policies: Vec<RoutePolicy>,
    fallback: RouteAccess,
}

impl RouteTable {
    #[must_use]
    pub fn new(policies: Vec<RoutePolicy>) -> Self {
        Self {
            policies,
            fallback: RouteAccess::Authenticated,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: RouteAccess) -> Self {
        self.fallback = fallback;
        self
    }

    /// The application's route map, as shipped.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            RoutePolicy::new("/signin", RouteAccess::PublicOnlyWhenAnonymous),
            RoutePolicy::new("/signup", RouteAccess::PublicOnlyWhenAnonymous),
            RoutePolicy::new("/", RouteAccess::Authenticated),
            RoutePolicy::new("/lessons", RouteAccess::Authenticated),
            RoutePolicy::new("/quizzes", RouteAccess::Authenticated),
            RoutePolicy::new("/dictionary", RouteAccess::Authenticated),
            RoutePolicy::new("/profile", RouteAccess::Authenticated),
            RoutePolicy::new("/admin", RouteAccess::AdminOnly),
        ])
    }

    /// Resolve a concrete path to its policy, preferring the longest
    /// declared prefix; unmatched paths get the fallback access level.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RoutePolicy {
        self.policies
            .iter()
            .filter(|policy| {
                path == policy.path
                    || (policy.path != "/" && path.starts_with(&format!("{}/", policy.path)))
            })
            .max_by_key(|policy| policy.path.len())
            .cloned()
            .unwrap_or_else(|| RoutePolicy::new(path, self.fallback))
    }
}

//
// ─── DECISION ──────────────────────────────────────────────────────────────────
//

/// Where a denied navigation is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// To the sign-in view, carrying the originally requested location so the
    /// caller can return there after login.
    SignIn { from: String },
    /// To the home view.
    Home,
}

/// Outcome of one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session still loading, or an admin re-check is in flight. Render a
    /// neutral loading indicator only.
    Checking,
    Admitted,
    Redirect(RedirectTarget),
}

/// Pure access decision for one navigation.
///
/// `fresh_admin` carries the result of an explicit admin re-check; `None`
/// means the check has not resolved yet. The cached `is_admin` flag in the
/// snapshot is deliberately not consulted for `AdminOnly` routes, because it
/// can be stale immediately after a privilege change in another session.
#[must_use]
pub fn evaluate(
    access: RouteAccess,
    session: &SessionSnapshot,
    fresh_admin: Option<bool>,
    requested_path: &str,
) -> RouteDecision {
    if session.loading {
        return RouteDecision::Checking;
    }

    match access {
        RouteAccess::Public => RouteDecision::Admitted,
        RouteAccess::PublicOnlyWhenAnonymous => {
            if session.is_authenticated() {
                RouteDecision::Redirect(RedirectTarget::Home)
            } else {
                RouteDecision::Admitted
            }
        }
        RouteAccess::Authenticated => {
            if session.is_authenticated() {
                RouteDecision::Admitted
            } else {
                RouteDecision::Redirect(RedirectTarget::SignIn {
                    from: requested_path.to_owned(),
                })
            }
        }
        RouteAccess::AdminOnly => {
            if !session.is_authenticated() {
                return RouteDecision::Redirect(RedirectTarget::SignIn {
                    from: requested_path.to_owned(),
                });
            }
            match fresh_admin {
                None => RouteDecision::Checking,
                Some(true) => RouteDecision::Admitted,
                Some(false) => RouteDecision::Redirect(RedirectTarget::Home),
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
