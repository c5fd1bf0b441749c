//! Route guard controllers.
//!
//! A guard decides, before a protected subtree renders, whether the
//! visitor may stay. The decision is a linear state machine:
//! `Checking -> {Redirecting | Ready}`, with `Redirecting` terminal for
//! that mount (the router is about to replace the tree). The UI shows
//! its loading indicator while `Checking` and renders nothing protected
//! until `Ready`.
//!
//! Wrong role is treated as unauthenticated: the session is cleared and
//! the visitor lands on the login page, not on a forbidden page.

use crate::models::User;
use crate::services::admin::{AdminService, BadgeCounts};
use crate::services::auth::AuthService;

pub const LOGIN_PATH: &str = "/login";

/// Where a denied visitor is sent. `replace` is always true: the
/// redirect replaces history rather than pushing, so Back does not
/// bounce through the guard again.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub to: &'static str,
    pub replace: bool,
}

impl Redirect {
    fn to_login() -> Self {
        Self {
            to: LOGIN_PATH,
            replace: true,
        }
    }
}

/// Outcome of a mount-time check. A guarded view holds one of these as
/// its render state, starting from the default while [`RouteGuard::check`]
/// is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GuardState {
    /// Verification in flight; render a loading indicator only.
    #[default]
    Checking,
    /// Denied. Terminal for this mount.
    Redirecting(Redirect),
    /// Admitted, with the freshly refetched user.
    Ready { user: User },
}

impl GuardState {
    pub fn is_ready(&self) -> bool {
        matches!(self, GuardState::Ready { .. })
    }
}

/// Mount-time authorization check for a protected subtree.
#[derive(Clone)]
pub struct RouteGuard {
    auth: AuthService,
    admin_only: bool,
}

impl RouteGuard {
    /// Guard for the customer account area: any valid session passes.
    pub fn user(auth: AuthService) -> Self {
        Self {
            auth,
            admin_only: false,
        }
    }

    /// Guard for the admin back office: requires an admin role after
    /// refresh.
    pub fn admin(auth: AuthService) -> Self {
        Self {
            auth,
            admin_only: true,
        }
    }

    /// Run the admission protocol.
    ///
    /// 1. No local token: redirect immediately, before any protected
    ///    call fires.
    /// 2. Refetch the authoritative user; a failure (expired token,
    ///    deactivated account) clears the session and redirects.
    /// 3. Admin subtrees additionally require an admin role on the
    ///    *refreshed* record, never on the cache.
    pub async fn check(&self) -> GuardState {
        let session = self.auth.client().session();

        if !session.is_authenticated() {
            tracing::debug!("guard: no local session, redirecting");
            return GuardState::Redirecting(Redirect::to_login());
        }

        let user = match self.auth.get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!("guard: session refresh failed ({e}), redirecting");
                session.clear();
                return GuardState::Redirecting(Redirect::to_login());
            }
        };

        if self.admin_only && !user.role.is_admin() {
            tracing::debug!("guard: role mismatch, treating as unauthenticated");
            session.clear();
            return GuardState::Redirecting(Redirect::to_login());
        }

        GuardState::Ready { user }
    }

    /// One-time post-admission side effect for the admin shell: fetch
    /// the nav badge counts. Failures are non-fatal; the badges just
    /// stay empty.
    pub async fn badge_counts(&self, admin: &AdminService) -> BadgeCounts {
        match admin.badge_counts().await {
            Ok(counts) => counts,
            Err(e) => {
                tracing::warn!("badge count fetch failed: {e}");
                BadgeCounts::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::test_client;
    use serde_json::json;

    fn guards(admin_only: bool) -> (RouteGuard, std::rc::Rc<crate::http::tests::MockTransport>, crate::session::SessionStore) {
        let (client, transport, session) = test_client();
        let auth = AuthService::new(client);
        let guard = if admin_only {
            RouteGuard::admin(auth)
        } else {
            RouteGuard::user(auth)
        };
        (guard, transport, session)
    }

    fn user_json(role: &str) -> serde_json::Value {
        json!({ "user": { "id": 1, "name": "Ada", "email": "a@x.com", "role": role } })
    }

    #[tokio::test]
    async fn unauthenticated_visit_redirects_before_any_call() {
        let (guard, transport, _) = guards(true);

        let state = guard.check().await;
        assert_eq!(
            state,
            GuardState::Redirecting(Redirect { to: LOGIN_PATH, replace: true })
        );
        // The redirect resolved with zero protected calls fired.
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn stale_token_clears_the_session_and_redirects() {
        let (guard, transport, session) = guards(false);
        session.set_token("expired");
        transport.push_json(401, json!({ "message": "Token expired" }));

        let state = guard.check().await;
        assert!(matches!(state, GuardState::Redirecting(_)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn wrong_role_is_treated_as_unauthenticated() {
        let (guard, transport, session) = guards(true);
        session.set_token("tok");
        transport.push_json(200, user_json("customer"));

        let state = guard.check().await;
        assert!(matches!(state, GuardState::Redirecting(_)));
        // Session cleared, not left half-valid.
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn admin_role_is_checked_on_the_refreshed_record_not_the_cache() {
        let (guard, transport, session) = guards(true);
        session.set_token("tok");

        // Cache says admin; the server has since demoted them.
        let admin: crate::models::User =
            serde_json::from_value(json!({ "id": 1, "role": "admin" })).unwrap();
        session.set_user(&admin);
        transport.push_json(200, user_json("customer"));

        let state = guard.check().await;
        assert!(matches!(state, GuardState::Redirecting(_)));
    }

    #[tokio::test]
    async fn valid_admin_session_is_admitted() {
        let (guard, transport, session) = guards(true);
        session.set_token("tok");
        transport.push_json(200, user_json("super_admin"));

        let state = guard.check().await;
        let GuardState::Ready { user } = state else {
            panic!("expected admission, got {state:?}");
        };
        assert!(user.role.is_admin());
        // Exactly one call went out: the user refresh.
        assert_eq!(transport.request_count(), 1);
        // The refreshed record also landed in the cache.
        assert!(session.is_admin());
    }

    #[tokio::test]
    async fn customer_area_admits_any_valid_session() {
        let (guard, transport, session) = guards(false);
        session.set_token("tok");
        transport.push_json(200, user_json("customer"));

        assert!(guard.check().await.is_ready());
    }

    #[tokio::test]
    async fn a_view_starts_checking_until_the_guard_resolves() {
        let (guard, transport, session) = guards(false);
        session.set_token("tok");
        transport.push_json(200, user_json("customer"));

        // The render state a guarded view holds before check() lands.
        let mut state = GuardState::default();
        assert_eq!(state, GuardState::Checking);
        assert!(!state.is_ready());

        state = guard.check().await;
        assert!(state.is_ready());
    }

    #[tokio::test]
    async fn badge_count_failures_are_non_fatal() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let guard = RouteGuard::admin(AuthService::new(client.clone()));
        let admin = AdminService::new(client);

        transport.push_network_error("offline");
        let counts = guard.badge_counts(&admin).await;
        assert_eq!(counts, BadgeCounts::default());
    }
}
