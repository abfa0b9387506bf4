//! Navigation guard.
//!
//! Pure presence-based routing: does a usable session exist, and is the
//! requested destination allowed for that state. This is a navigational
//! convenience, not a security boundary - the backend rejects anything the
//! session cannot actually do.

/// Navigable destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
    Dashboard,
    Users,
    Subscriptions,
    Settings,
}

impl Route {
    /// Routes that belong to the sign-in / password-reset flow.
    pub fn is_auth_route(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::ForgotPassword | Route::VerifyOtp | Route::ResetPassword
        )
    }

    /// Routes that require a session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Users | Route::Subscriptions | Route::Settings
        )
    }
}

/// Decide where a navigation request actually lands.
///
/// - root goes to the dashboard when authenticated, login otherwise
/// - protected routes bounce unauthenticated visitors to login
/// - auth-flow routes bounce authenticated visitors to the dashboard
pub fn resolve(requested: Route, authenticated: bool) -> Route {
    if requested == Route::Root {
        return if authenticated {
            Route::Dashboard
        } else {
            Route::Login
        };
    }

    if requested.is_protected() && !authenticated {
        return Route::Login;
    }

    if requested.is_auth_route() && authenticated {
        return Route::Dashboard;
    }

    requested
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_by_session_presence() {
        assert_eq!(resolve(Route::Root, true), Route::Dashboard);
        assert_eq!(resolve(Route::Root, false), Route::Login);
    }

    #[test]
    fn test_protected_routes_require_session() {
        for route in [
            Route::Dashboard,
            Route::Users,
            Route::Subscriptions,
            Route::Settings,
        ] {
            assert_eq!(resolve(route, false), Route::Login);
            assert_eq!(resolve(route, true), route);
        }
    }

    #[test]
    fn test_auth_routes_bounce_authenticated_visitors() {
        for route in [
            Route::Login,
            Route::ForgotPassword,
            Route::VerifyOtp,
            Route::ResetPassword,
        ] {
            assert_eq!(resolve(route, true), Route::Dashboard);
            assert_eq!(resolve(route, false), route);
        }
    }
}
