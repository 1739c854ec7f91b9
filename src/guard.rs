//! Routes and route guards
//!
//! The guards are pure functions of [`AuthState`]; the UI router and the CLI
//! both ask them what to show.

use crate::auth::AuthState;

/// Every navigable location in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Index,
    Auth,
    Dashboard,
    Story,
    Mindmap,
    Documents,
    History,
    Profile,
    Credits,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Index,
        Route::Auth,
        Route::Dashboard,
        Route::Story,
        Route::Mindmap,
        Route::Documents,
        Route::History,
        Route::Profile,
        Route::Credits,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Index => "/",
            Route::Auth => "/auth",
            Route::Dashboard => "/dashboard",
            Route::Story => "/story",
            Route::Mindmap => "/mindmap",
            Route::Documents => "/documents",
            Route::History => "/history",
            Route::Profile => "/profile",
            Route::Credits => "/credits",
            Route::NotFound => "*",
        }
    }

    /// Match a location path, ignoring query string and trailing slash
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .unwrap_or(Route::NotFound)
    }

    /// Requires a signed-in user
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Story
                | Route::Mindmap
                | Route::Documents
                | Route::History
                | Route::Profile
                | Route::Credits
        )
    }

    /// Sign-in/sign-up screen, hidden from signed-in users
    pub fn is_auth_only(&self) -> bool {
        matches!(self, Route::Auth)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// What a guarded route should do right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a loading placeholder
    Placeholder,
    /// Session still resolving; show nothing
    Nothing,
    Redirect(Route),
    Render,
}

/// Policy for pages inside the authenticated shell
pub fn protected(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Unresolved => GuardDecision::Placeholder,
        AuthState::Anonymous => GuardDecision::Redirect(Route::Auth),
        AuthState::Authenticated(_) => GuardDecision::Render,
    }
}

/// Policy for the sign-in route
pub fn auth_only(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Unresolved => GuardDecision::Nothing,
        AuthState::Authenticated(_) => GuardDecision::Redirect(Route::Dashboard),
        AuthState::Anonymous => GuardDecision::Render,
    }
}

/// Apply whichever policy governs `route`
pub fn resolve(route: Route, state: &AuthState) -> GuardDecision {
    if route.is_protected() {
        protected(state)
    } else if route.is_auth_only() {
        auth_only(state)
    } else {
        GuardDecision::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn ann() -> AuthState {
        AuthState::Authenticated(User {
            id: "1".into(),
            name: "Ann".into(),
            email: "a@b.com".into(),
            credits: 0,
        })
    }

    #[test]
    fn test_protected_policy() {
        assert_eq!(protected(&AuthState::Unresolved), GuardDecision::Placeholder);
        assert_eq!(
            protected(&AuthState::Anonymous),
            GuardDecision::Redirect(Route::Auth)
        );
        assert_eq!(protected(&ann()), GuardDecision::Render);
    }

    #[test]
    fn test_auth_only_policy() {
        assert_eq!(auth_only(&AuthState::Unresolved), GuardDecision::Nothing);
        assert_eq!(
            auth_only(&ann()),
            GuardDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(auth_only(&AuthState::Anonymous), GuardDecision::Render);
    }

    #[test]
    fn test_resolve_public_routes_always_render() {
        for state in [AuthState::Unresolved, AuthState::Anonymous, ann()] {
            assert_eq!(resolve(Route::Index, &state), GuardDecision::Render);
            assert_eq!(resolve(Route::NotFound, &state), GuardDecision::Render);
        }
        assert_eq!(
            resolve(Route::Credits, &AuthState::Anonymous),
            GuardDecision::Redirect(Route::Auth)
        );
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Index);
        assert_eq!(Route::from_path(""), Route::Index);
        assert_eq!(Route::from_path("/story/"), Route::Story);
        assert_eq!(Route::from_path("/credits?from=mindmap"), Route::Credits);
        assert_eq!(Route::from_path("/nowhere"), Route::NotFound);

        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
