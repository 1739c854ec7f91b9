//! Auth Session Controller
//!
//! Process-wide current-user state. The session is an explicit state machine:
//!
//! ```text
//! Unresolved ──initialize──► Authenticated | Anonymous
//! Authenticated ──logout / failed refresh──► Anonymous
//! Anonymous ──login / register──► Authenticated
//! ```
//!
//! `loading` is derived from `Unresolved`, so a resolved-but-loading session
//! cannot be expressed.

use std::sync::{PoisonError, RwLock};

use crate::api::{ApiGateway, ProfileUpdate};
use crate::error::ClientResult;
use crate::models::User;

/// Where the session currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Startup check has not finished
    Unresolved,
    Authenticated(User),
    Anonymous,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Unresolved)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Cached balance, zero when nobody is signed in
    pub fn credits(&self) -> u32 {
        self.user().map(|u| u.credits).unwrap_or(0)
    }
}

/// Owner of the resident user and the only writer of the credential
pub struct AuthSession {
    gateway: ApiGateway,
    state: RwLock<AuthState>,
}

impl AuthSession {
    /// New session in the `Unresolved` state; call [`initialize`](Self::initialize)
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            state: RwLock::new(AuthState::Unresolved),
        }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    pub fn credits(&self) -> u32 {
        self.state().credits()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    fn transition(&self, next: AuthState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn sign_in(&self, token: &str, user: User) {
        self.gateway.session().set(Some(token));
        tracing::info!(user_id = %user.id, "Signed in");
        self.transition(AuthState::Authenticated(user));
    }

    fn invalidate(&self) {
        self.gateway.session().set(None);
        self.transition(AuthState::Anonymous);
    }

    /// Resolve the startup state from the persisted credential
    ///
    /// Always leaves the session resolved; a failed self-fetch purges the
    /// credential instead of surfacing an error.
    pub async fn initialize(&self) -> AuthState {
        if self.gateway.session().get().is_none() {
            self.transition(AuthState::Anonymous);
            return self.state();
        }

        self.refresh_user().await;
        self.state()
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let res = self.gateway.login(email, password).await?;
        self.sign_in(&res.token, res.user.clone());
        Ok(res.user)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<User> {
        let res = self.gateway.register(name, email, password).await?;
        self.sign_in(&res.token, res.user.clone());
        Ok(res.user)
    }

    /// Drop the credential and the user; no network call
    pub fn logout(&self) {
        self.invalidate();
        tracing::info!("Signed out");
    }

    /// Re-fetch the resident user
    ///
    /// Any failure is treated as session invalidation.
    ///
    /// The result is dropped when the credential changed while the fetch was
    /// in flight (logout or a new sign-in), and the current state is kept.
    pub async fn refresh_user(&self) -> Option<User> {
        let token = self.gateway.session().get();
        let result = self.gateway.me().await;

        if self.gateway.session().get() != token {
            tracing::debug!("Discarding stale self-fetch");
            return self.user();
        }

        match result {
            Ok(user) => {
                self.transition(AuthState::Authenticated(user.clone()));
                Some(user)
            }
            Err(e) => {
                tracing::info!("Session invalidated: {}", e);
                self.invalidate();
                None
            }
        }
    }

    /// Send a profile change and adopt the identity the backend returns
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        let res = self.gateway.update_profile(update).await?;
        self.transition(AuthState::Authenticated(res.user.clone()));
        Ok(res.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::error::ClientError;
    use crate::session::SessionStore;
    use crate::testing::{gateway, user_json, FakeTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_initialize_without_token_is_anonymous() {
        let transport = FakeTransport::new();
        let (gw, _store) = gateway(&transport, None);
        let auth = AuthSession::new(gw);
        assert!(auth.is_loading());

        let state = auth.initialize().await;

        assert_eq!(state, AuthState::Anonymous);
        assert!(!auth.is_loading());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_with_valid_token() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(7));
        let (gw, store) = gateway(&transport, Some("stored"));
        let auth = AuthSession::new(gw);

        auth.initialize().await;

        assert_eq!(auth.credits(), 7);
        assert_eq!(store.get().as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn test_initialize_with_rejected_token_clears_it() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/api/auth/me",
            401,
            json!({"error": "Token expired"}),
        );
        let (gw, store) = gateway(&transport, Some("stale"));
        let auth = AuthSession::new(gw);

        let state = auth.initialize().await;

        assert_eq!(state, AuthState::Anonymous);
        assert!(auth.user().is_none());
        assert!(store.get().is_none());
        assert!(!auth.is_loading());
    }

    #[tokio::test]
    async fn test_initialize_resolves_on_network_failure() {
        let transport = FakeTransport::new();
        let (gw, store) = gateway(&transport, Some("tok"));
        let auth = AuthSession::new(gw);

        auth.initialize().await;

        assert_eq!(auth.state(), AuthState::Anonymous);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_login_stores_token_and_user() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/auth/login",
            200,
            json!({"token": "abc", "user": {"id": "1", "name": "Ann", "email": "a@b.com", "credits": 10}}),
        );
        let (gw, store) = gateway(&transport, None);
        let auth = AuthSession::new(gw);
        auth.initialize().await;

        let user = auth.login("a@b.com", "secret").await.unwrap();

        let expected = User {
            id: "1".into(),
            name: "Ann".into(),
            email: "a@b.com".into(),
            credits: 10,
        };
        assert_eq!(user, expected);
        assert_eq!(auth.state(), AuthState::Authenticated(expected));
        assert_eq!(store.get().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_login_failure_propagates_and_keeps_state() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/auth/login",
            401,
            json!({"error": "Invalid credentials"}),
        );
        let (gw, store) = gateway(&transport, None);
        let auth = AuthSession::new(gw);
        auth.initialize().await;

        let err = auth.login("a@b.com", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(auth.state(), AuthState::Anonymous);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_register_then_logout() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/auth/register",
            201,
            json!({"token": "new-tok", "user": user_json(10)}),
        );
        let (gw, store) = gateway(&transport, None);
        let auth = AuthSession::new(gw);
        auth.initialize().await;

        auth.register("Ann", "a@b.com", "secret").await.unwrap();
        assert_eq!(store.get().as_deref(), Some("new-tok"));

        auth.logout();

        assert!(auth.user().is_none());
        assert!(store.get().is_none());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_invalidates_session() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(3));
        let (gw, store) = gateway(&transport, Some("tok"));
        let auth = AuthSession::new(gw);
        auth.initialize().await;
        assert_eq!(auth.credits(), 3);

        transport.respond(Method::Get, "/api/auth/me", 500, json!({}));
        assert!(auth.refresh_user().await.is_none());

        assert_eq!(auth.state(), AuthState::Anonymous);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_logout_during_refresh_stays_signed_out() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(3));
        let (gw, store) = gateway(&transport, Some("tok"));
        let auth = AuthSession::new(gw);
        auth.initialize().await;

        let gate = transport.hold(Method::Get, "/api/auth/me");
        let sign_out = async {
            tokio::task::yield_now().await;
            auth.logout();
            gate.notify_one();
        };
        let (refreshed, ()) = tokio::join!(auth.refresh_user(), sign_out);

        assert!(refreshed.is_none());
        assert_eq!(auth.state(), AuthState::Anonymous);
        assert!(auth.user().is_none());
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_stale_refresh_failure_keeps_new_sign_in() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(3));
        transport.respond(
            Method::Post,
            "/api/auth/login",
            200,
            json!({"token": "fresh", "user": user_json(9)}),
        );
        let (gw, store) = gateway(&transport, Some("old"));
        let auth = AuthSession::new(gw);
        auth.initialize().await;

        transport.respond(Method::Get, "/api/auth/me", 401, json!({"error": "Token expired"}));
        let gate = transport.hold(Method::Get, "/api/auth/me");
        let sign_in = async {
            tokio::task::yield_now().await;
            let user = auth.login("a@b.com", "secret").await;
            gate.notify_one();
            user
        };
        let (_, signed_in) = tokio::join!(auth.refresh_user(), sign_in);

        assert!(signed_in.is_ok());
        assert_eq!(auth.credits(), 9);
        assert_eq!(store.get().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_update_profile_replaces_user() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(3));
        transport.respond(
            Method::Put,
            "/api/auth/update-profile",
            200,
            json!({"message": "Profile updated", "user": {"id": "1", "name": "Anne", "email": "anne@b.com", "credits": 3}}),
        );
        let (gw, _store) = gateway(&transport, Some("tok"));
        let auth = AuthSession::new(gw);
        auth.initialize().await;

        let update = ProfileUpdate {
            name: Some("Anne".into()),
            email: Some("anne@b.com".into()),
        };
        let user = auth.update_profile(&update).await.unwrap();

        assert_eq!(user.name, "Anne");
        assert_eq!(auth.user().unwrap().email, "anne@b.com");
    }

    #[test]
    fn test_state_accessors() {
        assert!(AuthState::Unresolved.is_loading());
        assert_eq!(AuthState::Anonymous.credits(), 0);
        assert!(matches!(
            ClientError::from_status(401, None),
            ClientError::Request { status: 401, .. }
        ));
    }
}
