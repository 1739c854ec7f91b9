//! Sign-in / sign-up form controller

use std::sync::{Arc, Mutex};

use super::{lock, InFlight};
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::guard::Route;
use crate::models::User;

use super::profile::MIN_PASSWORD_CHARS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    /// Toast shown after a successful submission
    pub fn success_notice(&self) -> &'static str {
        match self {
            AuthMode::SignIn => "Welcome back!",
            AuthMode::SignUp => "Account created!",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct AuthFormController {
    auth: Arc<AuthSession>,
    state: Mutex<AuthFormState>,
    inflight: InFlight,
}

impl AuthFormController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            state: Mutex::new(AuthFormState::default()),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> AuthFormState {
        lock(&self.state).clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inflight.any()
    }

    pub fn set_mode(&self, mode: AuthMode) {
        lock(&self.state).mode = mode;
    }

    pub fn set_name(&self, name: impl Into<String>) {
        lock(&self.state).name = name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        lock(&self.state).password = password.into();
    }

    fn validate(s: &AuthFormState) -> ClientResult<()> {
        let missing = |field: &str| ClientError::Validation(format!("{} is required", field));

        if s.mode == AuthMode::SignUp && s.name.trim().is_empty() {
            return Err(missing("Name"));
        }
        if s.email.trim().is_empty() {
            return Err(missing("Email"));
        }
        if s.password.is_empty() {
            return Err(missing("Password"));
        }
        if s.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ClientError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }
        Ok(())
    }

    /// Submit the form; on success returns the route to navigate to
    pub async fn submit(&self) -> ClientResult<(User, Route)> {
        let s = self.snapshot();
        Self::validate(&s)?;

        let _flight = self.inflight.begin("Sign in")?;
        let user = match s.mode {
            AuthMode::SignIn => self.auth.login(s.email.trim(), &s.password).await?,
            AuthMode::SignUp => {
                self.auth
                    .register(s.name.trim(), s.email.trim(), &s.password)
                    .await?
            }
        };

        Ok((user, Route::Dashboard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::auth::AuthState;
    use crate::testing::{gateway, user_json, FakeTransport};
    use serde_json::json;

    async fn anonymous(transport: &Arc<FakeTransport>) -> Arc<AuthSession> {
        let (gw, _) = gateway(transport, None);
        let auth = Arc::new(AuthSession::new(gw));
        auth.initialize().await;
        auth
    }

    #[tokio::test]
    async fn test_sign_in_navigates_to_workspace() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/auth/login",
            200,
            json!({"token": "abc", "user": user_json(10)}),
        );
        let auth = anonymous(&transport).await;

        let form = AuthFormController::new(auth.clone());
        form.set_email(" a@b.com ");
        form.set_password("secret");
        let (user, route) = form.submit().await.unwrap();

        assert_eq!(route, Route::Dashboard);
        assert_eq!(user.credits, 10);
        assert!(matches!(auth.state(), AuthState::Authenticated(_)));
        assert_eq!(form.snapshot().mode.success_notice(), "Welcome back!");
    }

    #[tokio::test]
    async fn test_sign_up_requires_name() {
        let transport = FakeTransport::new();
        let auth = anonymous(&transport).await;

        let form = AuthFormController::new(auth);
        form.set_mode(AuthMode::SignUp);
        form.set_email("a@b.com");
        form.set_password("secret");

        let err = form.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Name is required");

        form.set_name("Ann");
        form.set_password("123");
        let err = form.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_failure_surfaces_server_message() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/auth/register",
            409,
            json!({"error": "Email already registered"}),
        );
        let auth = anonymous(&transport).await;

        let form = AuthFormController::new(auth.clone());
        form.set_mode(AuthMode::SignUp);
        form.set_name("Ann");
        form.set_email("a@b.com");
        form.set_password("secret");

        let err = form.submit().await.unwrap_err();

        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(auth.state(), AuthState::Anonymous);
        assert!(!form.is_loading());
    }
}
