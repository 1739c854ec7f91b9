//! Global Application State
//!
//! Reactive mirror of the shared [`AuthSession`] plus toast messages.

use leptos::*;
use leptos_router::use_navigate;
use std::sync::Arc;

use narrativeiq::auth::{AuthSession, AuthState};
use narrativeiq::error::ClientError;
use narrativeiq::models::User;
use narrativeiq::Route;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Session shared by every page controller
    pub session: Arc<AuthSession>,
    /// Last observed auth state; refreshed after every backend round trip
    pub auth: RwSignal<AuthState>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree and resolve the session
pub fn provide_global_state(session: Arc<AuthSession>) {
    let state = GlobalState {
        session,
        auth: create_rw_signal(AuthState::Unresolved),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    let resolving = state.clone();
    spawn_local(async move {
        let resolved = resolving.session.initialize().await;
        resolving.auth.set(resolved);
    });

    provide_context(state);
}

impl GlobalState {
    /// Re-read the session after it may have changed
    pub fn sync(&self) {
        self.auth.set(self.session.state());
    }

    pub fn user(&self) -> Option<User> {
        self.auth.with(|a| a.user().cloned())
    }

    pub fn credits(&self) -> u32 {
        self.auth.with(|a| a.credits())
    }

    pub fn logout(&self) {
        self.session.logout();
        self.sync();
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }

    /// Toast a failure and hand back where the error wants the user to go
    ///
    /// Server messages are shown as sent; `fallback` replaces failures that
    /// carry no message of their own.
    pub fn report(&self, fallback: Option<&str>, err: &ClientError) -> Option<Route> {
        match (fallback, err) {
            (Some(fallback), ClientError::Transport(_) | ClientError::Decode(_)) => {
                self.show_error(fallback)
            }
            _ => self.show_error(&err.to_string()),
        }
        self.sync();
        err.redirect()
    }
}

/// Error reporter that also follows the error's redirect, if any
pub fn use_report() -> impl Fn(Option<&'static str>, &ClientError) + Clone + 'static {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();
    move |fallback: Option<&'static str>, err: &ClientError| {
        if let Some(to) = state.report(fallback, err) {
            navigate(to.path(), Default::default());
        }
    }
}
