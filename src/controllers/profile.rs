//! Profile and password controller

use std::sync::{Arc, Mutex};

use super::{lock, InFlight};
use crate::api::ProfileUpdate;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::models::User;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
}

pub struct ProfileController {
    auth: Arc<AuthSession>,
    state: Mutex<ProfileState>,
    inflight: InFlight,
}

impl ProfileController {
    /// Form prefilled from the resident user
    pub fn new(auth: Arc<AuthSession>) -> Self {
        let state = match auth.user() {
            Some(user) => ProfileState {
                name: user.name,
                email: user.email,
                ..Default::default()
            },
            None => ProfileState::default(),
        };
        Self {
            auth,
            state: Mutex::new(state),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> ProfileState {
        lock(&self.state).clone()
    }

    /// Either form is waiting on the backend
    pub fn is_saving(&self) -> bool {
        self.inflight.any()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        lock(&self.state).name = name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).email = email.into();
    }

    pub fn set_passwords(&self, current: impl Into<String>, new: impl Into<String>) {
        let mut s = lock(&self.state);
        s.current_password = current.into();
        s.new_password = new.into();
    }

    pub async fn save_profile(&self) -> ClientResult<User> {
        let (name, email) = {
            let s = lock(&self.state);
            (s.name.clone(), s.email.clone())
        };
        if name.trim().is_empty() {
            return Err(ClientError::Validation("Name is required".to_string()));
        }
        if email.trim().is_empty() {
            return Err(ClientError::Validation("Email is required".to_string()));
        }

        let _flight = self.inflight.begin("Profile update")?;
        let update = ProfileUpdate {
            name: Some(name),
            email: Some(email),
        };
        // The response carries the full user, already adopted by the session
        let user = self.auth.update_profile(&update).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(&self) -> ClientResult<()> {
        let (current, new) = {
            let s = lock(&self.state);
            (s.current_password.clone(), s.new_password.clone())
        };
        if current.is_empty() || new.is_empty() {
            return Err(ClientError::Validation("Fill in both password fields".to_string()));
        }
        if new.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ClientError::Validation(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }

        let _flight = self.inflight.begin("Password change")?;
        self.auth.gateway().change_password(&current, &new).await?;
        tracing::info!("Password changed");

        let mut s = lock(&self.state);
        s.current_password.clear();
        s.new_password.clear();
        Ok(())
    }
}
