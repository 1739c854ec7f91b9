//! Client error types
//!
//! Every failure a caller can observe collapses into [`ClientError`]. Local
//! validation, the credit pre-check and the re-entrancy guard never reach the
//! network; the remaining variants come from the gateway.

use thiserror::Error;

use crate::guard::Route;

/// Errors surfaced by the gateway, the auth session and the page controllers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Cached balance is below the operation's cost
    #[error("{}", insufficient_message(.required, .available))]
    InsufficientCredits { required: u32, available: u32 },

    /// The same action is already waiting on the backend
    #[error("{0} is already in progress")]
    Busy(String),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Request { status: u16, message: String },

    /// Network failure before a response arrived
    #[error("Network error: {0}")]
    Transport(String),

    /// Body could not be decoded into the expected shape
    #[error("Parse error: {0}")]
    Decode(String),

    /// Durable session storage failed
    #[error("Session storage error: {0}")]
    Storage(String),
}

fn insufficient_message(required: &u32, available: &u32) -> String {
    if *available == 0 {
        "You're out of credits!".to_string()
    } else {
        format!("You need at least {} credits!", required)
    }
}

impl ClientError {
    /// Build a request error from a status code and an optional server message
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed ({})", status));
        ClientError::Request { status, message }
    }

    /// Route a view should navigate to after this error, if any
    pub fn redirect(&self) -> Option<Route> {
        match self {
            ClientError::InsufficientCredits { .. } => Some(Route::Credits),
            _ => None,
        }
    }

    /// True when the backend rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Request { status: 401, .. })
    }

    /// True for rejections that never touched the network
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::InsufficientCredits { .. }
                | ClientError::Busy(_)
        )
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_displays_server_message_verbatim() {
        let err = ClientError::from_status(400, Some("Insufficient credits".to_string()));
        assert_eq!(err.to_string(), "Insufficient credits");
    }

    #[test]
    fn test_request_error_falls_back_to_status() {
        let err = ClientError::from_status(502, None);
        assert_eq!(err.to_string(), "Request failed (502)");

        let err = ClientError::from_status(500, Some(String::new()));
        assert_eq!(err.to_string(), "Request failed (500)");
    }

    #[test]
    fn test_insufficient_credits_redirects() {
        let err = ClientError::InsufficientCredits {
            required: 2,
            available: 0,
        };
        assert_eq!(err.redirect(), Some(Route::Credits));
        assert_eq!(err.to_string(), "You're out of credits!");
        assert!(err.is_local());

        let err = ClientError::InsufficientCredits {
            required: 2,
            available: 1,
        };
        assert_eq!(err.to_string(), "You need at least 2 credits!");
    }

    #[test]
    fn test_unauthorized() {
        assert!(ClientError::from_status(401, None).is_unauthorized());
        assert!(!ClientError::from_status(403, None).is_unauthorized());
        assert!(ClientError::Validation("x".into()).redirect().is_none());
    }
}
