//! Operation history controller

use std::sync::{Arc, Mutex};

use super::{lock, InFlight, Operation};
use crate::auth::AuthSession;
use crate::error::ClientResult;
use crate::models::HistoryEntry;
use crate::views::text::excerpt;

pub const LOAD_FAILED: &str = "Failed to load history";
pub const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            loading: true,
        }
    }
}

/// Display label for a history operation key; unknown keys show verbatim
pub fn operation_label(key: &str) -> String {
    Operation::from_history_key(key)
        .map(|op| op.label().to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Shortened input text for the history list
pub fn input_excerpt(entry: &HistoryEntry) -> String {
    excerpt(&entry.input_text, EXCERPT_CHARS)
}

pub struct HistoryController {
    auth: Arc<AuthSession>,
    state: Mutex<HistoryState>,
    inflight: InFlight,
}

impl HistoryController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            state: Mutex::new(HistoryState::default()),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> HistoryState {
        lock(&self.state).clone()
    }

    pub async fn load(&self) -> ClientResult<Vec<HistoryEntry>> {
        let _flight = self.inflight.begin("History")?;
        let result = self.auth.gateway().history().await;

        let mut s = lock(&self.state);
        s.loading = false;
        let entries = result.map_err(|e| {
            tracing::warn!("{}: {}", LOAD_FAILED, e);
            e
        })?;
        s.entries = entries.clone();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{signed_in, FakeTransport};
    use serde_json::json;

    #[test]
    fn test_operation_labels() {
        assert_eq!(operation_label("persona_enhance"), "Persona Enhancement");
        assert_eq!(operation_label("structure_check"), "Structure Analysis");
        assert_eq!(operation_label("mindmap_image"), "Mindmap Image");
        assert_eq!(operation_label("legacy_op"), "legacy_op");
    }

    #[tokio::test]
    async fn test_load_history() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 3).await;
        let long_input = "word ".repeat(100);
        transport.respond(
            Method::Get,
            "/api/enhance/history",
            200,
            json!({"history": [{
                "_id": "h1",
                "operation": "persona_enhance",
                "persona": "poet",
                "input_text": long_input,
                "output_text": "verse",
                "credits_used": 1,
                "created_at": "2024-05-01T10:00:00Z"
            }]}),
        );

        let history = HistoryController::new(auth);
        let entries = history.load().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].persona.as_deref(), Some("poet"));
        assert_eq!(input_excerpt(&entries[0]).chars().count(), EXCERPT_CHARS);
        assert!(!history.snapshot().loading);
    }

    #[tokio::test]
    async fn test_load_failure() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 3).await;
        transport.respond_bytes(Method::Get, "/api/enhance/history", 502, Vec::new());

        let history = HistoryController::new(auth);
        let err = history.load().await.unwrap_err();

        assert_eq!(err.to_string(), "Request failed (502)");
        assert!(!history.snapshot().loading);
    }
}
