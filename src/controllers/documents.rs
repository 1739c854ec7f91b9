//! Saved documents controller

use std::sync::{Arc, Mutex};

use super::{lock, InFlight};
use crate::auth::AuthSession;
use crate::error::ClientResult;
use crate::models::Document;

pub const LIST_FAILED: &str = "Failed to load documents";
pub const OPEN_FAILED: &str = "Failed to load document";

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentsState {
    pub documents: Vec<Document>,
    /// True until the first list request settles
    pub loading: bool,
    pub selected: Option<Document>,
}

impl Default for DocumentsState {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            loading: true,
            selected: None,
        }
    }
}

pub struct DocumentsController {
    auth: Arc<AuthSession>,
    state: Mutex<DocumentsState>,
    inflight: InFlight,
}

impl DocumentsController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            state: Mutex::new(DocumentsState::default()),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> DocumentsState {
        lock(&self.state).clone()
    }

    pub async fn load(&self) -> ClientResult<Vec<Document>> {
        let _flight = self.inflight.begin("Document list")?;
        let result = self.auth.gateway().list_documents().await;

        let mut s = lock(&self.state);
        s.loading = false;
        let documents = result.map_err(|e| {
            tracing::warn!("{}: {}", LIST_FAILED, e);
            e
        })?;
        s.documents = documents.clone();
        Ok(documents)
    }

    /// Fetch one document with its full content and select it
    pub async fn open(&self, doc_id: &str) -> ClientResult<Document> {
        let _flight = self.inflight.begin("Document")?;
        let doc = self.auth.gateway().get_document(doc_id).await.map_err(|e| {
            tracing::warn!(doc_id, "{}: {}", OPEN_FAILED, e);
            e
        })?;
        lock(&self.state).selected = Some(doc.clone());
        Ok(doc)
    }

    pub fn close(&self) {
        lock(&self.state).selected = None;
    }
}
