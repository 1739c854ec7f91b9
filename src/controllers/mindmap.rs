//! Mindmap controller
//!
//! The page's primary action renders the map server-side as a PNG. The graph
//! data endpoint is exposed too, for callers that draw the map themselves.

use std::sync::{Arc, Mutex};

use super::{extract_upload, lock, require_text, InFlight, Operation, PaidCall};
use crate::api::FilePart;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::models::{MindmapResult, UploadResult};

pub const DEFAULT_TITLE: &str = "Narrative Mindmap";
pub const MIN_TEXT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct MindmapState {
    pub text: String,
    pub title: String,
    /// PNG bytes of the last rendered map
    pub image: Option<Vec<u8>>,
    pub graph: Option<MindmapResult>,
}

impl Default for MindmapState {
    fn default() -> Self {
        Self {
            text: String::new(),
            title: DEFAULT_TITLE.to_string(),
            image: None,
            graph: None,
        }
    }
}

impl MindmapState {
    /// Download name: whitespace runs become `_`, then `_mindmap.png`
    pub fn download_name(&self) -> String {
        let mut name = String::with_capacity(self.title.len() + 12);
        let mut in_space = false;
        for c in self.title.chars() {
            if c.is_whitespace() {
                if !in_space {
                    name.push('_');
                }
                in_space = true;
            } else {
                name.push(c);
                in_space = false;
            }
        }
        name.push_str("_mindmap.png");
        name
    }
}

pub struct MindmapController {
    auth: Arc<AuthSession>,
    state: Mutex<MindmapState>,
    inflight: InFlight,
}

impl MindmapController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            state: Mutex::new(MindmapState::default()),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> MindmapState {
        lock(&self.state).clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inflight.any()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        lock(&self.state).text = text.into();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        lock(&self.state).title = title.into();
    }

    fn validated_text(&self) -> ClientResult<(String, String)> {
        let s = lock(&self.state);
        require_text(&s.text)?;
        if s.text.chars().count() < MIN_TEXT_CHARS {
            return Err(ClientError::Validation(format!(
                "Text must be at least {} characters",
                MIN_TEXT_CHARS
            )));
        }
        Ok((s.text.clone(), s.title.clone()))
    }

    /// Render the mindmap image; the previous image is dropped first
    pub async fn generate_image(&self) -> ClientResult<Vec<u8>> {
        let (text, title) = self.validated_text()?;
        let call = PaidCall::begin(&self.auth, &self.inflight, Operation::MindmapImage)?;
        lock(&self.state).image = None;

        let title = (!title.trim().is_empty()).then_some(title.as_str());
        let result = self.auth.gateway().mindmap_image(&text, title, None).await;

        call.complete(result, |bytes| {
            lock(&self.state).image = Some(bytes.clone());
            bytes
        })
        .await
    }

    /// Fetch the node/edge graph
    pub async fn generate_graph(&self) -> ClientResult<MindmapResult> {
        let (text, _) = self.validated_text()?;
        let call = PaidCall::begin(&self.auth, &self.inflight, Operation::MindmapGenerate)?;
        let result = self.auth.gateway().generate_mindmap(&text, None).await;

        call.complete(result, |res| {
            lock(&self.state).graph = Some(res.mindmap.clone());
            res.mindmap
        })
        .await
    }

    pub async fn upload(&self, file: FilePart) -> ClientResult<UploadResult> {
        let (res, title) = extract_upload(&self.auth, &self.inflight, file).await?;
        let mut s = lock(&self.state);
        s.text = res.text.clone();
        s.title = title;
        Ok(res)
    }
}

pub const GENERATED_NOTICE: &str = "Mindmap generated! (2 credits used)";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, RequestBody};
    use crate::guard::Route;
    use crate::testing::{signed_in, FakeTransport};
    use serde_json::json;

    fn long_text() -> String {
        "Mara met Teo in the harbor town of Vell, where the old lighthouse stood. ".repeat(3)
    }

    #[tokio::test]
    async fn test_short_text_rejected_without_network() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 10).await;
        let before = transport.request_count();
        let mm = MindmapController::new(auth);
        mm.set_text("x".repeat(99));

        let err = mm.generate_image().await.unwrap_err();

        assert_eq!(err.to_string(), "Text must be at least 100 characters");
        assert!(mm.generate_graph().await.is_err());
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn test_needs_two_credits() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 1).await;
        let mm = MindmapController::new(auth);
        mm.set_text(long_text());

        let err = mm.generate_image().await.unwrap_err();

        assert_eq!(err.to_string(), "You need at least 2 credits!");
        assert_eq!(err.redirect(), Some(Route::Credits));
        assert_eq!(transport.calls_to("/api/mindmap/image"), 0);
    }

    #[tokio::test]
    async fn test_image_generation_stores_bytes() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 4).await;
        transport.respond_bytes(
            Method::Post,
            "/api/mindmap/image",
            200,
            vec![0x89, b'P', b'N', b'G'],
        );

        let mm = MindmapController::new(auth);
        mm.set_text(long_text());
        let bytes = mm.generate_image().await.unwrap();

        assert_eq!(bytes.len(), 4);
        assert_eq!(mm.snapshot().image, Some(bytes));

        let sent = transport
            .requests()
            .into_iter()
            .find(|r| r.url.ends_with("/api/mindmap/image"))
            .unwrap();
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({"text": long_text(), "title": "Narrative Mindmap"}))
        );
    }

    #[tokio::test]
    async fn test_failed_generation_clears_old_image() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 4).await;
        transport.respond_bytes(Method::Post, "/api/mindmap/image", 200, vec![1, 2, 3]);

        let mm = MindmapController::new(auth);
        mm.set_text(long_text());
        mm.generate_image().await.unwrap();

        transport.respond(
            Method::Post,
            "/api/mindmap/image",
            500,
            json!({"error": "Renderer crashed"}),
        );
        let err = mm.generate_image().await.unwrap_err();

        assert_eq!(err.to_string(), "Renderer crashed");
        assert!(mm.snapshot().image.is_none());
    }

    #[tokio::test]
    async fn test_graph_generation() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 4).await;
        transport.respond(
            Method::Post,
            "/api/mindmap/generate",
            200,
            json!({"mindmap": {
                "nodes": [{"id": "n1", "data": {"label": "Mara", "type": "character"}, "type": "character", "position": {"x": 0.0, "y": 1.0}}],
                "edges": [],
                "summary": {"character_count": 1, "location_count": 0, "theme_count": 0, "relationship_count": 0}
            }, "credits_used": 2}),
        );

        let mm = MindmapController::new(auth);
        mm.set_text(long_text());
        let graph = mm.generate_graph().await.unwrap();

        assert_eq!(graph.nodes[0].data.label, "Mara");
        assert_eq!(mm.snapshot().graph.unwrap().summary.character_count, 1);
    }

    #[test]
    fn test_download_name() {
        let mut state = MindmapState::default();
        assert_eq!(state.download_name(), "Narrative_Mindmap_mindmap.png");

        state.title = "The  Long\tNight".into();
        assert_eq!(state.download_name(), "The_Long_Night_mindmap.png");
    }
}
