//! API Gateway
//!
//! Single chokepoint for every backend call. Attaches the bearer credential,
//! encodes bodies, decodes responses and normalizes failures into
//! [`ClientError`]. It never mutates the session store itself; callers do
//! that explicitly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::dto::*;
use super::transport::{FilePart, HttpRequest, HttpResponse, Method, RequestBody, Transport};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Document, EnhanceResult, HistoryEntry, PersonaCatalog, PricingFeature, StoryResult,
    UploadResult, User,
};
use crate::session::SessionStore;

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Typed client for the NarrativeIQ backend
#[derive(Clone)]
pub struct ApiGateway {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
}

impl ApiGateway {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store the gateway reads the credential from
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn build(&self, method: Method, path: &str, body: RequestBody) -> HttpRequest {
        let mut headers = Vec::new();

        if let Some(token) = self.session.get() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        if matches!(body, RequestBody::Json(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> ClientResult<HttpResponse> {
        let request = self.build(method, path, body);
        tracing::debug!(method = %method, path = %path, "Sending API request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(method = %method, path = %path, "Transport failure: {}", e);
            e
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let server_message = serde_json::from_slice::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
        let err = ClientError::from_status(response.status, server_message);

        tracing::warn!(
            method = %method,
            path = %path,
            status = response.status,
            "API request failed: {}",
            err
        );
        Err(err)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> ClientResult<T> {
        let response = self.execute(method, path, body).await?;
        serde_json::from_slice(&response.body).map_err(ClientError::from)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::Get, path, RequestBody::Empty).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let value = serde_json::to_value(body)?;
        self.request(method, path, RequestBody::Json(value)).await
    }

    // ============ Auth ============

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let body = RegisterRequest { name, email, password };
        self.send_json(Method::Post, "/api/auth/register", &body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest { email, password };
        self.send_json(Method::Post, "/api/auth/login", &body).await
    }

    /// Identity behind the resident credential
    pub async fn me(&self) -> ClientResult<User> {
        self.get("/api/auth/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<ProfileResponse> {
        self.send_json(Method::Put, "/api/auth/update-profile", update).await
    }

    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<MessageResponse> {
        let body = ChangePasswordRequest {
            current_password: current,
            new_password: new,
        };
        self.send_json(Method::Put, "/api/auth/change-password", &body).await
    }

    // ============ Credits ============

    pub async fn credit_balance(&self) -> ClientResult<u32> {
        let res: BalanceResponse = self.get("/api/credits/balance").await?;
        Ok(res.credits)
    }

    pub async fn pricing(&self) -> ClientResult<BTreeMap<String, PricingFeature>> {
        let res: PricingResponse = self.get("/api/credits/pricing").await?;
        Ok(res.features)
    }

    pub async fn add_credits(&self, amount: u32) -> ClientResult<AddCreditsResponse> {
        self.send_json(Method::Post, "/api/credits/add", &AddCreditsRequest { amount })
            .await
    }

    // ============ Enhancement ============

    pub async fn personas(&self) -> ClientResult<PersonaCatalog> {
        self.get("/api/enhance/personas").await
    }

    pub async fn enhance_persona(
        &self,
        text: &str,
        persona: &str,
        title: Option<&str>,
        doc_id: Option<&str>,
    ) -> ClientResult<EnhanceResult> {
        let body = EnhanceRequest {
            text,
            persona,
            title,
            doc_id,
        };
        self.send_json(Method::Post, "/api/enhance/persona", &body).await
    }

    // ============ Analysis ============

    pub async fn analyze_consistency(
        &self,
        text: &str,
        doc_id: Option<&str>,
    ) -> ClientResult<ConsistencyResponse> {
        let body = TextRequest { text, doc_id };
        self.send_json(Method::Post, "/api/analyze/consistency", &body).await
    }

    pub async fn analyze_structure(
        &self,
        text: &str,
        doc_id: Option<&str>,
    ) -> ClientResult<StructureResponse> {
        let body = TextRequest { text, doc_id };
        self.send_json(Method::Post, "/api/analyze/structure", &body).await
    }

    pub async fn analyze_character(
        &self,
        text: &str,
        character_name: &str,
        doc_id: Option<&str>,
    ) -> ClientResult<CharacterResponse> {
        let body = CharacterRequest {
            text,
            character_name,
            doc_id,
        };
        self.send_json(Method::Post, "/api/analyze/character", &body).await
    }

    pub async fn deep_scan(
        &self,
        text: &str,
        doc_id: Option<&str>,
    ) -> ClientResult<DeepScanResponse> {
        let body = TextRequest { text, doc_id };
        self.send_json(Method::Post, "/api/analyze/deep-scan", &body).await
    }

    // ============ Mindmap ============

    pub async fn generate_mindmap(
        &self,
        text: &str,
        doc_id: Option<&str>,
    ) -> ClientResult<MindmapResponse> {
        let body = TextRequest { text, doc_id };
        self.send_json(Method::Post, "/api/mindmap/generate", &body).await
    }

    /// Rendered mindmap as raw image bytes (PNG)
    pub async fn mindmap_image(
        &self,
        text: &str,
        title: Option<&str>,
        doc_id: Option<&str>,
    ) -> ClientResult<Vec<u8>> {
        let body = serde_json::to_value(MindmapImageRequest { text, title, doc_id })?;
        let response = self
            .execute(Method::Post, "/api/mindmap/image", RequestBody::Json(body))
            .await?;
        Ok(response.body)
    }

    // ============ Story ============

    pub async fn complete_story(&self, request: &StoryRequest<'_>) -> ClientResult<StoryResult> {
        self.send_json(Method::Post, "/api/story/complete", request).await
    }

    // ============ Documents & history ============

    pub async fn list_documents(&self) -> ClientResult<Vec<Document>> {
        let res: DocumentListResponse = self.get("/api/enhance/documents").await?;
        Ok(res.documents)
    }

    pub async fn get_document(&self, doc_id: &str) -> ClientResult<Document> {
        let path = format!("/api/enhance/documents/{}", urlencoding::encode(doc_id));
        self.get(&path).await
    }

    /// Persist a document and return its new id
    pub async fn save_document(&self, title: &str, content: &str) -> ClientResult<String> {
        let res: SaveDocumentResponse = self
            .send_json(Method::Post, "/api/enhance/save", &SaveDocumentRequest { title, content })
            .await?;
        Ok(res.doc_id)
    }

    pub async fn history(&self) -> ClientResult<Vec<HistoryEntry>> {
        let res: HistoryResponse = self.get("/api/enhance/history").await?;
        Ok(res.history)
    }

    // ============ Upload ============

    /// Extract plain text from a PDF, TXT or Markdown file
    pub async fn upload_extract(&self, file: FilePart) -> ClientResult<UploadResult> {
        self.request(Method::Post, "/api/upload/extract", RequestBody::Multipart(file))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::testing::{gateway, user_json, FakeTransport, TEST_BASE};
    use serde_json::json;

    fn gateway_with(transport: &Arc<FakeTransport>, token: Option<&str>) -> ApiGateway {
        gateway(transport, token).0
    }

    #[tokio::test]
    async fn test_attaches_bearer_token_when_present() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(5));

        let gateway = gateway_with(&transport, Some("tok-1"));
        gateway.me().await.unwrap();

        let req = transport.last_request().unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer tok-1"));
        assert_eq!(req.url, format!("{}/api/auth/me", TEST_BASE));
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/auth/login",
            200,
            json!({"token": "abc", "user": user_json(10)}),
        );

        let gateway = gateway_with(&transport, None);
        gateway.login("a@b.com", "secret1").await.unwrap();

        let req = transport.last_request().unwrap();
        assert!(req.header("Authorization").is_none());
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(
            req.body,
            RequestBody::Json(json!({"email": "a@b.com", "password": "secret1"}))
        );
    }

    #[tokio::test]
    async fn test_error_field_becomes_message() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/analyze/consistency",
            402,
            json!({"error": "Insufficient credits"}),
        );

        let gateway = gateway_with(&transport, Some("t"));
        let err = gateway.analyze_consistency("text", None).await.unwrap_err();

        assert_eq!(err.to_string(), "Insufficient credits");
        assert!(matches!(err, ClientError::Request { status: 402, .. }));
    }

    #[tokio::test]
    async fn test_unparseable_error_body_mentions_status() {
        let transport = FakeTransport::new();
        transport.respond_bytes(
            Method::Get,
            "/api/enhance/history",
            503,
            b"<html>down</html>".to_vec(),
        );

        let gateway = gateway_with(&transport, Some("t"));
        let err = gateway.history().await.unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let transport = FakeTransport::new();
        transport.respond_bytes(Method::Get, "/api/credits/balance", 200, b"ok".to_vec());

        let gateway = gateway_with(&transport, Some("t"));
        let err = gateway.credit_balance().await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_optional_fields_omitted() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/story/complete",
            200,
            json!({"completed_story": "The end.", "credits_used": 2}),
        );

        let gateway = gateway_with(&transport, Some("t"));
        let req = StoryRequest {
            text: "Once upon a time there was a lighthouse.",
            genre: Some("fantasy"),
            ..Default::default()
        };
        let result = gateway.complete_story(&req).await.unwrap();
        assert_eq!(result.completed_story, "The end.");

        let sent = transport.last_request().unwrap();
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({
                "text": "Once upon a time there was a lighthouse.",
                "genre": "fantasy"
            }))
        );
    }

    #[tokio::test]
    async fn test_mindmap_image_returns_raw_bytes() {
        let png = vec![0x89, b'P', b'N', b'G'];
        let transport = FakeTransport::new();
        transport.respond_bytes(Method::Post, "/api/mindmap/image", 200, png.clone());

        let gateway = gateway_with(&transport, Some("t"));
        let bytes = gateway.mindmap_image("text", Some("Map"), None).await.unwrap();

        assert_eq!(bytes, png);
    }

    #[tokio::test]
    async fn test_upload_is_multipart_without_json_header() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/api/upload/extract",
            200,
            json!({"text": "Hello", "word_count": 1, "char_count": 5, "filename": "a.txt"}),
        );

        let gateway = gateway_with(&transport, Some("t"));
        let res = gateway
            .upload_extract(FilePart::new("a.txt", b"Hello".to_vec()))
            .await
            .unwrap();
        assert_eq!(res.word_count, 1);

        let sent = transport.last_request().unwrap();
        assert!(sent.header("Content-Type").is_none());
        assert_eq!(sent.header("Authorization"), Some("Bearer t"));
        assert!(matches!(sent.body, RequestBody::Multipart(ref f) if f.filename == "a.txt"));
    }

    #[tokio::test]
    async fn test_document_id_is_path_encoded() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/api/enhance/documents/a%2Fb",
            200,
            json!({"_id": "a/b", "title": "T", "content": "C", "created_at": ""}),
        );

        let gateway = gateway_with(&transport, Some("t"));
        let doc = gateway.get_document("a/b").await.unwrap();
        assert_eq!(doc.content.as_deref(), Some("C"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = FakeTransport::new();
        let gateway = ApiGateway::new(
            "http://localhost:5000/",
            transport,
            Arc::new(MemorySessionStore::new()),
        );
        assert_eq!(gateway.base_url(), "http://localhost:5000");
    }
}
