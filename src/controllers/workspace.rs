//! Workspace (dashboard) controller
//!
//! Persona enhancement, the four analysis kinds, file extraction and saving.

use std::sync::{Arc, Mutex};

use super::{extract_upload, lock, require_text, InFlight, Operation, PaidCall};
use crate::api::FilePart;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    CharacterResult, ConsistencyResult, EnhanceResult, PersonaCatalog, StructureResult,
    UploadResult,
};

/// Built-in personas as `(key, label)`, used until the backend catalog loads
pub const PERSONAS: [(&str, &str); 6] = [
    ("technical", "Technical"),
    ("business", "Business"),
    ("finance", "Finance"),
    ("simplified", "Simplified"),
    ("comedian", "Comedian"),
    ("poet", "Poet"),
];

pub const DEFAULT_PERSONA: &str = "simplified";

/// Analysis tabs of the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Consistency,
    Structure,
    Character,
    DeepScan,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Consistency,
        AnalysisKind::Structure,
        AnalysisKind::Character,
        AnalysisKind::DeepScan,
    ];

    pub fn operation(&self) -> Operation {
        match self {
            AnalysisKind::Consistency => Operation::ConsistencyCheck,
            AnalysisKind::Structure => Operation::StructureCheck,
            AnalysisKind::Character => Operation::CharacterEvolution,
            AnalysisKind::DeepScan => Operation::DeepScan,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Consistency => "Consistency",
            AnalysisKind::Structure => "Structure",
            AnalysisKind::Character => "Character",
            AnalysisKind::DeepScan => "Deep Scan",
        }
    }
}

/// Snapshot of the workspace page
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceState {
    pub text: String,
    pub title: String,
    pub persona: String,
    pub character_name: String,
    /// Set once the text is stored server-side
    pub doc_id: Option<String>,
    pub personas: PersonaCatalog,
    pub enhance: Option<EnhanceResult>,
    pub consistency: Option<ConsistencyResult>,
    pub structure: Option<StructureResult>,
    pub character: Option<CharacterResult>,
    pub combined_score: Option<f64>,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            text: String::new(),
            title: String::new(),
            persona: DEFAULT_PERSONA.to_string(),
            character_name: String::new(),
            doc_id: None,
            personas: PersonaCatalog::new(),
            enhance: None,
            consistency: None,
            structure: None,
            character: None,
            combined_score: None,
        }
    }
}

impl WorkspaceState {
    /// Persona choices as `(key, label)`, backend catalog first
    pub fn persona_options(&self) -> Vec<(String, String)> {
        if self.personas.is_empty() {
            return PERSONAS
                .iter()
                .map(|(k, l)| (k.to_string(), l.to_string()))
                .collect();
        }
        self.personas
            .iter()
            .map(|(k, info)| (k.clone(), info.label.clone()))
            .collect()
    }
}

pub struct WorkspaceController {
    auth: Arc<AuthSession>,
    state: Mutex<WorkspaceState>,
    inflight: InFlight,
}

impl WorkspaceController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            state: Mutex::new(WorkspaceState::default()),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> WorkspaceState {
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

    pub fn set_persona(&self, persona: impl Into<String>) {
        lock(&self.state).persona = persona.into();
    }

    pub fn set_character_name(&self, name: impl Into<String>) {
        lock(&self.state).character_name = name.into();
    }

    /// Fetch the persona catalog; the built-in list stays on failure
    pub async fn load_personas(&self) -> ClientResult<PersonaCatalog> {
        let catalog = self.auth.gateway().personas().await?;
        lock(&self.state).personas = catalog.clone();
        Ok(catalog)
    }

    pub async fn enhance(&self) -> ClientResult<EnhanceResult> {
        let (text, persona, title, doc_id) = {
            let s = lock(&self.state);
            (s.text.clone(), s.persona.clone(), s.title.clone(), s.doc_id.clone())
        };
        require_text(&text)?;
        let title = if title.is_empty() { "Untitled".to_string() } else { title };

        let call = PaidCall::begin(&self.auth, &self.inflight, Operation::PersonaEnhance)?;
        let result = self
            .auth
            .gateway()
            .enhance_persona(&text, &persona, Some(&title), doc_id.as_deref())
            .await;

        call.complete(result, |res| {
            let mut s = lock(&self.state);
            if res.doc_id.is_some() {
                s.doc_id = res.doc_id.clone();
            }
            s.enhance = Some(res.clone());
            res
        })
        .await
    }

    /// Run one analysis kind; deep scan fills both consistency and structure
    pub async fn analyze(&self, kind: AnalysisKind) -> ClientResult<()> {
        let (text, character_name, doc_id) = {
            let s = lock(&self.state);
            (s.text.clone(), s.character_name.clone(), s.doc_id.clone())
        };
        require_text(&text)?;
        if kind == AnalysisKind::Character && character_name.trim().is_empty() {
            return Err(ClientError::Validation("Enter a character name".to_string()));
        }

        let call = PaidCall::begin(&self.auth, &self.inflight, kind.operation())?;
        let gateway = self.auth.gateway();
        let doc_id = doc_id.as_deref();

        match kind {
            AnalysisKind::Consistency => {
                let result = gateway.analyze_consistency(&text, doc_id).await;
                call.complete(result, |res| {
                    lock(&self.state).consistency = Some(res.consistency_analysis);
                })
                .await
            }
            AnalysisKind::Structure => {
                let result = gateway.analyze_structure(&text, doc_id).await;
                call.complete(result, |res| {
                    lock(&self.state).structure = Some(res.structure_analysis);
                })
                .await
            }
            AnalysisKind::Character => {
                let result = gateway
                    .analyze_character(&text, character_name.trim(), doc_id)
                    .await;
                call.complete(result, |res| {
                    lock(&self.state).character = Some(res.character_evolution);
                })
                .await
            }
            AnalysisKind::DeepScan => {
                let result = gateway.deep_scan(&text, doc_id).await;
                call.complete(result, |res| {
                    let mut s = lock(&self.state);
                    s.consistency = Some(res.deep_scan.consistency);
                    s.structure = Some(res.deep_scan.structure);
                    s.combined_score = Some(res.deep_scan.combined_score);
                })
                .await
            }
        }
    }

    /// Replace the input with the enhanced text; false when nothing to apply
    pub fn apply_enhanced(&self) -> bool {
        let mut s = lock(&self.state);
        match s.enhance.as_ref().map(|r| r.enhanced_text.clone()) {
            Some(text) => {
                s.text = text;
                true
            }
            None => false,
        }
    }

    /// Load extracted file text into the editor as a new, unsaved document
    pub async fn upload(&self, file: FilePart) -> ClientResult<UploadResult> {
        let (res, title) = extract_upload(&self.auth, &self.inflight, file).await?;
        let mut s = lock(&self.state);
        s.text = res.text.clone();
        s.title = title;
        s.doc_id = None;
        Ok(res)
    }

    /// Save the current text as a document and remember its id
    pub async fn save(&self) -> ClientResult<String> {
        let (text, title) = {
            let s = lock(&self.state);
            (s.text.clone(), s.title.clone())
        };
        require_text(&text)?;
        let title = if title.trim().is_empty() { "Untitled".to_string() } else { title };

        let _flight = self.inflight.begin("Save")?;
        let doc_id = self.auth.gateway().save_document(&title, &text).await?;
        tracing::info!(doc_id = %doc_id, "Document saved");

        lock(&self.state).doc_id = Some(doc_id.clone());
        Ok(doc_id)
    }
}

/// Success text after an enhancement
pub fn enhanced_notice(res: &EnhanceResult) -> String {
    format!("Enhanced with {} persona", res.persona)
}

pub const ANALYSIS_COMPLETE: &str = "Analysis complete";
pub const APPLIED_NOTICE: &str = "Applied enhanced text";
pub const SAVED_NOTICE: &str = "Document saved";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, RequestBody};
    use crate::guard::Route;
    use crate::testing::{signed_in, user_json, FakeTransport};
    use serde_json::json;

    fn enhance_payload() -> serde_json::Value {
        json!({
            "enhanced_text": "The night was dark.",
            "changes": [{"original": "It was dark", "enhanced": "The night was dark", "reason": "clarity"}],
            "diff": [{"type": "delete", "text": "It was dark"}, {"type": "insert", "text": "The night was dark"}],
            "similarity_score": 72.5,
            "persona": "poet",
            "doc_id": "doc-9",
            "credits_used": 1
        })
    }

    fn consistency_payload(score: f64) -> serde_json::Value {
        json!({
            "issues": [{"type": "timeline", "description": "Day changes", "excerpt": "Monday", "severity": "high"}],
            "overall_consistency_score": score,
            "summary": "Mostly consistent"
        })
    }

    fn structure_payload() -> serde_json::Value {
        json!({
            "structure_score": 80, "clarity_score": 70, "flow_score": 60,
            "suggestions": [], "strengths": ["Pacing"], "overall_feedback": "Solid"
        })
    }

    #[tokio::test]
    async fn test_enhance_updates_result_and_refreshes_balance() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 5).await;
        transport.respond(Method::Post, "/api/enhance/persona", 200, enhance_payload());
        transport.respond(Method::Get, "/api/auth/me", 200, user_json(4));

        let ws = WorkspaceController::new(auth.clone());
        ws.set_text("It was dark.");
        ws.set_persona("poet");

        let res = ws.enhance().await.unwrap();

        assert_eq!(res.enhanced_text, "The night was dark.");
        assert_eq!(res.credits_used, 1);
        let state = ws.snapshot();
        assert_eq!(state.enhance, Some(res.clone()));
        assert_eq!(state.doc_id.as_deref(), Some("doc-9"));
        assert_eq!(enhanced_notice(&res), "Enhanced with poet persona");
        assert_eq!(transport.calls_to("/api/auth/me"), 2);
        assert_eq!(auth.credits(), 4);
        assert!(!ws.is_loading());

        let sent = transport
            .requests()
            .into_iter()
            .find(|r| r.url.ends_with("/api/enhance/persona"))
            .unwrap();
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({"text": "It was dark.", "persona": "poet", "title": "Untitled"}))
        );
    }

    #[tokio::test]
    async fn test_out_of_credits_redirects_without_network() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 0).await;
        let before = transport.request_count();

        let ws = WorkspaceController::new(auth);
        ws.set_text("Some text");
        ws.set_character_name("Mara");

        let err = ws.enhance().await.unwrap_err();
        assert_eq!(err.to_string(), "You're out of credits!");
        assert_eq!(err.redirect(), Some(Route::Credits));

        for kind in AnalysisKind::ALL {
            let err = ws.analyze(kind).await.unwrap_err();
            assert_eq!(err.redirect(), Some(Route::Credits));
        }
        assert_eq!(transport.request_count(), before);
    }

    #[tokio::test]
    async fn test_validation_happens_before_credit_check() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 0).await;
        let ws = WorkspaceController::new(auth);

        let err = ws.enhance().await.unwrap_err();
        assert_eq!(err, ClientError::Validation("Enter some text first".into()));

        ws.set_text("   ");
        assert!(matches!(
            ws.analyze(AnalysisKind::Structure).await,
            Err(ClientError::Validation(_))
        ));

        ws.set_text("Real text");
        let err = ws.analyze(AnalysisKind::Character).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a character name");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 5).await;
        transport.respond(
            Method::Post,
            "/api/analyze/consistency",
            200,
            json!({"consistency_analysis": consistency_payload(88.0), "credits_used": 1}),
        );

        let ws = WorkspaceController::new(auth);
        ws.set_text("Chapter one.");
        ws.analyze(AnalysisKind::Consistency).await.unwrap();

        transport.respond(
            Method::Post,
            "/api/analyze/consistency",
            500,
            json!({"error": "Model overloaded"}),
        );
        let err = ws.analyze(AnalysisKind::Consistency).await.unwrap_err();

        assert_eq!(err.to_string(), "Model overloaded");
        let kept = ws.snapshot().consistency.unwrap();
        assert_eq!(kept.overall_consistency_score, 88.0);
        assert!(!ws.is_loading());
    }

    #[tokio::test]
    async fn test_deep_scan_fills_both_panels() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 2).await;
        transport.respond(
            Method::Post,
            "/api/analyze/deep-scan",
            200,
            json!({"deep_scan": {
                "consistency": consistency_payload(90.0),
                "structure": structure_payload(),
                "combined_score": 85.0
            }, "credits_used": 2}),
        );

        let ws = WorkspaceController::new(auth);
        ws.set_text("A long tale.");
        ws.analyze(AnalysisKind::DeepScan).await.unwrap();

        let state = ws.snapshot();
        assert!(state.consistency.is_some());
        assert_eq!(state.structure.unwrap().overall_feedback, "Solid");
        assert_eq!(state.combined_score, Some(85.0));
    }

    #[tokio::test]
    async fn test_deep_scan_needs_two_credits() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 1).await;
        let ws = WorkspaceController::new(auth);
        ws.set_text("Text");

        let err = ws.analyze(AnalysisKind::DeepScan).await.unwrap_err();

        assert_eq!(err.to_string(), "You need at least 2 credits!");
        assert_eq!(transport.calls_to("/api/analyze/deep-scan"), 0);
    }

    #[tokio::test]
    async fn test_resubmission_while_pending_is_busy() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 5).await;
        transport.respond(
            Method::Post,
            "/api/analyze/structure",
            200,
            json!({"structure_analysis": structure_payload(), "credits_used": 1}),
        );
        let gate = transport.hold(Method::Post, "/api/analyze/structure");

        let ws = WorkspaceController::new(auth);
        ws.set_text("Text");

        let release = async {
            tokio::task::yield_now().await;
            assert!(ws.is_loading());
            let second = ws.analyze(AnalysisKind::Structure).await;
            gate.notify_one();
            second
        };
        let (first, second) = tokio::join!(ws.analyze(AnalysisKind::Structure), release);

        assert!(first.is_ok());
        assert_eq!(second, Err(ClientError::Busy("Structure Analysis".into())));
        assert_eq!(transport.calls_to("/api/analyze/structure"), 1);
        assert!(!ws.is_loading());
    }

    #[tokio::test]
    async fn test_upload_sets_text_and_title() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 0).await;
        transport.respond(
            Method::Post,
            "/api/upload/extract",
            200,
            json!({"text": "Once upon a time", "word_count": 4, "char_count": 16, "filename": "tale.md"}),
        );

        let ws = WorkspaceController::new(auth);
        let res = ws
            .upload(FilePart::new("my.tale.md", b"Once upon a time".to_vec()))
            .await
            .unwrap();

        let state = ws.snapshot();
        assert_eq!(state.text, "Once upon a time");
        assert_eq!(state.title, "my.tale");
        assert_eq!(super::super::extracted_notice(&res), "Extracted 4 words");
    }

    #[tokio::test]
    async fn test_upload_starts_a_new_document() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 5).await;
        transport.respond(Method::Post, "/api/enhance/persona", 200, enhance_payload());
        transport.respond(
            Method::Post,
            "/api/upload/extract",
            200,
            json!({"text": "A different book", "word_count": 3, "char_count": 16, "filename": "b.txt"}),
        );
        transport.respond(
            Method::Post,
            "/api/analyze/structure",
            200,
            json!({"structure_analysis": structure_payload(), "credits_used": 1}),
        );

        let ws = WorkspaceController::new(auth);
        ws.set_text("It was dark.");
        ws.enhance().await.unwrap();
        assert_eq!(ws.snapshot().doc_id.as_deref(), Some("doc-9"));

        ws.upload(FilePart::new("b.txt", b"A different book".to_vec()))
            .await
            .unwrap();
        assert!(ws.snapshot().doc_id.is_none());

        ws.analyze(AnalysisKind::Structure).await.unwrap();
        let sent = transport
            .requests()
            .into_iter()
            .rev()
            .find(|r| r.url.ends_with("/api/analyze/structure"))
            .unwrap();
        assert_eq!(sent.body, RequestBody::Json(json!({"text": "A different book"})));
    }

    #[tokio::test]
    async fn test_apply_enhanced_and_save() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 5).await;
        transport.respond(Method::Post, "/api/enhance/persona", 200, enhance_payload());
        transport.respond(Method::Post, "/api/enhance/save", 201, json!({"doc_id": "doc-10"}));

        let ws = WorkspaceController::new(auth);
        assert!(!ws.apply_enhanced());

        ws.set_text("It was dark.");
        ws.enhance().await.unwrap();
        assert!(ws.apply_enhanced());
        assert_eq!(ws.snapshot().text, "The night was dark.");

        let id = ws.save().await.unwrap();
        assert_eq!(id, "doc-10");
        assert_eq!(ws.snapshot().doc_id.as_deref(), Some("doc-10"));
    }

    #[test]
    fn test_persona_options_fall_back_to_builtins() {
        let state = WorkspaceState::default();
        let options = state.persona_options();
        assert_eq!(options.len(), 6);
        assert_eq!(state.persona, "simplified");
    }
}
