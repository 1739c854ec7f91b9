//! Page Controllers
//!
//! Each controller owns one page's view state and talks to the backend
//! through the shared [`AuthSession`]. Paid operations all run through
//! [`PaidCall`]:
//!
//! 1. validate input locally
//! 2. pre-check the cached balance against the operation's cost
//! 3. mark the action in flight (re-entrant submissions get `Busy`)
//! 4. issue exactly one gateway call
//! 5. on success store the result, release the action, then refresh the user
//! 6. on failure keep earlier results untouched
//!
//! The balance check is only a hint; the backend is authoritative.

pub mod auth_form;
pub mod credits;
pub mod documents;
pub mod history;
pub mod inflight;
pub mod mindmap;
pub mod profile;
pub mod story;
pub mod workspace;

pub use auth_form::{AuthFormController, AuthFormState, AuthMode};
pub use credits::{CreditPack, CreditsController, CREDIT_PACKS};
pub use documents::{DocumentsController, DocumentsState};
pub use history::{HistoryController, HistoryState};
pub use inflight::{InFlight, InFlightGuard};
pub use mindmap::{MindmapController, MindmapState};
pub use profile::{ProfileController, ProfileState};
pub use story::{StoryController, StoryState};
pub use workspace::{AnalysisKind, WorkspaceController, WorkspaceState, PERSONAS};

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::FilePart;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::models::UploadResult;
use crate::views::text::title_from_filename;

/// Credit-consuming backend operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PersonaEnhance,
    ConsistencyCheck,
    StructureCheck,
    CharacterEvolution,
    DeepScan,
    MindmapGenerate,
    MindmapImage,
    StoryComplete,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::PersonaEnhance,
        Operation::ConsistencyCheck,
        Operation::StructureCheck,
        Operation::CharacterEvolution,
        Operation::DeepScan,
        Operation::MindmapGenerate,
        Operation::MindmapImage,
        Operation::StoryComplete,
    ];

    /// Fixed price in credits
    pub fn cost(&self) -> u32 {
        match self {
            Operation::PersonaEnhance
            | Operation::ConsistencyCheck
            | Operation::StructureCheck
            | Operation::CharacterEvolution => 1,
            Operation::DeepScan
            | Operation::MindmapGenerate
            | Operation::MindmapImage
            | Operation::StoryComplete => 2,
        }
    }

    /// Key the backend records in history entries
    pub fn history_key(&self) -> &'static str {
        match self {
            Operation::PersonaEnhance => "persona_enhance",
            Operation::ConsistencyCheck => "consistency_check",
            Operation::StructureCheck => "structure_check",
            Operation::CharacterEvolution => "character_evolution",
            Operation::DeepScan => "deep_scan",
            Operation::MindmapGenerate => "mindmap_generate",
            Operation::MindmapImage => "mindmap_image",
            Operation::StoryComplete => "story_complete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::PersonaEnhance => "Persona Enhancement",
            Operation::ConsistencyCheck => "Consistency Check",
            Operation::StructureCheck => "Structure Analysis",
            Operation::CharacterEvolution => "Character Evolution",
            Operation::DeepScan => "Deep Scan",
            Operation::MindmapGenerate => "Mindmap",
            Operation::MindmapImage => "Mindmap Image",
            Operation::StoryComplete => "Story Completion",
        }
    }

    pub fn from_history_key(key: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.history_key() == key)
    }
}

/// Reject locally when the cached balance cannot cover `op`
pub fn ensure_credits(auth: &AuthSession, op: Operation) -> ClientResult<()> {
    let available = auth.credits();
    if available < op.cost() {
        tracing::info!(
            operation = op.history_key(),
            available,
            required = op.cost(),
            "Insufficient credits"
        );
        return Err(ClientError::InsufficientCredits {
            required: op.cost(),
            available,
        });
    }
    Ok(())
}

/// A paid operation that passed its local checks and is now in flight
pub struct PaidCall<'a> {
    auth: &'a AuthSession,
    op: Operation,
    flight: InFlightGuard,
}

impl<'a> PaidCall<'a> {
    /// Credit pre-check plus in-flight registration
    pub fn begin(auth: &'a AuthSession, inflight: &InFlight, op: Operation) -> ClientResult<Self> {
        ensure_credits(auth, op)?;
        let flight = inflight.begin(op.label())?;
        Ok(Self { auth, op, flight })
    }

    /// Settle the call: store a success, then re-sync the balance
    pub async fn complete<T, R>(
        self,
        result: ClientResult<T>,
        apply: impl FnOnce(T) -> R,
    ) -> ClientResult<R> {
        let PaidCall { auth, op, flight } = self;

        let value = match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(operation = op.history_key(), "Operation failed: {}", e);
                return Err(e);
            }
        };

        let out = apply(value);
        drop(flight);

        tracing::info!(operation = op.history_key(), cost = op.cost(), "Operation complete");
        auth.refresh_user().await;
        Ok(out)
    }
}

/// Lock a controller's state, recovering from a poisoned lock
pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Upload a file for text extraction
///
/// Returns the extraction plus a document title taken from the file name.
pub(crate) async fn extract_upload(
    auth: &AuthSession,
    inflight: &InFlight,
    file: FilePart,
) -> ClientResult<(UploadResult, String)> {
    let _flight = inflight.begin("Upload")?;
    let title = title_from_filename(&file.filename);
    let res = auth.gateway().upload_extract(file).await?;
    tracing::info!(words = res.word_count, "Extracted text from upload");
    Ok((res, title))
}

/// Success text after a file extraction
pub fn extracted_notice(res: &UploadResult) -> String {
    format!("Extracted {} words", res.word_count)
}

/// Error text for a failed upload that carried no message
pub const UPLOAD_FAILED: &str = "Upload failed";

pub(crate) fn require_text(text: &str) -> ClientResult<()> {
    if text.trim().is_empty() {
        return Err(ClientError::Validation("Enter some text first".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signed_in, FakeTransport};

    #[test]
    fn test_operation_costs() {
        let costs: Vec<u32> = Operation::ALL.iter().map(Operation::cost).collect();
        assert_eq!(costs, vec![1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_history_keys_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_history_key(op.history_key()), Some(op));
        }
        assert_eq!(Operation::from_history_key("mystery"), None);
    }

    #[tokio::test]
    async fn test_ensure_credits() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 1).await;

        assert!(ensure_credits(&auth, Operation::ConsistencyCheck).is_ok());

        let err = ensure_credits(&auth, Operation::DeepScan).unwrap_err();
        assert_eq!(err.to_string(), "You need at least 2 credits!");
        assert_eq!(err.redirect(), Some(crate::guard::Route::Credits));
    }

    #[tokio::test]
    async fn test_failed_call_skips_refresh() {
        let transport = FakeTransport::new();
        let auth = signed_in(&transport, 5).await;
        let inflight = InFlight::new();

        let call = PaidCall::begin(&auth, &inflight, Operation::StoryComplete).unwrap();
        assert!(inflight.any());

        let result: ClientResult<u32> = call
            .complete(Err(ClientError::from_status(500, None)), |v: u32| v)
            .await;

        assert!(result.is_err());
        assert!(!inflight.any());
        assert_eq!(transport.calls_to("/api/auth/me"), 1);
    }
}
