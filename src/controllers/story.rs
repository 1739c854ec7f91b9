//! Story completion controller

use std::sync::{Arc, Mutex};

use super::{lock, InFlight, Operation, PaidCall};
use crate::api::StoryRequest;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::models::StoryResult;

pub const GENRES: [&str; 8] = [
    "general", "fantasy", "sci-fi", "romance", "thriller", "horror", "comedy", "drama",
];
pub const STYLES: [&str; 4] = ["narrative", "screenplay", "first-person", "third-person"];
pub const LENGTHS: [&str; 3] = ["short", "medium", "long"];

pub const DEFAULT_TITLE: &str = "My Story";
const MIN_PROMPT_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct StoryState {
    pub text: String,
    pub title: String,
    pub genre: String,
    pub style: String,
    pub length: String,
    pub result: Option<StoryResult>,
}

impl Default for StoryState {
    fn default() -> Self {
        Self {
            text: String::new(),
            title: String::new(),
            genre: GENRES[0].to_string(),
            style: STYLES[0].to_string(),
            length: LENGTHS[1].to_string(),
            result: None,
        }
    }
}

pub struct StoryController {
    auth: Arc<AuthSession>,
    state: Mutex<StoryState>,
    inflight: InFlight,
}

impl StoryController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            state: Mutex::new(StoryState::default()),
            inflight: InFlight::new(),
        }
    }

    pub fn snapshot(&self) -> StoryState {
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

    pub fn set_genre(&self, genre: &str) -> ClientResult<()> {
        lock(&self.state).genre = pick(&GENRES, genre, "genre")?;
        Ok(())
    }

    pub fn set_style(&self, style: &str) -> ClientResult<()> {
        lock(&self.state).style = pick(&STYLES, style, "style")?;
        Ok(())
    }

    pub fn set_length(&self, length: &str) -> ClientResult<()> {
        lock(&self.state).length = pick(&LENGTHS, length, "length")?;
        Ok(())
    }

    pub async fn complete(&self) -> ClientResult<StoryResult> {
        let s = self.snapshot();
        if s.text.trim().chars().count() < MIN_PROMPT_CHARS {
            return Err(ClientError::Validation(
                "Write at least a sentence to start".to_string(),
            ));
        }
        let title = if s.title.is_empty() { DEFAULT_TITLE } else { s.title.as_str() };

        let call = PaidCall::begin(&self.auth, &self.inflight, Operation::StoryComplete)?;
        let request = StoryRequest {
            text: &s.text,
            genre: Some(&s.genre),
            style: Some(&s.style),
            length: Some(&s.length),
            title: Some(title),
        };
        let result = self.auth.gateway().complete_story(&request).await;

        call.complete(result, |res| {
            lock(&self.state).result = Some(res.clone());
            res
        })
        .await
    }
}

fn pick(options: &[&str], value: &str, what: &str) -> ClientResult<String> {
    options
        .iter()
        .find(|o| **o == value)
        .map(|o| o.to_string())
        .ok_or_else(|| {
            ClientError::Validation(format!(
                "Unknown {} '{}' (expected one of: {})",
                what,
                value,
                options.join(", ")
            ))
        })
}

pub const COMPLETED_NOTICE: &str = "Story completed!";
