//! Request and Response DTOs
//!
//! Envelope shapes for the backend endpoints. Result payloads themselves live
//! in [`crate::models`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    CharacterResult, ConsistencyResult, DeepScanResult, Document, HistoryEntry, MindmapResult,
    PricingFeature, StructureResult, User,
};

// ============ Requests ============

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Partial profile update; absent fields are left unchanged server-side
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddCreditsRequest {
    pub amount: u32,
}

#[derive(Debug, Serialize)]
pub struct EnhanceRequest<'a> {
    pub text: &'a str,
    pub persona: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<&'a str>,
}

/// Body shared by consistency, structure, deep scan and mindmap data
#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CharacterRequest<'a> {
    pub text: &'a str,
    pub character_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct MindmapImageRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<&'a str>,
}

#[derive(Debug, Default, Serialize)]
pub struct StoryRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SaveDocumentRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

// ============ Responses ============

/// Login and registration both return a fresh token and the identity
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub credits: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingResponse {
    #[serde(default)]
    pub features: BTreeMap<String, PricingFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCreditsResponse {
    #[serde(default)]
    pub message: String,
    pub new_balance: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsistencyResponse {
    pub consistency_analysis: ConsistencyResult,
    #[serde(default)]
    pub credits_used: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureResponse {
    pub structure_analysis: StructureResult,
    #[serde(default)]
    pub credits_used: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterResponse {
    pub character_evolution: CharacterResult,
    #[serde(default)]
    pub credits_used: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepScanResponse {
    pub deep_scan: DeepScanResult,
    #[serde(default)]
    pub credits_used: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MindmapResponse {
    pub mindmap: MindmapResult,
    #[serde(default)]
    pub credits_used: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveDocumentResponse {
    pub doc_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}
