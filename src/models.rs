//! Backend Data Model
//!
//! Typed shapes for every payload the NarrativeIQ backend returns. These are
//! a fixed contract with the server: field names follow the wire format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub credits: u32,
}

/// Persisted narrative text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    /// Present when a single document is fetched
    #[serde(default)]
    pub content: Option<String>,
    /// Present in list responses
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Append-only record of a past operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub operation: String,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub output_text: String,
    #[serde(default)]
    pub credits_used: u32,
    #[serde(default)]
    pub created_at: String,
}

// ============ Enhancement ============

/// Result of a persona rewrite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceResult {
    pub enhanced_text: String,
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub diff: Vec<DiffSegment>,
    #[serde(default)]
    pub similarity_score: f64,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub credits_used: u32,
}

/// One highlighted rewrite with its reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub original: String,
    pub enhanced: String,
    #[serde(default)]
    pub reason: String,
}

/// Word-level diff segment between the input and the rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum DiffSegment {
    Equal(String),
    Insert(String),
    Delete(String),
}

impl DiffSegment {
    pub fn text(&self) -> &str {
        match self {
            DiffSegment::Equal(t) | DiffSegment::Insert(t) | DiffSegment::Delete(t) => t,
        }
    }
}

// ============ Analysis ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    #[serde(default)]
    pub issues: Vec<ConsistencyIssue>,
    #[serde(default)]
    pub overall_consistency_score: f64,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureResult {
    #[serde(default)]
    pub structure_score: f64,
    #[serde(default)]
    pub clarity_score: f64,
    #[serde(default)]
    pub flow_score: f64,
    #[serde(default)]
    pub suggestions: Vec<StructureSuggestion>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub overall_feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureSuggestion {
    pub category: String,
    pub issue: String,
    pub suggestion: String,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterResult {
    pub character: String,
    #[serde(default)]
    pub evolution_stages: Vec<EvolutionStage>,
    #[serde(default)]
    pub arc_type: String,
    #[serde(default)]
    pub overall_development: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub stage: u32,
    pub label: String,
    #[serde(default)]
    pub emotional_state: String,
    #[serde(default)]
    pub key_trait: String,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub excerpt: String,
}

/// Combined consistency and structure sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepScanResult {
    pub consistency: ConsistencyResult,
    pub structure: StructureResult,
    #[serde(default)]
    pub combined_score: f64,
}

// ============ Mindmap ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapResult {
    #[serde(default)]
    pub nodes: Vec<MindmapNode>,
    #[serde(default)]
    pub edges: Vec<MindmapEdge>,
    /// Free-form entity buckets; shape is owned by the backend
    #[serde(default)]
    pub entities: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub summary: MindmapSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapNode {
    pub id: String,
    pub data: NodeData,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindmapSummary {
    #[serde(default)]
    pub character_count: u32,
    #[serde(default)]
    pub location_count: u32,
    #[serde(default)]
    pub theme_count: u32,
    #[serde(default)]
    pub relationship_count: u32,
}

// ============ Story ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryResult {
    pub completed_story: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub genre_detected: String,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub story_structure: Option<StoryStructure>,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub credits_used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryStructure {
    #[serde(default)]
    pub setup: String,
    #[serde(default)]
    pub conflict: String,
    #[serde(default)]
    pub climax: String,
    #[serde(default)]
    pub resolution: String,
}

impl StoryStructure {
    /// Acts in narrative order, labelled for display
    pub fn acts(&self) -> [(&'static str, &str); 4] {
        [
            ("setup", self.setup.as_str()),
            ("conflict", self.conflict.as_str()),
            ("climax", self.climax.as_str()),
            ("resolution", self.resolution.as_str()),
        ]
    }
}

// ============ Credits, personas, upload ============

/// Persona description keyed by persona name in the persona list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaInfo {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// Map of persona key to its description
pub type PersonaCatalog = BTreeMap<String, PersonaInfo>;

/// One row of the pricing table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingFeature {
    pub cost: u32,
    #[serde(default)]
    pub label: String,
}

/// Text extracted from an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub text: String,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub char_count: u32,
    #[serde(default)]
    pub filename: String,
}
