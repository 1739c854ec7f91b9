//! Analysis panel
//!
//! One panel renders three unrelated result shapes; [`AnalysisView`] makes the
//! choice an exhaustive match instead of a runtime tag.

use std::fmt::Write;

use crate::models::{CharacterResult, ConsistencyResult, StructureResult};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisView {
    Consistency(ConsistencyResult),
    Structure(StructureResult),
    Character(CharacterResult),
}

/// Colour band of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTone {
    Good,
    Fair,
    Poor,
}

impl ScoreTone {
    pub fn of(score: f64) -> Self {
        if score >= 75.0 {
            ScoreTone::Good
        } else if score >= 50.0 {
            ScoreTone::Fair
        } else {
            ScoreTone::Poor
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreTone::Good => "text-success",
            ScoreTone::Fair => "text-primary",
            ScoreTone::Poor => "text-destructive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Anything other than `high` or `medium` counts as low
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::High => "bg-destructive",
            Severity::Medium => "bg-primary",
            Severity::Low => "bg-muted-foreground",
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Severity::High => "!!",
            Severity::Medium => "! ",
            Severity::Low => "- ",
        }
    }
}

/// Scores print without a trailing `.0` when whole
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{:.1}", score)
    }
}

impl AnalysisView {
    pub fn title(&self) -> String {
        match self {
            AnalysisView::Consistency(_) => "Consistency Analysis".to_string(),
            AnalysisView::Structure(_) => "Structure Analysis".to_string(),
            AnalysisView::Character(c) => format!("{}'s Evolution", c.character),
        }
    }

    /// `(label, score)` badges shown in the panel header
    pub fn scores(&self) -> Vec<(Option<&'static str>, f64)> {
        match self {
            AnalysisView::Consistency(c) => vec![(None, c.overall_consistency_score)],
            AnalysisView::Structure(s) => vec![
                (Some("Structure"), s.structure_score),
                (Some("Clarity"), s.clarity_score),
                (Some("Flow"), s.flow_score),
            ],
            AnalysisView::Character(_) => Vec::new(),
        }
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let badges: Vec<String> = self
            .scores()
            .into_iter()
            .map(|(label, score)| match label {
                Some(label) => format!("{}: {}", label, format_score(score)),
                None => format_score(score),
            })
            .collect();

        let _ = write!(out, "{}", self.title());
        if !badges.is_empty() {
            let _ = write!(out, " [{}]", badges.join(", "));
        }
        out.push('\n');

        match self {
            AnalysisView::Consistency(c) => {
                let _ = writeln!(out, "{}", c.summary);
                for issue in &c.issues {
                    let severity = Severity::parse(&issue.severity);
                    let marker = severity.marker();
                    let _ = writeln!(out, "{} {}: {}", marker, issue.kind, issue.description);
                    if !issue.excerpt.is_empty() {
                        let _ = writeln!(out, "     \"{}\"", issue.excerpt);
                    }
                }
            }
            AnalysisView::Structure(s) => {
                let _ = writeln!(out, "{}", s.overall_feedback);
                if !s.strengths.is_empty() {
                    out.push_str("Strengths:\n");
                    for strength in &s.strengths {
                        let _ = writeln!(out, "  + {}", strength);
                    }
                }
                if !s.suggestions.is_empty() {
                    out.push_str("Suggestions:\n");
                    for sug in &s.suggestions {
                        let severity = Severity::parse(&sug.priority);
                        let marker = severity.marker();
                        let _ = writeln!(out, "{} {}: {}", marker, sug.category, sug.issue);
                        let _ = writeln!(out, "     {}", sug.suggestion);
                    }
                }
            }
            AnalysisView::Character(c) => {
                if !c.arc_type.is_empty() {
                    let _ = writeln!(out, "Arc: {}", c.arc_type);
                }
                let _ = writeln!(out, "{}", c.overall_development);
                for stage in &c.evolution_stages {
                    let _ = writeln!(out, "{}. {}", stage.stage, stage.label);
                    let _ = writeln!(
                        out,
                        "   Emotion: {} / Trait: {}",
                        stage.emotional_state, stage.key_trait
                    );
                    let _ = writeln!(out, "   Trigger: {}", stage.trigger);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsistencyIssue, EvolutionStage};

    #[test]
    fn test_score_tone_bands() {
        assert_eq!(ScoreTone::of(75.0), ScoreTone::Good);
        assert_eq!(ScoreTone::of(74.9), ScoreTone::Fair);
        assert_eq!(ScoreTone::of(50.0), ScoreTone::Fair);
        assert_eq!(ScoreTone::of(12.0), ScoreTone::Poor);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("high"), Severity::High);
        assert_eq!(Severity::parse("Medium"), Severity::Medium);
        assert_eq!(Severity::parse("low"), Severity::Low);
        assert_eq!(Severity::parse(""), Severity::Low);
    }

    #[test]
    fn test_consistency_text() {
        let view = AnalysisView::Consistency(ConsistencyResult {
            issues: vec![ConsistencyIssue {
                kind: "timeline".into(),
                description: "Tuesday follows Thursday".into(),
                excerpt: "on Tuesday".into(),
                severity: "high".into(),
            }],
            overall_consistency_score: 62.0,
            summary: "Minor slips".into(),
        });

        let text = view.render_text();

        assert!(text.starts_with("Consistency Analysis [62]\n"));
        assert!(text.contains("!! timeline: Tuesday follows Thursday"));
        assert!(text.contains("\"on Tuesday\""));
    }

    #[test]
    fn test_character_title_and_stages() {
        let view = AnalysisView::Character(CharacterResult {
            character: "Mara".into(),
            evolution_stages: vec![EvolutionStage {
                stage: 1,
                label: "Reluctant".into(),
                emotional_state: "afraid".into(),
                key_trait: "caution".into(),
                trigger: "the storm".into(),
                excerpt: String::new(),
            }],
            arc_type: "positive".into(),
            overall_development: "Grows brave".into(),
        });

        assert_eq!(view.title(), "Mara's Evolution");
        assert!(view.scores().is_empty());
        assert!(view.render_text().contains("1. Reluctant"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(80.0), "80");
        assert_eq!(format_score(72.46), "72.5");
    }
}
