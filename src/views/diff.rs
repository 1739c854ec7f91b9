//! Word diff rendering

use crate::models::DiffSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// One styled run of diff text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSpan<'a> {
    pub kind: DiffKind,
    pub text: &'a str,
}

impl<'a> DiffSpan<'a> {
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            DiffKind::Unchanged => "",
            DiffKind::Inserted => "bg-success/20 text-success px-0.5 rounded",
            DiffKind::Deleted => "bg-destructive/20 text-destructive line-through px-0.5 rounded",
        }
    }
}

impl<'a> From<&'a DiffSegment> for DiffSpan<'a> {
    fn from(segment: &'a DiffSegment) -> Self {
        let kind = match segment {
            DiffSegment::Equal(_) => DiffKind::Unchanged,
            DiffSegment::Insert(_) => DiffKind::Inserted,
            DiffSegment::Delete(_) => DiffKind::Deleted,
        };
        DiffSpan {
            kind,
            text: segment.text(),
        }
    }
}

pub fn spans(diff: &[DiffSegment]) -> Vec<DiffSpan<'_>> {
    diff.iter().map(DiffSpan::from).collect()
}

/// Inline text form: `[-deleted-]` and `{+inserted+}`
pub fn render_text(diff: &[DiffSegment]) -> String {
    spans(diff)
        .iter()
        .map(|span| match span.kind {
            DiffKind::Unchanged => span.text.to_string(),
            DiffKind::Inserted => format!("{{+{}+}}", span.text),
            DiffKind::Deleted => format!("[-{}-]", span.text),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        let diff = vec![
            DiffSegment::Equal("The".into()),
            DiffSegment::Delete("dark".into()),
            DiffSegment::Insert("moonless".into()),
            DiffSegment::Equal("night".into()),
        ];

        assert_eq!(render_text(&diff), "The [-dark-] {+moonless+} night");
        assert_eq!(spans(&diff)[2].kind, DiffKind::Inserted);
        assert!(spans(&diff)[1].css_class().contains("line-through"));
    }
}
