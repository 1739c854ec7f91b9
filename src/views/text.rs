//! Text helpers shared by the pages

use chrono::{DateTime, NaiveDateTime};

/// Whitespace-separated word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// First `max_chars` characters of `text`
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// File name without its final extension
pub fn title_from_filename(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() => filename[..idx].to_string(),
        _ => filename.to_string(),
    }
}

/// `"12 words · 64 characters"`
pub fn counts_line(text: &str) -> String {
    format!("{} words · {} characters", word_count(text), char_count(text))
}

fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

/// Calendar date of a backend timestamp; unparseable input is shown as is
pub fn format_date(ts: &str) -> String {
    parse_timestamp(ts)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn format_datetime(ts: &str) -> String {
    parse_timestamp(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        assert_eq!(word_count("  one two\nthree "), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(char_count("héllo"), 5);
        assert_eq!(counts_line("a b"), "2 words · 3 characters");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("ééé", 2), "éé");
        assert_eq!(excerpt("short", 200), "short");
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("chapter-1.pdf"), "chapter-1");
        assert_eq!(title_from_filename("notes.v2.md"), "notes.v2");
        assert_eq!(title_from_filename("README"), "README");
        assert_eq!(title_from_filename("odd."), "odd.");
    }

    #[test]
    fn test_format_timestamps() {
        assert_eq!(format_date("2024-05-01T10:30:00Z"), "2024-05-01");
        assert_eq!(format_datetime("2024-05-01T10:30:00.123456"), "2024-05-01 10:30");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
