use fc_core::{ANONYMOUS_AUTHOR, UNKNOWN_DATE};
use lazy_static::lazy_static;
use regex::Regex;

/// Author and raw date as printed above a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentHeader {
    pub author: String,
    pub date: String,
}

impl CommentHeader {
    pub fn new(author: &str, date: &str) -> Self {
        let author = author.trim();
        let date = date.trim();
        Self {
            author: if author.is_empty() { ANONYMOUS_AUTHOR } else { author }.to_string(),
            date: if date.is_empty() { UNKNOWN_DATE } else { date }.to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self::new("", "")
    }
}

struct HeaderPattern {
    regex: Regex,
    author_group: usize,
    date_group: usize,
}

impl HeaderPattern {
    fn new(pattern: &str, author_group: usize, date_group: usize) -> Self {
        Self {
            regex: Regex::new(pattern).expect("valid header regex"),
            author_group,
            date_group,
        }
    }

    fn apply(&self, text: &str) -> Option<CommentHeader> {
        let captures = self.regex.captures(text)?;
        let author = captures.get(self.author_group)?.as_str();
        let date = captures.get(self.date_group)?.as_str();
        Some(CommentHeader::new(author, date))
    }
}

lazy_static! {
    /// Tried in order against the whole header text; first match wins.
    static ref HEADER_PATTERNS: Vec<HeaderPattern> = vec![
        // "par Awa, 12 mai 2024" / "by Awa, 12 May 2024"
        HeaderPattern::new(r"\b(?:par|by)\s+([^,]+),\s*(.+)", 1, 2),
        // "De Awa, 12 mai 2024" / "From Awa, ..."
        HeaderPattern::new(r"\b(?:De|From|from)\s+([^,]+),\s*(.+)", 1, 2),
        // "Posté par Awa, 12 mai 2024"
        HeaderPattern::new(r"(?:Posté par|Posted by|posted by)\s+([^,]+),\s*(.+)", 1, 2),
        // "Awa - 12 mai 2024"
        HeaderPattern::new(r"(\w+)\s+-\s*(.+)", 1, 2),
    ];
}

const FALLBACK_MARKERS: [&str; 2] = ["par", "by"];

/// Splits once on the first marker present, then once on the first comma.
fn split_on_marker(text: &str) -> Option<CommentHeader> {
    if !text.contains(',') {
        return None;
    }
    let marker = FALLBACK_MARKERS.into_iter().find(|m| text.contains(m))?;
    let (_, rest) = text.split_once(marker)?;
    let mut parts = rest.splitn(2, ',');
    let author = parts.next().unwrap_or_default();
    let date = parts.next().unwrap_or_default();
    Some(CommentHeader::new(author, date))
}

/// Extracts author and date from a comment header such as
/// `"par Jean Dupont, 12 mai 2024 à 10:15"`. Unparseable headers give the
/// `("Anonymous", "Unknown date")` pair.
pub fn parse_header(text: &str) -> CommentHeader {
    HEADER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.apply(text))
        .or_else(|| split_on_marker(text))
        .unwrap_or_else(CommentHeader::unknown)
}
