use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author placeholder when a comment header cannot be parsed.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";
/// Date placeholder when a comment header carries no usable date.
pub const UNKNOWN_DATE: &str = "Unknown date";
/// Placeholder for article metadata fields missing from the page.
pub const NOT_FOUND: &str = "Not found";

/// Minimum character count of a cleaned comment body.
pub const MIN_CONTENT_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    pub title: String,
    pub url: String,
    pub publication_date_raw: String,
    pub category: String,
    pub scrape_timestamp: DateTime<Utc>,
}

impl ArticleMetadata {
    /// Metadata with every field set to the "Not found" sentinel.
    pub fn not_found(url: &str) -> Self {
        Self {
            title: NOT_FOUND.to_string(),
            url: url.to_string(),
            publication_date_raw: NOT_FOUND.to_string(),
            category: NOT_FOUND.to_string(),
            scrape_timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Primary,
    Reply,
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentKind::Primary => write!(f, "primary"),
            CommentKind::Reply => write!(f, "reply"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub sequence_id: u32,
    pub author: String,
    pub publication_date_raw: String,
    pub content: String,
    pub content_length: usize,
    pub word_count: usize,
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub extraction_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
    #[serde(default)]
    pub reply_count: usize,
}

impl Comment {
    /// Builds a comment from already-cleaned content. Length and word count
    /// are derived here so they can never drift from `content`.
    pub fn new(
        sequence_id: u32,
        author: impl Into<String>,
        publication_date_raw: impl Into<String>,
        content: impl Into<String>,
        kind: CommentKind,
    ) -> Self {
        let content = content.into();
        Self {
            sequence_id,
            author: author.into(),
            publication_date_raw: publication_date_raw.into(),
            content_length: content.chars().count(),
            word_count: content.split_whitespace().count(),
            content,
            kind,
            extraction_timestamp: Utc::now(),
            replies: Vec::new(),
            reply_count: 0,
        }
    }

    pub fn with_replies(mut self, replies: Vec<Comment>) -> Self {
        self.reply_count = replies.len();
        self.replies = replies;
        self
    }

    pub fn is_reply(&self) -> bool {
        self.kind == CommentKind::Reply
    }

    /// Iterates over this comment followed by its replies.
    pub fn thread(&self) -> impl Iterator<Item = &Comment> {
        std::iter::once(self).chain(self.replies.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrapeStatus {
    Success,
    NoComments,
    NoValidComments,
    FetchError,
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::NoComments => "no comments found",
            ScrapeStatus::NoValidComments => "no valid comments",
            ScrapeStatus::FetchError => "fetch error",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_primary: usize,
    pub total_replies: usize,
    pub total_interventions: usize,
    pub status: ScrapeStatus,
}

impl Statistics {
    pub fn empty(status: ScrapeStatus) -> Self {
        Self {
            total_primary: 0,
            total_replies: 0,
            total_interventions: 0,
            status,
        }
    }

    pub fn from_comments(comments: &[Comment]) -> Self {
        let total_primary = comments.len();
        let total_replies = comments.iter().map(|c| c.reply_count).sum();
        let status = if total_primary > 0 {
            ScrapeStatus::Success
        } else {
            ScrapeStatus::NoValidComments
        };
        Self {
            total_primary,
            total_replies,
            total_interventions: total_primary + total_replies,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub url: String,
    pub metadata: Option<ArticleMetadata>,
    pub comments: Vec<Comment>,
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn fetch_error(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            metadata: None,
            comments: Vec::new(),
            statistics: Statistics::empty(ScrapeStatus::FetchError),
            error: Some(error.into()),
        }
    }

    pub fn no_comments(url: &str, metadata: ArticleMetadata) -> Self {
        Self {
            url: url.to_string(),
            metadata: Some(metadata),
            comments: Vec::new(),
            statistics: Statistics::empty(ScrapeStatus::NoComments),
            error: None,
        }
    }

    pub fn with_comments(url: &str, metadata: ArticleMetadata, comments: Vec<Comment>) -> Self {
        Self {
            url: url.to_string(),
            metadata: Some(metadata),
            statistics: Statistics::from_comments(&comments),
            comments,
            error: None,
        }
    }

    pub fn status(&self) -> ScrapeStatus {
        self.statistics.status
    }

    /// Every primary comment and reply in document order.
    pub fn all_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().flat_map(Comment::thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_counts_follow_content() {
        let comment = Comment::new(1, "Awa", "12 mai", "Très bonne   analyse du sujet", CommentKind::Primary);
        assert_eq!(comment.content_length, comment.content.chars().count());
        assert_eq!(comment.word_count, 5);
        assert_eq!(comment.reply_count, 0);
    }

    #[test]
    fn test_statistics_sum_replies() {
        let reply = Comment::new(1, "Paul", UNKNOWN_DATE, "Je suis d'accord avec vous", CommentKind::Reply);
        let comments = vec![
            Comment::new(1, "Awa", UNKNOWN_DATE, "Premier commentaire utile", CommentKind::Primary)
                .with_replies(vec![reply.clone(), reply]),
            Comment::new(2, ANONYMOUS_AUTHOR, UNKNOWN_DATE, "Second commentaire utile", CommentKind::Primary),
        ];

        let stats = Statistics::from_comments(&comments);
        assert_eq!(stats.total_primary, 2);
        assert_eq!(stats.total_replies, 2);
        assert_eq!(stats.total_interventions, 4);
        assert_eq!(stats.status, ScrapeStatus::Success);
    }

    #[test]
    fn test_statistics_without_comments() {
        let stats = Statistics::from_comments(&[]);
        assert_eq!(stats.status, ScrapeStatus::NoValidComments);
        assert_eq!(stats.total_interventions, 0);
    }

    #[test]
    fn test_fetch_error_has_no_metadata() {
        let result = ScrapeResult::fetch_error("https://example.com", "timeout");
        assert!(result.metadata.is_none());
        assert!(result.comments.is_empty());
        assert_eq!(result.status(), ScrapeStatus::FetchError);
    }

    #[test]
    fn test_all_comments_walks_threads() {
        let reply = Comment::new(1, "Paul", UNKNOWN_DATE, "Réponse au premier", CommentKind::Reply);
        let primary = Comment::new(1, "Awa", UNKNOWN_DATE, "Premier commentaire", CommentKind::Primary)
            .with_replies(vec![reply]);
        let result = ScrapeResult::with_comments(
            "https://example.com",
            ArticleMetadata::not_found("https://example.com"),
            vec![primary],
        );

        let kinds: Vec<_> = result.all_comments().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CommentKind::Primary, CommentKind::Reply]);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let comment = Comment::new(3, "Awa", "hier", "Un commentaire assez long", CommentKind::Reply);
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["type"], "reply");
        assert_eq!(json["sequenceId"], 3);
        assert!(json.get("replies").is_none());
    }
}
