use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use fc_core::{Comment, Sentiment, SentimentLabel, SentimentModel};
use serde::Serialize;
use tracing::{debug, warn};

pub mod text;

pub use text::{clean_for_analysis, keywords};

/// Longest input handed to a sentiment model.
pub const MAX_MODEL_INPUT_CHARS: usize = 512;
/// Points by which one side must lead for the trend to leave neutral.
const TREND_MARGIN: f64 = 10.0;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn threads(comments: &[Comment]) -> impl Iterator<Item = &Comment> {
    comments.iter().flat_map(Comment::thread)
}

/// Counts sorted by decreasing frequency, ties in alphabetical order.
fn ranked(counts: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    /// Mean signed score mapped from `[-1, 1]` onto `[0, 100]`.
    pub mean: f64,
    pub total: usize,
}

impl SentimentSummary {
    pub fn empty() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 100.0,
            mean: 50.0,
            total: 0,
        }
    }

    fn from_sentiments(sentiments: &[Sentiment]) -> Self {
        if sentiments.is_empty() {
            return Self::empty();
        }

        let total = sentiments.len();
        let share = |label: SentimentLabel| {
            let count = sentiments.iter().filter(|s| s.label == label).count();
            round1(count as f64 / total as f64 * 100.0)
        };
        let mean_score = sentiments.iter().map(|s| s.signed_score() as f64).sum::<f64>() / total as f64;

        Self {
            positive: share(SentimentLabel::Positive),
            negative: share(SentimentLabel::Negative),
            neutral: share(SentimentLabel::Neutral),
            mean: round1((mean_score + 1.0) / 2.0 * 100.0),
            total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Positive => write!(f, "Positive"),
            Trend::Negative => write!(f, "Negative"),
            Trend::Neutral => write!(f, "Neutral"),
        }
    }
}

pub fn sentiment_trend(summary: &SentimentSummary) -> Trend {
    if summary.positive > summary.negative + TREND_MARGIN {
        Trend::Positive
    } else if summary.negative > summary.positive + TREND_MARGIN {
        Trend::Negative
    } else {
        Trend::Neutral
    }
}

pub struct SentimentAnalyzer {
    model: Arc<dyn SentimentModel>,
}

impl fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAnalyzer")
            .field("model", &self.model.name())
            .finish()
    }
}

impl SentimentAnalyzer {
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self { model }
    }

    /// Classifies one comment body. Never fails: empty text and model errors
    /// both give a neutral 0.5.
    pub async fn classify(&self, content: &str) -> Sentiment {
        let cleaned = clean_for_analysis(content);
        if cleaned.is_empty() {
            return Sentiment::neutral();
        }

        let input = text::truncate_chars(&cleaned, MAX_MODEL_INPUT_CHARS);
        match self.model.classify(input).await {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!("{} classification failed: {}", self.model.name(), e);
                Sentiment::neutral()
            }
        }
    }

    /// Sentiment distribution over every comment and reply.
    pub async fn summarize(&self, comments: &[Comment]) -> SentimentSummary {
        let mut sentiments = Vec::new();
        for comment in threads(comments) {
            let sentiment = self.classify(&comment.content).await;
            debug!("{} #{}: {}", comment.kind, comment.sequence_id, sentiment.label);
            sentiments.push(sentiment);
        }
        SentimentSummary::from_sentiments(&sentiments)
    }
}

/// Most frequent content words across comments and replies.
pub fn word_frequency(comments: &[Comment], limit: usize) -> Vec<(String, usize)> {
    let mut counts = HashMap::new();
    for comment in threads(comments) {
        for word in keywords(&comment.content) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    ranked(counts, limit)
}

pub fn top_authors(comments: &[Comment], limit: usize) -> Vec<(String, usize)> {
    let mut counts = HashMap::new();
    for comment in threads(comments) {
        *counts.entry(comment.author.clone()).or_insert(0) += 1;
    }
    ranked(counts, limit)
}

/// Composite score in `[0, 100]`: 40% from average length (saturating at
/// 100 chars), 60% from replies per primary comment (saturating at 1).
pub fn engagement_rate(comments: &[Comment]) -> f64 {
    let lengths: Vec<usize> = threads(comments).map(|c| c.content_length).collect();
    if lengths.is_empty() {
        return 0.0;
    }

    let average_length = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
    let primaries = comments.len();
    let replies: usize = comments.iter().map(|c| c.reply_count).sum();

    let length_factor = (average_length / 100.0).min(1.0);
    let response_factor = (replies as f64 / primaries.max(1) as f64).min(1.0);
    round1(((length_factor * 0.4 + response_factor * 0.6) * 100.0).min(100.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedStats {
    pub average_length: f64,
    pub active_authors: usize,
    pub main_author: String,
    /// Distinct authors per intervention.
    pub author_diversity: f64,
}

pub fn advanced_stats(comments: &[Comment]) -> Option<AdvancedStats> {
    let total = threads(comments).count();
    if total == 0 {
        return None;
    }

    let authors = top_authors(comments, usize::MAX);
    let total_length: usize = threads(comments).map(|c| c.content_length).sum();

    Some(AdvancedStats {
        average_length: round1(total_length as f64 / total as f64),
        active_authors: authors.len(),
        main_author: authors.first().map(|(name, _)| name.clone()).unwrap_or_default(),
        author_diversity: authors.len() as f64 / total as f64,
    })
}
