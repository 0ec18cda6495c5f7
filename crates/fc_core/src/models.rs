use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Maps the label vocabulary of common classifiers (English, French,
    /// abbreviated, star ratings) onto the three labels.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "pos" | "positif" | "label_2" | "4 stars" | "5 stars" => SentimentLabel::Positive,
            "negative" | "neg" | "negatif" | "négatif" | "label_0" | "1 star" | "2 stars" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
            SentimentLabel::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Classifier output: a label and its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f32,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.5,
        }
    }

    /// Projects the label/confidence pair onto `[-1, 1]`.
    pub fn signed_score(&self) -> f32 {
        match self.label {
            SentimentLabel::Positive => self.score,
            SentimentLabel::Negative => -self.score,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

#[async_trait]
pub trait SentimentModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Classify one piece of cleaned comment text
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(SentimentLabel::from_raw("POSITIF"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_raw("neg"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_raw("NEU"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_raw("something else"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_signed_score() {
        let positive = Sentiment { label: SentimentLabel::Positive, score: 0.8 };
        let negative = Sentiment { label: SentimentLabel::Negative, score: 0.6 };
        assert_eq!(positive.signed_score(), 0.8);
        assert_eq!(negative.signed_score(), -0.6);
        assert_eq!(Sentiment::neutral().signed_score(), 0.0);
    }
}
