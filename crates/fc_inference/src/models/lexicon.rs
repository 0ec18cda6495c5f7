use std::collections::HashSet;
use std::fmt;

use fc_core::{Result, Sentiment, SentimentLabel, SentimentModel};
use lazy_static::lazy_static;

lazy_static! {
    static ref POSITIVE_WORDS: HashSet<&'static str> = [
        "bon", "bonne", "bien", "bravo", "merci", "excellent", "excellente", "super", "génial",
        "parfait", "heureux", "heureuse", "félicitations", "courage", "espoir", "progrès",
        "réussite", "succès", "beau", "belle", "magnifique", "utile", "juste", "fier", "fière",
        "good", "great", "excellent", "thanks", "thank", "happy", "hope", "success", "love",
        "nice", "useful", "fair", "proud", "well", "best", "better",
    ]
    .into_iter()
    .collect();
    static ref NEGATIVE_WORDS: HashSet<&'static str> = [
        "mauvais", "mauvaise", "mal", "honte", "honteux", "triste", "nul", "nulle", "pire",
        "échec", "corruption", "colère", "peur", "injuste", "inutile", "scandale", "grave",
        "catastrophe", "mensonge", "menteur", "problème", "danger", "misère", "pauvre",
        "bad", "worse", "worst", "shame", "sad", "fail", "failure", "angry", "fear", "unfair",
        "useless", "scandal", "lie", "lies", "problem", "poor", "terrible", "awful",
    ]
    .into_iter()
    .collect();
}

/// Word-list classifier covering French and English. Needs no network.
pub struct LexiconModel;

impl fmt::Debug for LexiconModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconModel").finish()
    }
}

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "Lexicon"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let lowered = text.to_lowercase();
        let words = lowered.split(|c: char| !c.is_alphanumeric());

        let (mut positive, mut negative) = (0usize, 0usize);
        for word in words.filter(|w| !w.is_empty()) {
            if POSITIVE_WORDS.contains(word) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(word) {
                negative += 1;
            }
        }

        let hits = positive + negative;
        if hits == 0 || positive == negative {
            return Ok(Sentiment::neutral());
        }

        let margin = positive.abs_diff(negative) as f32 / hits as f32;
        let label = if positive > negative {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };
        Ok(Sentiment {
            label,
            score: 0.5 + 0.5 * margin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lexicon_model() {
        let model = LexiconModel::new();

        let positive = model.classify("Bravo, excellent travail, merci !").await.unwrap();
        assert_eq!(positive.label, SentimentLabel::Positive);
        assert_eq!(positive.score, 1.0);

        let negative = model.classify("Quelle honte, un vrai scandale. Merci quand même").await.unwrap();
        assert_eq!(negative.label, SentimentLabel::Negative);
        assert!(negative.score > 0.5 && negative.score < 1.0);

        let neutral = model.classify("Le conseil se réunit mardi").await.unwrap();
        assert_eq!(neutral, Sentiment::neutral());

        let balanced = model.classify("good but bad").await.unwrap();
        assert_eq!(balanced.label, SentimentLabel::Neutral);
    }
}
