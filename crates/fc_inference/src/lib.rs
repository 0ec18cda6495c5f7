pub mod analytics;
pub mod models;

pub use analytics::{
    advanced_stats, engagement_rate, sentiment_trend, top_authors, word_frequency, AdvancedStats,
    SentimentAnalyzer, SentimentSummary, Trend,
};
pub use models::create_model;

pub mod prelude {
    pub use super::analytics::SentimentAnalyzer;
    pub use super::models::create_model;
    pub use fc_core::{Error, Result, Sentiment, SentimentLabel, SentimentModel};
}
