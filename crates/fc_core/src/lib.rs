pub mod error;
pub mod models;
pub mod types;

pub use error::Error;
pub use models::{Sentiment, SentimentLabel, SentimentModel};
pub use types::{
    ArticleMetadata, Comment, CommentKind, ScrapeResult, ScrapeStatus, Statistics,
    ANONYMOUS_AUTHOR, MIN_CONTENT_LENGTH, NOT_FOUND, UNKNOWN_DATE,
};

pub type Result<T> = std::result::Result<T, Error>;
