use std::sync::Arc;

use fc_core::{Error, Result, SentimentModel};

pub mod http;
pub mod lexicon;

pub use http::HttpSentimentModel;
pub use lexicon::LexiconModel;

pub const AVAILABLE_MODELS: [&str; 2] = ["lexicon", "http"];

/// Builds the named sentiment model. `http` needs an endpoint.
pub fn create_model(name: &str, endpoint: Option<&str>) -> Result<Arc<dyn SentimentModel>> {
    match name.to_lowercase().as_str() {
        "lexicon" => Ok(Arc::new(LexiconModel::new())),
        "http" => {
            let endpoint = endpoint
                .ok_or_else(|| Error::Inference("The http model requires an endpoint".to_string()))?;
            Ok(Arc::new(HttpSentimentModel::new(endpoint)?))
        }
        other => Err(Error::Inference(format!(
            "Unknown model '{}'. Available models: {}",
            other,
            AVAILABLE_MODELS.join(", ")
        ))),
    }
}
