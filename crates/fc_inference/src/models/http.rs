use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fc_core::{Error, Result, Sentiment, SentimentLabel, SentimentModel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    label: String,
    score: f32,
}

/// Classifier served over HTTP: POSTs `{"text": ...}` and reads
/// `{"label": ..., "score": ...}` back.
pub struct HttpSentimentModel {
    client: Arc<Client>,
    endpoint: Url,
}

impl HttpSentimentModel {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::Inference(format!("Invalid sentiment endpoint {}: {}", endpoint, e)))?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client: Arc::new(client),
            endpoint,
        })
    }
}

impl fmt::Debug for HttpSentimentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSentimentModel")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[async_trait]
impl SentimentModel for HttpSentimentModel {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ClassifyRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json::<ClassifyResponse>()
            .await?;

        if !(0.0..=1.0).contains(&response.score) {
            return Err(Error::Inference(format!("Score out of range: {}", response.score)));
        }

        Ok(Sentiment {
            label: SentimentLabel::from_raw(&response.label),
            score: response.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_classify_maps_remote_label() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/classify")
            .match_body(Matcher::Json(serde_json::json!({"text": "super article"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"label": "POSITIF", "score": 0.93}"#)
            .create_async()
            .await;

        let model = HttpSentimentModel::new(&format!("{}/classify", server.url())).unwrap();
        let sentiment = model.classify("super article").await.unwrap();

        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert!((sentiment.score - 0.93).abs() < 1e-6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_classify_errors() {
        let mut server = mockito::Server::new_async().await;
        let _down = server
            .mock("POST", "/down")
            .with_status(503)
            .create_async()
            .await;
        let _bad = server
            .mock("POST", "/bad")
            .with_status(200)
            .with_body(r#"{"label": "NEG", "score": 7.0}"#)
            .create_async()
            .await;

        let down = HttpSentimentModel::new(&format!("{}/down", server.url())).unwrap();
        assert!(matches!(down.classify("x").await, Err(Error::Http(_))));

        let bad = HttpSentimentModel::new(&format!("{}/bad", server.url())).unwrap();
        assert!(matches!(bad.classify("x").await, Err(Error::Inference(_))));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(HttpSentimentModel::new("not a url"), Err(Error::Inference(_))));
    }
}
