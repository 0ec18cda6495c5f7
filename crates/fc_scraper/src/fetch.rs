use fc_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use tracing::debug;

use crate::config::ScraperConfig;

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::Fetch(format!("Invalid {} header: {}", name, e)))
}

/// HTTP client presenting a browser-like request signature.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value("accept-language", &config.accept_language)?);
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Downloads a page body. Non-2xx statuses are errors; nothing is retried.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ACCEPT_LANGUAGE;

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/article")
            .match_header("user-agent", "test-agent")
            .match_header("accept-language", DEFAULT_ACCEPT_LANGUAGE)
            .match_header("upgrade-insecure-requests", "1")
            .with_status(200)
            .with_body("<html><body>ok</body></html>")
            .create_async()
            .await;

        let fetcher = PageFetcher::new(&ScraperConfig::new().with_user_agent("test-agent")).unwrap();
        let body = fetcher.fetch(&format!("{}/article", server.url())).await.unwrap();

        assert_eq!(body, "<html><body>ok</body></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = PageFetcher::new(&ScraperConfig::new()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[test]
    fn test_invalid_header_value() {
        let config = ScraperConfig::new().with_accept_language("fr\nen");
        assert!(matches!(PageFetcher::new(&config), Err(Error::Fetch(_))));
    }
}
