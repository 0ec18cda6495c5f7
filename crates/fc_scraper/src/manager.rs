use std::time::Duration;

use fc_core::{Result, ScrapeResult, ScrapeStatus};
use tokio::time::sleep;

use crate::config::ScraperConfig;
use crate::logging::Logger;
use crate::scrapers::{ForumScraper, Scraper};

type BoxedScraper = Box<dyn Scraper>;

/// Outcome of a sequential batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: Vec<ScrapeResult>,
    pub succeeded: usize,
    /// Pages fetched fine that held no comment section or no valid comment.
    pub empty: usize,
    pub failed: usize,
}

impl BatchReport {
    fn record(&mut self, result: ScrapeResult) {
        match result.status() {
            ScrapeStatus::Success => self.succeeded += 1,
            ScrapeStatus::NoComments | ScrapeStatus::NoValidComments => self.empty += 1,
            ScrapeStatus::FetchError => self.failed += 1,
        }
        self.results.push(result);
    }

    pub fn total_comments(&self) -> usize {
        self.results.iter().map(|r| r.statistics.total_interventions).sum()
    }
}

pub struct ScraperManager {
    scrapers: Vec<BoxedScraper>,
    request_delay: Duration,
}

impl ScraperManager {
    /// Manager with the forum scraper registered.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut manager = Self::with_delay(config.request_delay);
        manager.add_scraper(Box::new(ForumScraper::new(config)?));
        Ok(manager)
    }

    pub fn with_delay(request_delay: Duration) -> Self {
        Self {
            scrapers: Vec::new(),
            request_delay,
        }
    }

    pub fn add_scraper(&mut self, scraper: BoxedScraper) {
        self.scrapers.push(scraper);
    }

    pub fn get_scraper_for_url(&self, url: &str) -> Option<&dyn Scraper> {
        self.scrapers
            .iter()
            .find(|s| s.can_handle(url))
            .map(Box::as_ref)
    }

    pub async fn scrape_url(&self, url: &str) -> ScrapeResult {
        match self.get_scraper_for_url(url) {
            Some(scraper) => scraper.scrape_article(url).await,
            None => ScrapeResult::fetch_error(url, format!("No scraper found for URL: {}", url)),
        }
    }

    /// Scrapes `urls` one after another, pausing between fetches. A failed
    /// page is recorded and the batch moves on.
    pub async fn scrape_urls(&self, urls: &[String]) -> BatchReport {
        let logger = Logger::new().with_prefix("[batch]".to_string());
        let mut report = BatchReport::default();

        for (index, url) in urls.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                logger.debug(&format!("Waiting {:?} before next request", self.request_delay));
                sleep(self.request_delay).await;
            }

            logger.info(&format!("📰 [{}/{}] {}", index + 1, urls.len(), url));
            let result = self.scrape_url(url).await;
            if let Some(error) = &result.error {
                logger.warn(&format!("{}: {}", url, error));
            }
            report.record(result);
        }

        logger.info(&format!(
            "✅ Batch done: {} succeeded, {} without comments, {} failed",
            report.succeeded, report.empty, report.failed
        ));
        report
    }
}
