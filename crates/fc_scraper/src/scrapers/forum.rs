use async_trait::async_trait;
use fc_core::{Comment, Result, ScrapeResult};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use super::comment::parse_comment;
use super::metadata::extract_metadata;
use super::replies::extract_replies;
use super::section::locate_comment_section;
use super::utils::{compile_selectors, parse_url};
use super::Scraper;
use crate::config::ScraperConfig;
use crate::fetch::PageFetcher;
use crate::logging::Logger;

lazy_static! {
    /// Top-level comment item conventions, most specific first.
    static ref ITEM_SELECTORS: Vec<(&'static str, Selector)> = compile_selectors(&[
        "li.forum-fil",
        ".comment",
        ".commentaire",
        "li.comment",
        ".forum-message",
    ]);
    static ref LIST_ITEM: Selector = Selector::parse("li").expect("valid selector");
}

fn comment_candidates(section: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    ITEM_SELECTORS
        .iter()
        .map(|(_, selector)| section.select(selector).collect::<Vec<_>>())
        .find(|items| !items.is_empty())
        .unwrap_or_else(|| section.select(&LIST_ITEM).collect())
}

/// Runs the extraction pipeline on an already fetched page.
pub fn scrape_html(url: &str, html: &str) -> ScrapeResult {
    let logger = Logger::new().with_prefix(format!("[{}]", url));
    let document = Html::parse_document(html);
    let metadata = extract_metadata(&document, url);
    logger.debug(&format!("Title: {}", metadata.title));

    let Some(section) = locate_comment_section(&document) else {
        return ScrapeResult::no_comments(url, metadata);
    };

    let candidates = comment_candidates(section);
    logger.info(&format!("{} comment candidates", candidates.len()));

    let mut comments: Vec<Comment> = Vec::new();
    for node in candidates {
        let sequence_id = comments.len() as u32 + 1;
        match parse_comment(node, sequence_id, false) {
            Ok(comment) => comments.push(comment.with_replies(extract_replies(node))),
            Err(reason) => logger.debug(&format!("Skipping comment candidate: {}", reason)),
        }
    }

    let result = ScrapeResult::with_comments(url, metadata, comments);
    logger.info(&format!(
        "✅ {} comments, {} replies ({})",
        result.statistics.total_primary,
        result.statistics.total_replies,
        result.status()
    ));
    result
}

/// Comment scraper for SPIP-style news forums such as lefaso.net.
#[derive(Debug, Clone)]
pub struct ForumScraper {
    fetcher: PageFetcher,
}

impl ForumScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
        })
    }
}

#[async_trait]
impl Scraper for ForumScraper {
    fn source(&self) -> &str {
        "forum"
    }

    fn can_handle(&self, url: &str) -> bool {
        parse_url(url).is_ok()
    }

    async fn scrape_article(&self, url: &str) -> ScrapeResult {
        let logger = Logger::new().with_prefix(format!("[{}]", url));

        if let Err(e) = parse_url(url) {
            logger.error(&format!("❌ {}", e));
            return ScrapeResult::fetch_error(url, e.to_string());
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                logger.error(&format!("❌ Fetch failed: {}", e));
                return ScrapeResult::fetch_error(url, e.to_string());
            }
        };

        scrape_html(url, &html)
    }
}
