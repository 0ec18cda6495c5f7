use async_trait::async_trait;
use fc_core::ScrapeResult;

pub mod comment;
pub mod forum;
pub mod header;
pub mod metadata;
pub mod normalize;
pub mod replies;
pub mod section;

pub use comment::{extract_content, parse_comment, Rejection};
pub use forum::{scrape_html, ForumScraper};
pub use header::{parse_header, CommentHeader};
pub use metadata::extract_metadata;
pub use normalize::normalize;
pub use replies::extract_replies;
pub use section::locate_comment_section;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name of the comment source
    fn source(&self) -> &str;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Scrapes the comments of one article. Never fails: every error path
    /// ends in a result carrying a status.
    async fn scrape_article(&self, url: &str) -> ScrapeResult;
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use fc_core::{Error, Result};
    use scraper::{ElementRef, Selector};
    use url::Url;

    use super::normalize::collapse_whitespace;

    /// Parses an absolute article URL; only http and https are fetched.
    pub fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(Error::InvalidUrl(format!("unsupported scheme '{}' in {}", scheme, url))),
        }
    }

    /// Compiles a selector cascade, keeping each selector's source text for logs.
    pub fn compile_selectors(selectors: &[&'static str]) -> Vec<(&'static str, Selector)> {
        selectors
            .iter()
            .filter_map(|css| Selector::parse(css).ok().map(|selector| (*css, selector)))
            .collect()
    }

    pub fn element_text(element: ElementRef<'_>) -> String {
        collapse_whitespace(&element.text().collect::<String>())
    }

    /// Element descendants in document order, excluding `element` itself.
    pub fn descendant_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        element.descendants().skip(1).filter_map(ElementRef::wrap)
    }

    pub fn next_sibling_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        element.next_siblings().filter_map(ElementRef::wrap)
    }
}
