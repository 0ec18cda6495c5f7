pub mod cli;
pub mod config;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs};
pub use config::ScraperConfig;
pub use logging::{init_logging, Logger};
pub use manager::{BatchReport, ScraperManager};
pub use scrapers::{scrape_html, ForumScraper, Scraper};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use fc_core::{Comment, Error, Result, ScrapeResult, ScrapeStatus};
}
