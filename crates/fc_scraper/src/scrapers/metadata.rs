use chrono::Utc;
use fc_core::{ArticleMetadata, NOT_FOUND};
use lazy_static::lazy_static;
use scraper::{Html, Selector};

use super::utils::element_text;

const DATE_MARKERS: [&str; 2] = ["Publié le", "Published on"];

lazy_static! {
    static ref ENTRY_TITLE: Selector = Selector::parse("h1.entry-title").expect("valid selector");
    static ref ANY_H1: Selector = Selector::parse("h1").expect("valid selector");
    static ref PAGE_TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("valid selector");
    static ref HIERARCHY: Selector = Selector::parse("div#hierarchie").expect("valid selector");
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn extract_title(document: &Html) -> Option<String> {
    // The first entry-title is the site banner when the page carries two.
    let entry_titles: Vec<_> = document.select(&ENTRY_TITLE).collect();
    let entry_title = match entry_titles.len() {
        0 => None,
        1 => Some(entry_titles[0]),
        _ => Some(entry_titles[1]),
    };

    entry_title
        .and_then(|element| non_empty(element_text(element)))
        .or_else(|| document.select(&ANY_H1).find_map(|element| non_empty(element_text(element))))
        .or_else(|| document.select(&PAGE_TITLE).find_map(|element| non_empty(element_text(element))))
}

fn extract_publication_date(document: &Html) -> Option<String> {
    document.select(&PARAGRAPH).find_map(|paragraph| {
        let text = element_text(paragraph);
        let marker = DATE_MARKERS.into_iter().find(|marker| text.contains(marker))?;
        non_empty(text.replacen(marker, "", 1).trim().to_string())
    })
}

fn extract_category(document: &Html) -> Option<String> {
    document
        .select(&HIERARCHY)
        .next()
        .and_then(|element| non_empty(element_text(element)))
}

/// Best-effort article metadata. Missing fields hold the "Not found" sentinel.
pub fn extract_metadata(document: &Html, url: &str) -> ArticleMetadata {
    let or_sentinel = |value: Option<String>| value.unwrap_or_else(|| NOT_FOUND.to_string());

    ArticleMetadata {
        title: or_sentinel(extract_title(document)),
        url: url.to_string(),
        publication_date_raw: or_sentinel(extract_publication_date(document)),
        category: or_sentinel(extract_category(document)),
        scrape_timestamp: Utc::now(),
    }
}
