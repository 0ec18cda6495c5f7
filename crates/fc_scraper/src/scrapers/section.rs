use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::utils::{compile_selectors, descendant_elements, element_text, next_sibling_elements};

/// Id of the comment list on SPIP-based news forums.
const FORUM_LIST_ID: &str = "navforum";
const HEADING_TAGS: [&str; 3] = ["h2", "h3", "h4"];

lazy_static! {
    static ref SECTION_SELECTORS: Vec<(&'static str, Selector)> = compile_selectors(&[
        "ul#navforum",
        ".forum",
        "#navforum",
        r#"ul[id*="forum"]"#,
        ".commentaires",
        "#commentaires",
        "#comments",
        ".comments",
        ".comment-list",
    ]);
    static ref COMMENTS_HEADING: Regex =
        Regex::new(r"(?i)comments|commentaires|r[ée]actions").expect("valid heading regex");
}

type SectionStrategy = for<'a> fn(&'a Html) -> Option<ElementRef<'a>>;

const SECTION_STRATEGIES: [(&str, SectionStrategy); 3] = [
    ("forum list id", by_forum_list_id),
    ("css selector", by_css_selector),
    ("comments heading", by_comments_heading),
];

fn by_forum_list_id(document: &Html) -> Option<ElementRef<'_>> {
    descendant_elements(document.root_element())
        .find(|element| element.value().name() == "ul" && element.value().id() == Some(FORUM_LIST_ID))
}

fn by_css_selector(document: &Html) -> Option<ElementRef<'_>> {
    SECTION_SELECTORS.iter().find_map(|(css, selector)| {
        let found = document.select(selector).next();
        if found.is_some() {
            debug!("Comment section matched selector {}", css);
        }
        found
    })
}

fn by_comments_heading(document: &Html) -> Option<ElementRef<'_>> {
    descendant_elements(document.root_element())
        .filter(|element| HEADING_TAGS.contains(&element.value().name()))
        .filter(|heading| COMMENTS_HEADING.is_match(&element_text(*heading)))
        .find_map(|heading| next_sibling_elements(heading).find(|element| element.value().name() == "ul"))
}

/// Finds the comment forum container of an article page. `None` means the
/// article has no comment section, which is a normal outcome.
pub fn locate_comment_section(document: &Html) -> Option<ElementRef<'_>> {
    let located = SECTION_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(document).map(|section| (*name, section)));

    match located {
        Some((name, section)) => {
            info!("✅ Comment section found via {}", name);
            Some(section)
        }
        None => {
            info!("No comment section found");
            None
        }
    }
}
