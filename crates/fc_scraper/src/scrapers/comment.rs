use fc_core::{Comment, CommentKind, MIN_CONTENT_LENGTH};
use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use thiserror::Error;

use super::header::{parse_header, CommentHeader};
use super::normalize::normalize;
use super::utils::{compile_selectors, descendant_elements, element_text};

/// Why a candidate node did not yield a comment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no text content")]
    Empty,
    #[error("content too short ({length} chars)")]
    TooShort { length: usize },
    #[error("interface text containing '{keyword}'")]
    InterfaceNoise { keyword: &'static str },
}

/// Below this length, text containing a UI keyword is treated as a control label.
const INTERFACE_NOISE_MAX_LENGTH: usize = 30;
const INTERFACE_KEYWORDS: [&str; 5] = ["répondre", "reply", "partager", "share", "like"];

/// Words that mark header or toolbar blocks during the block scan.
const BLOCK_SCAN_EXCLUDED: [&str; 5] = ["par", "by", "répondre", "reply", "date"];
const BLOCK_SCAN_MIN_LENGTH: usize = 20;
const BLOCK_TAGS: [&str; 2] = ["div", "p"];

lazy_static! {
    static ref HEADER_SELECTORS: Vec<(&'static str, Selector)> = compile_selectors(&[
        "div.forum-chapo",
        ".comment-author",
        ".author",
        ".user-name",
        ".comment-meta",
    ]);
    static ref CONTENT_SELECTORS: Vec<(&'static str, Selector)> = compile_selectors(&[
        ".ugccmt-commenttext",
        ".forum-texte",
        ".comment-text",
        ".comment-content",
        ".commentaire-texte",
    ]);
}

type ContentStrategy = fn(ElementRef<'_>) -> Option<String>;

/// Body extraction cascade, most specific first.
const CONTENT_STRATEGIES: [(&str, ContentStrategy); 3] = [
    ("content selector", content_by_selector),
    ("block scan", content_by_block_scan),
    ("whole node", content_of_whole_node),
];

/// First selector hit longer than the threshold. A shorter non-empty hit is
/// still returned so the significance check can reject it.
fn content_by_selector(node: ElementRef<'_>) -> Option<String> {
    let mut short_hit = None;
    for (_, selector) in CONTENT_SELECTORS.iter() {
        let Some(element) = node.select(selector).next() else {
            continue;
        };
        let text = normalize(&element_text(element));
        if text.chars().count() > MIN_CONTENT_LENGTH {
            return Some(text);
        }
        if !text.is_empty() {
            short_hit = Some(text);
        }
    }
    short_hit
}

fn content_by_block_scan(node: ElementRef<'_>) -> Option<String> {
    descendant_elements(node)
        .filter(|element| BLOCK_TAGS.contains(&element.value().name()))
        .map(element_text)
        .find(|text| {
            let lowered = text.to_lowercase();
            text.chars().count() > BLOCK_SCAN_MIN_LENGTH
                && !BLOCK_SCAN_EXCLUDED.iter().any(|keyword| lowered.contains(keyword))
        })
        .map(|text| normalize(&text))
}

/// Text of the whole node with the header element left out.
fn content_of_whole_node(node: ElementRef<'_>) -> Option<String> {
    let header = header_element(node);
    let text: String = node
        .descendants()
        .filter(|descendant| match header {
            Some(header) => !descendant.ancestors().any(|ancestor| ancestor.id() == header.id()),
            None => true,
        })
        .filter_map(|descendant| descendant.value().as_text().map(|text| &**text))
        .collect();
    Some(normalize(&text))
}

fn header_element(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    HEADER_SELECTORS
        .iter()
        .find_map(|(_, selector)| node.select(selector).next())
}

fn extract_header(node: ElementRef<'_>) -> CommentHeader {
    header_element(node)
        .map(|element| parse_header(&element_text(element)))
        .unwrap_or_else(CommentHeader::unknown)
}

/// Cleaned body text of a comment node.
pub fn extract_content(node: ElementRef<'_>) -> String {
    CONTENT_STRATEGIES
        .iter()
        .find_map(|(_, strategy)| strategy(node).filter(|text| !text.is_empty()))
        .unwrap_or_default()
}

fn check_significance(content: &str) -> Result<(), Rejection> {
    let length = content.chars().count();
    if length == 0 {
        return Err(Rejection::Empty);
    }
    if length < MIN_CONTENT_LENGTH {
        return Err(Rejection::TooShort { length });
    }
    if length < INTERFACE_NOISE_MAX_LENGTH {
        let lowered = content.to_lowercase();
        if let Some(keyword) = INTERFACE_KEYWORDS.into_iter().find(|k| lowered.contains(k)) {
            return Err(Rejection::InterfaceNoise { keyword });
        }
    }
    Ok(())
}

/// Parses one node believed to hold a comment (or a reply when `is_reply`).
pub fn parse_comment(node: ElementRef<'_>, sequence_id: u32, is_reply: bool) -> Result<Comment, Rejection> {
    let header = extract_header(node);
    let content = extract_content(node);
    check_significance(&content)?;

    let kind = if is_reply { CommentKind::Reply } else { CommentKind::Primary };
    Ok(Comment::new(sequence_id, header.author, header.date, content, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{ANONYMOUS_AUTHOR, UNKNOWN_DATE};
    use scraper::Html;

    fn first_li(document: &Html) -> ElementRef<'_> {
        let selector = Selector::parse("li").unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_parse_forum_comment() {
        let document = Html::parse_fragment(
            r#"<ul><li class="forum-fil">
                <div class="forum-chapo">par Jean Dupont, 12 mai 2024</div>
                <div class="forum-texte"><p>Un très   bon article, merci http://spam.example !</p></div>
            </li></ul>"#,
        );

        let comment = parse_comment(first_li(&document), 4, false).unwrap();
        assert_eq!(comment.sequence_id, 4);
        assert_eq!(comment.author, "Jean Dupont");
        assert_eq!(comment.publication_date_raw, "12 mai 2024");
        assert_eq!(comment.content, "Un très bon article, merci !");
        assert_eq!(comment.kind, CommentKind::Primary);
        assert_eq!(comment.content_length, comment.content.chars().count());
        assert_eq!(comment.word_count, 6);
    }

    #[test]
    fn test_fallback_header_selector() {
        let document = Html::parse_fragment(
            r#"<ul><li>
                <span class="author">by Awa, yesterday</span>
                <div class="comment-text">The reporting here is excellent.</div>
            </li></ul>"#,
        );

        let comment = parse_comment(first_li(&document), 1, true).unwrap();
        assert_eq!(comment.author, "Awa");
        assert_eq!(comment.publication_date_raw, "yesterday");
        assert_eq!(comment.kind, CommentKind::Reply);
    }

    #[test]
    fn test_block_scan_skips_header_text() {
        let document = Html::parse_fragment(
            r#"<ul><li>
                <div>par Moussa, 2 janvier 2024 à 10h</div>
                <p>Le gouvernement doit investir dans les écoles rurales.</p>
            </li></ul>"#,
        );

        let comment = parse_comment(first_li(&document), 1, false).unwrap();
        assert_eq!(comment.content, "Le gouvernement doit investir dans les écoles rurales.");
        assert_eq!(comment.author, ANONYMOUS_AUTHOR);
        assert_eq!(comment.publication_date_raw, UNKNOWN_DATE);
    }

    #[test]
    fn test_short_selector_match_is_kept_and_rejected() {
        let document = Html::parse_fragment(
            r#"<ul><li>
                <div class="forum-texte">Bien.</div>
                <p>Un avis plus développé sur la question posée.</p>
            </li></ul>"#,
        );

        assert_eq!(extract_content(first_li(&document)), "Bien.");
        assert_eq!(
            parse_comment(first_li(&document), 1, false),
            Err(Rejection::TooShort { length: 5 })
        );
    }

    #[test]
    fn test_short_body_under_header_is_rejected() {
        let document = Html::parse_fragment(
            r#"<ul><li>
                <div class="forum-chapo">par Anonyme, 13 mai 2024</div>
                <div class="forum-texte"><p>Oui</p></div>
            </li></ul>"#,
        );

        assert_eq!(
            parse_comment(first_li(&document), 1, true),
            Err(Rejection::TooShort { length: 3 })
        );
    }

    #[test]
    fn test_whole_node_leaves_out_header() {
        let document = Html::parse_fragment(
            r#"<ul><li><div class="forum-chapo">par Jean, 12 mai</div> Excellent!</li></ul>"#,
        );

        let comment = parse_comment(first_li(&document), 1, false).unwrap();
        assert_eq!(comment.author, "Jean");
        assert_eq!(comment.content, "Excellent!");
        assert_eq!(comment.content_length, 10);
    }

    #[test]
    fn test_whole_node_without_body_is_empty() {
        let document = Html::parse_fragment(
            r#"<ul><li><div class="forum-chapo">par Jean, 12 mai 2024 à 10h</div></li></ul>"#,
        );
        assert_eq!(parse_comment(first_li(&document), 1, false), Err(Rejection::Empty));
    }

    #[test]
    fn test_whole_node_last_resort() {
        let document = Html::parse_fragment("<ul><li>Courte réaction sincère</li></ul>");
        let comment = parse_comment(first_li(&document), 1, false).unwrap();
        assert_eq!(comment.content, "Courte réaction sincère");
    }

    #[test]
    fn test_rejects_too_short() {
        let document = Html::parse_fragment(r#"<ul><li><div class="forum-texte">Ok</div></li></ul>"#);
        assert_eq!(
            parse_comment(first_li(&document), 1, false),
            Err(Rejection::TooShort { length: 2 })
        );
    }

    #[test]
    fn test_rejects_empty() {
        let document = Html::parse_fragment("<ul><li> <span>★</span> </li></ul>");
        assert_eq!(parse_comment(first_li(&document), 1, false), Err(Rejection::Empty));
    }

    #[test]
    fn test_rejects_interface_text() {
        let document = Html::parse_fragment("<ul><li><a>Répondre à ce message</a></li></ul>");
        assert_eq!(
            parse_comment(first_li(&document), 1, false),
            Err(Rejection::InterfaceNoise { keyword: "répondre" })
        );
    }

    #[test]
    fn test_keeps_long_text_with_keyword() {
        let document = Html::parse_fragment(
            "<ul><li>I like this analysis of the budget very much, well argued.</li></ul>",
        );
        assert!(parse_comment(first_li(&document), 1, false).is_ok());
    }
}
