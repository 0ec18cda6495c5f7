use fc_core::Comment;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use super::comment::parse_comment;
use super::utils::{descendant_elements, next_sibling_elements};

lazy_static! {
    static ref REPLY_CLASS: Regex = Regex::new(r"(?i)reply|reponse|réponse").expect("valid reply class regex");
}

type ContainerStrategy = for<'a> fn(ElementRef<'a>) -> Option<ElementRef<'a>>;

/// Reply container lookups. The first one that finds anything is used on
/// its own; results are never merged across strategies.
const CONTAINER_STRATEGIES: [(&str, ContainerStrategy); 3] = [
    ("nested list", nested_list),
    ("reply block", reply_block),
    ("reply sibling", reply_sibling),
];

fn is_list(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "ul" | "ol")
}

fn has_reply_class(element: &ElementRef<'_>) -> bool {
    element.value().classes().any(|class| REPLY_CLASS.is_match(class))
}

fn nested_list(parent: ElementRef<'_>) -> Option<ElementRef<'_>> {
    descendant_elements(parent).find(is_list)
}

fn reply_block(parent: ElementRef<'_>) -> Option<ElementRef<'_>> {
    descendant_elements(parent).find(|element| element.value().name() == "div" && has_reply_class(element))
}

// Does not check that the sibling belongs to `parent`; on malformed pages a
// later comment's replies can be attached here.
fn reply_sibling(parent: ElementRef<'_>) -> Option<ElementRef<'_>> {
    next_sibling_elements(parent).find(|element| element.value().name() == "div" && has_reply_class(element))
}

fn reply_candidates(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    if is_list(&container) {
        descendant_elements(container)
            .filter(|element| element.value().name() == "li")
            .collect()
    } else {
        vec![container]
    }
}

/// Parses the replies attached to a primary comment node. Reply ids start at
/// 1 for each parent and only advance on a successful parse.
pub fn extract_replies(parent: ElementRef<'_>) -> Vec<Comment> {
    let Some((strategy, container)) = CONTAINER_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(parent).map(|container| (*name, container)))
    else {
        return Vec::new();
    };

    let mut replies = Vec::new();
    for candidate in reply_candidates(container) {
        let sequence_id = replies.len() as u32 + 1;
        match parse_comment(candidate, sequence_id, true) {
            Ok(reply) => replies.push(reply),
            Err(reason) => debug!("Skipping reply candidate found via {}: {}", strategy, reason),
        }
    }
    replies
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::CommentKind;
    use scraper::{Html, Selector};

    fn primary(document: &Html) -> ElementRef<'_> {
        let selector = Selector::parse("li.forum-fil").unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_nested_list_replies() {
        let document = Html::parse_fragment(
            r#"<ul id="navforum"><li class="forum-fil">
                <div class="forum-chapo">par Awa, 12 mai</div>
                <div class="forum-texte">Le commentaire principal de la discussion.</div>
                <ul>
                    <li><div class="forum-chapo">par Paul, 12 mai</div>
                        <div class="forum-texte">Je suis entièrement de votre avis.</div></li>
                    <li><div class="forum-texte">Ok</div></li>
                    <li><div class="forum-chapo">par Kadi, 13 mai</div>
                        <div class="forum-texte">Pas moi, les chiffres disent autre chose.</div></li>
                </ul>
            </li></ul>"#,
        );

        let replies = extract_replies(primary(&document));
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].author, "Paul");
        assert_eq!(replies[0].sequence_id, 1);
        assert_eq!(replies[1].author, "Kadi");
        assert_eq!(replies[1].sequence_id, 2);
        assert!(replies.iter().all(|r| r.kind == CommentKind::Reply));
    }

    #[test]
    fn test_reply_block_is_single_candidate() {
        let document = Html::parse_fragment(
            r#"<ul><li class="forum-fil">
                <div class="forum-texte">Un commentaire principal assez long.</div>
                <div class="comment-reply">
                    <span class="author">by Sam, today</span>
                    <div class="comment-text">A reply that stands on its own.</div>
                </div>
            </li></ul>"#,
        );

        let replies = extract_replies(primary(&document));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].author, "Sam");
        assert_eq!(replies[0].content, "A reply that stands on its own.");
    }

    #[test]
    fn test_reply_sibling() {
        let document = Html::parse_fragment(
            r#"<div>
                <li class="forum-fil"><div class="forum-texte">Un commentaire principal assez long.</div></li>
                <div class="reponses"><div class="forum-texte">Une réponse placée à côté du message.</div></div>
            </div>"#,
        );

        let replies = extract_replies(primary(&document));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, "Une réponse placée à côté du message.");
    }

    #[test]
    fn test_no_container() {
        let document = Html::parse_fragment(
            r#"<ul><li class="forum-fil"><div class="forum-texte">Sans aucune réponse ici.</div></li></ul>"#,
        );
        assert!(extract_replies(primary(&document)).is_empty());
    }
}
