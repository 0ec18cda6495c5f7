use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Letters kept by the analytics, shared by the cleaning and word regexes.
const LOWER_LETTERS: &str = "a-zàâäçéèêëîïôöûùüÿñæœ";
const UPPER_LETTERS: &str = "A-ZÀÂÄÇÉÈÊËÎÏÔÖÛÙÜŸÑÆŒ";

lazy_static! {
    static ref URLS: Regex = Regex::new(r"http\S+|www\S+").expect("valid url regex");
    static ref MENTIONS_AND_TAGS: Regex = Regex::new(r"[@#]\w+").expect("valid mention regex");
    static ref NON_LETTERS: Regex =
        Regex::new(&format!(r"[^{}{}\s]", LOWER_LETTERS, UPPER_LETTERS)).expect("valid letter class");
    static ref WORDS: Regex =
        Regex::new(&format!(r"\b[{}]{{3,}}\b", LOWER_LETTERS)).expect("valid word regex");

    /// French and English function words ignored by the analytics.
    pub static ref STOPWORDS: HashSet<&'static str> = [
        // fr
        "les", "des", "que", "est", "dans", "pour", "sur", "avec", "par", "mais", "comme",
        "plus", "tout", "cest", "fait", "être", "avoir", "faire", "dire", "voir", "savoir",
        "vouloir", "pouvoir", "devoir", "aller", "venir", "ceci", "cela", "cette", "ces",
        "dun", "dune", "quil", "quils", "donc", "or", "ni", "car", "à", "au", "aux",
        "du", "de", "la", "le", "un", "une", "et", "ou", "où", "qui", "quoi", "quand",
        "ce", "il", "elle", "ils", "elles", "nous", "vous", "je", "tu", "on", "ne", "pas",
        "se", "sa", "son", "ses", "leur", "leurs", "en", "y", "a", "l", "d", "c", "qu",
        "s", "n", "j", "m", "t", "sont", "été", "aussi", "très", "bien", "si",
        // en
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "was",
        "our", "out", "has", "have", "had", "his", "her", "its", "they", "them", "this",
        "that", "with", "from", "what", "which", "who", "will", "would", "there", "their",
        "been", "were", "is", "it", "of", "to", "in", "on", "at", "as", "an", "be", "by",
        "or", "we", "i",
    ]
    .into_iter()
    .collect();
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Reduces a comment to lowercase content words for sentiment and keyword
/// analysis.
pub fn clean_for_analysis(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let text = URLS.replace_all(text, " ");
    let text = MENTIONS_AND_TAGS.replace_all(&text, " ");
    let text = NON_LETTERS.replace_all(&text, " ");
    let lowered = text.to_lowercase();

    lowered
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words of three letters or more, lowercased, stopwords excluded.
pub fn keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORDS
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| !is_stopword(word))
        .map(str::to_string)
        .collect()
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_for_analysis() {
        assert_eq!(
            clean_for_analysis("Merci @Awa pour ce #débat 2024 ! Lire https://lefaso.net"),
            "merci lire"
        );
        assert_eq!(clean_for_analysis("Voir la suite"), "suite");
    }

    #[test]
    fn test_clean_and_keywords_agree_on_letters() {
        assert_eq!(clean_for_analysis("Le CŒUR du sujet × 2 ÷ 3"), "cœur sujet");
        assert_eq!(keywords("Le CŒUR du sujet × 2 ÷ 3"), vec!["cœur", "sujet"]);
        assert_eq!(clean_for_analysis("Ex æquo"), "ex æquo");
    }

    #[test]
    fn test_clean_drops_english_stopwords() {
        assert_eq!(clean_for_analysis("This is a GREAT analysis of the budget"), "great analysis budget");
    }

    #[test]
    fn test_clean_empty() {
        assert_eq!(clean_for_analysis("   "), "");
        assert_eq!(clean_for_analysis("123 !!! 456"), "");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            keywords("Le Budget des écoles, le budget: oui"),
            vec!["budget", "écoles", "budget", "oui"]
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("éàü", 2), "éà");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
