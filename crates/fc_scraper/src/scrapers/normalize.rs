use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"[A-Za-z][A-Za-z0-9+.\-]*://\S+|http\S+").expect("valid url regex");
    static ref EMAIL_PATTERN: Regex = Regex::new(r"\S+@\S+").expect("valid email regex");
    /// Word characters, whitespace, the accented Latin letters used in
    /// French, and a small punctuation allow-list survive.
    static ref DISALLOWED_CHARS: Regex = Regex::new(
        r#"[^\w\sàâäéèêëîïôöùûüçÀÂÄÉÈÊËÎÏÔÖÙÛÜÇ.,!?;:()\-&'"]"#
    )
    .expect("valid character class");
    static ref BARE_URL: Regex = Regex::new(r"http\S+").expect("valid bare url regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Cleans raw comment text for storage and analysis.
///
/// URL and email tokens are cut before the character filter (which would
/// otherwise strip their `/` and `@` first), `http` leftovers are cut again
/// afterwards, and whitespace is collapsed last. The result is a fixed
/// point: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = URL_PATTERN.replace_all(raw, " ");
    let text = EMAIL_PATTERN.replace_all(&text, " ");
    let text = DISALLOWED_CHARS.replace_all(&text, "");
    let text = BARE_URL.replace_all(&text, " ");

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Collapses whitespace without filtering characters. Used for header and
/// metadata text, where `/` or `@` can be meaningful.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
