//! Text tokenization and stemming for search indexing.

use ahash::AHasher;
use regex::Regex;
use rust_stemmers::Stemmer;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Common English stop words, dropped before indexing.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex is valid"));

/// Summaries are HTML fragments (`<code>KindConfig</code> is a struct …`).
/// Tags are removed and the common entities decoded.
pub(crate) fn strip_markup(summary: &str) -> Cow<'_, str> {
    if !summary.contains(['<', '&']) {
        return Cow::Borrowed(summary);
    }
    let text = MARKUP_TAG.replace_all(summary, "");
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&"),
    )
}

/// Splits text into stemmed, lowercase search terms.
///
/// Words end at any character that is not a letter, `_` or `-`. Each word is cut
/// on `_` and `-`, and each piece on lowercase-to-uppercase transitions, so
/// `HttpServer` yields `http`, `server` and `httpserver`, and `parse_json` yields
/// `parse` and `json`. Digits end a word: `u8` yields `u`.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];

    let words = text
        .split(|c: char| !(c.is_alphabetic() || c == '_' || c == '-'))
        .filter(|w| !w.is_empty());
    for word in words {
        for piece in word.split(['_', '-']).filter(|p| !p.is_empty()) {
            let humps = camel_humps(piece);
            if humps.len() > 1 {
                for hump in humps {
                    index_token(hump, &mut tokens, stemmer);
                }
            }
            index_token(piece, &mut tokens, stemmer);
        }
    }

    tokens
}

/// `KindConfig` -> [`Kind`, `Config`]. Runs of capitals stay together: `HTTPServer`
/// is a single hump.
fn camel_humps(piece: &str) -> Vec<&str> {
    let mut humps = vec![];
    let mut start = 0;
    let mut prev_lower = false;
    for (i, c) in piece.char_indices() {
        if prev_lower && c.is_uppercase() {
            humps.push(&piece[start..i]);
            start = i;
        }
        prev_lower = c.is_lowercase();
    }
    humps.push(&piece[start..]);
    humps
}

/// Lowercases, drops stop words, stems.
pub(crate) fn index_token(token: &str, tokens: &mut Vec<String>, stemmer: &Stemmer) {
    let lowercase = token.to_lowercase();
    if STOP_WORDS.contains(&lowercase.as_str()) {
        return;
    }
    tokens.push(stemmer.stem(&lowercase).into_owned());
}

/// Hashes a term for lookup (case-insensitive).
pub(crate) fn hash_term(term: &str) -> u64 {
    let mut hasher = AHasher::default();
    term.to_lowercase().hash(&mut hasher);
    hasher.finish()
}
