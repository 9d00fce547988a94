//! Wire form of a search-index payload.
//!
//! rustdoc ships the index as a script: a single-quoted JavaScript string literal
//! handed to `JSON.parse`, followed by two lines of glue registering it with the
//! search widget and with a module system. This module reads and writes both that
//! script form and the bare JSON inside it, keeping the short field names intact.

use crate::error::{MalformedIndex, Malformation};
use crate::kind::ItemKind;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Name the script form binds the index to.
pub const SCRIPT_BINDING: &str = "searchIndex";

static JSON_PARSE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"JSON\.parse\(\s*'").expect("static regex is valid"));

/// One `p` entry: the kind and display name of a type referenced by `i` or `f`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParent(pub ItemKind, pub String);

/// The per-crate record, field for field as rustdoc writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCrate {
    #[serde(default)]
    pub doc: String,
    pub t: Vec<ItemKind>,
    pub n: Vec<String>,
    pub q: Vec<String>,
    pub d: Vec<String>,
    pub i: Vec<usize>,
    pub f: Vec<serde_json::Value>,
    pub p: Vec<RawParent>,
}

/// A whole payload: crate name to record.
///
/// Written as an object keyed by crate. Read through [`RawIndex::from_json`],
/// which also takes the pair form and rejects repeated crate names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawIndex {
    pub crates: BTreeMap<String, RawCrate>,
}

impl RawIndex {
    /// Decodes either the script form or bare JSON.
    pub fn from_payload(payload: &str) -> Result<Self, MalformedIndex> {
        let json = extract_json(payload)?;
        Self::from_json(&json)
    }

    /// Decodes bare JSON, accepting an object keyed by crate or an array of
    /// `[crate, record]` pairs.
    ///
    /// A crate named twice is [`Malformation::DuplicateCrate`] in either form.
    pub fn from_json(json: &str) -> Result<Self, MalformedIndex> {
        let CrateEntries(entries) = serde_json::from_str(json).map_err(syntax)?;
        let mut crates = BTreeMap::new();
        for (name, record) in entries {
            if crates.contains_key(&name) {
                return Err(MalformedIndex::new(Malformation::DuplicateCrate(name)));
            }
            crates.insert(name, record);
        }
        Ok(Self { crates })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Renders the script form rustdoc emits, one crate per continued line.
    pub fn to_js(&self) -> serde_json::Result<String> {
        let records = self
            .crates
            .iter()
            .map(|(name, record)| {
                let name = serde_json::to_string(name)?;
                let record = serde_json::to_string(record)?;
                Ok(escape_js_literal(&format!("{name}:{record}")))
            })
            .collect::<serde_json::Result<Vec<String>>>()?;

        let mut out = format!("var {SCRIPT_BINDING} = JSON.parse('{{\\\n");
        out.push_str(&records.join(",\\\n"));
        if !records.is_empty() {
            out.push_str("\\\n");
        }
        out.push_str("}');\n");
        out.push_str(&format!(
            "if (typeof window !== 'undefined' && window.initSearch) {{window.initSearch({SCRIPT_BINDING})}};\n"
        ));
        out.push_str(&format!(
            "if (typeof exports !== 'undefined') {{exports.{SCRIPT_BINDING} = {SCRIPT_BINDING}}};\n"
        ));
        Ok(out)
    }
}

/// Crate records in document order, duplicates included.
struct CrateEntries(Vec<(String, RawCrate)>);

impl<'de> Deserialize<'de> for CrateEntries {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = CrateEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object keyed by crate name or a sequence of [crate, record] pairs")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = Vec::new();
                if let Some(size_hint) = map.size_hint() {
                    entries.reserve(size_hint);
                }
                while let Some(entry) = map.next_entry::<String, RawCrate>()? {
                    entries.push(entry);
                }
                Ok(CrateEntries(entries))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut entries = Vec::new();
                if let Some(size_hint) = seq.size_hint() {
                    entries.reserve(size_hint);
                }
                while let Some(entry) = seq.next_element::<(String, RawCrate)>()? {
                    entries.push(entry);
                }
                Ok(CrateEntries(entries))
            }
        }

        d.deserialize_any(Visitor)
    }
}

fn syntax(err: serde_json::Error) -> MalformedIndex {
    MalformedIndex::new(Malformation::Syntax(err.to_string()))
}

/// Returns the JSON text of a payload.
///
/// Bare JSON is returned as-is. Otherwise the first `JSON.parse('...')` literal
/// is located and decoded.
pub fn extract_json(payload: &str) -> Result<Cow<'_, str>, MalformedIndex> {
    let trimmed = payload.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(Cow::Borrowed(trimmed));
    }

    let call = JSON_PARSE_CALL
        .find(trimmed)
        .ok_or_else(|| MalformedIndex::new(Malformation::MissingLiteral))?;
    decode_js_literal(&trimmed[call.end()..]).map(Cow::Owned)
}

/// Decodes a single-quoted JavaScript string body up to its closing quote.
fn decode_js_literal(body: &str) -> Result<String, MalformedIndex> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\'' => return Ok(out),
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| MalformedIndex::new(Malformation::UnterminatedLiteral))?;
                match escaped {
                    // Line continuation
                    '\n' | '\u{2028}' | '\u{2029}' => {}
                    '\r' => {
                        chars.next_if(|(_, c)| *c == '\n');
                    }
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' => out.push('\0'),
                    'x' => {
                        let code = take_hex(&mut chars, 2).ok_or_else(|| invalid_escape(pos))?;
                        out.push(char::from_u32(code).ok_or_else(|| invalid_escape(pos))?);
                    }
                    'u' => out.push(decode_unicode_escape(&mut chars, pos)?),
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }

    Err(MalformedIndex::new(Malformation::UnterminatedLiteral))
}

type CharIter<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn take_hex(chars: &mut CharIter<'_>, digits: usize) -> Option<u32> {
    let mut value = 0;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        value = value * 16 + c.to_digit(16)?;
    }
    Some(value)
}

fn decode_unicode_escape(chars: &mut CharIter<'_>, pos: usize) -> Result<char, MalformedIndex> {
    let high = take_hex(chars, 4).ok_or_else(|| invalid_escape(pos))?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high).ok_or_else(|| invalid_escape(pos));
    }

    // Surrogate pair: a second `\uXXXX` must follow.
    if chars.next().map(|(_, c)| c) != Some('\\') || chars.next().map(|(_, c)| c) != Some('u') {
        return Err(invalid_escape(pos));
    }
    let low = take_hex(chars, 4).ok_or_else(|| invalid_escape(pos))?;
    if !(0xDC00..0xE000).contains(&low) {
        return Err(invalid_escape(pos));
    }
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
        .ok_or_else(|| invalid_escape(pos))
}

fn invalid_escape(pos: usize) -> MalformedIndex {
    MalformedIndex::new(Malformation::InvalidEscape(pos))
}

fn escape_js_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    const DEMO_JSON: &str = r#"{"demo":{"doc":"","t":[3,11],"n":["Foo","bar"],"q":["demo",""],"d":["a struct","a method"],"i":[0,1],"f":[0,[[1],[2]]],"p":[[0,""],[3,"Foo"]]}}"#;

    #[test]
    fn bare_json_is_borrowed() {
        let_assert!(Ok(Cow::Borrowed(json)) = extract_json(DEMO_JSON));
        check!(json == DEMO_JSON);
    }

    #[test]
    fn script_form_is_unwrapped() {
        let script = "var searchIndex = JSON.parse('{\\\n\"demo\":{\"doc\":\"it\\'s\"}\\\n}');\nif (typeof exports !== 'undefined') {exports.searchIndex = searchIndex};";
        let_assert!(Ok(json) = extract_json(script));
        check!(json == "{\"demo\":{\"doc\":\"it's\"}}");
    }

    #[rstest]
    #[case(r"a\\b'", "a\\b")]
    #[case(r"\x41é'", "Aé")]
    #[case(r"🦀'", "🦀")]
    #[case("line\\\r\nnext'", "linenext")]
    #[case(r#"\"quoted\"'"#, "\"quoted\"")]
    fn literal_escapes(#[case] body: &str, #[case] expected: &str) {
        let_assert!(Ok(decoded) = decode_js_literal(body));
        check!(decoded == expected);
    }

    #[rstest]
    #[case("no closing quote", Malformation::UnterminatedLiteral)]
    #[case("trailing backslash\\", Malformation::UnterminatedLiteral)]
    #[case(r"\uZZZZ'", Malformation::InvalidEscape(0))]
    #[case(r"\ud83e'", Malformation::InvalidEscape(0))]
    fn broken_literals(#[case] body: &str, #[case] expected: Malformation) {
        let_assert!(Err(err) = decode_js_literal(body));
        check!(err.reason == expected);
    }

    #[test]
    fn script_without_literal_is_rejected() {
        let_assert!(Err(err) = extract_json("var searchIndex = {};"));
        check!(err.reason == Malformation::MissingLiteral);
    }

    #[test]
    fn pair_form_matches_object_form() {
        let pairs = r#"[["demo",{"doc":"","t":[3,11],"n":["Foo","bar"],"q":["demo",""],"d":["a struct","a method"],"i":[0,1],"f":[0,[[1],[2]]],"p":[[0,""],[3,"Foo"]]}]]"#;
        let_assert!(Ok(from_pairs) = RawIndex::from_json(pairs));
        let_assert!(Ok(from_object) = RawIndex::from_json(DEMO_JSON));
        check!(from_pairs == from_object);
    }

    #[rstest]
    #[case::pairs(r#"[["a",{R}],["b",{R}],["a",{R}]]"#)]
    #[case::object(r#"{"a":{R},"b":{R},"a":{R}}"#)]
    fn duplicate_crates_are_rejected(#[case] container: &str) {
        let record = r#"{"t":[],"n":[],"q":[],"d":[],"i":[],"f":[],"p":[]}"#;
        let json = container.replace("{R}", record);
        let_assert!(Err(err) = RawIndex::from_json(&json));
        check!(err.reason == Malformation::DuplicateCrate("a".to_string()));
    }

    #[rstest]
    #[case("42")]
    #[case(r#""demo""#)]
    #[case("null")]
    fn non_container_is_syntax_error(#[case] json: &str) {
        let_assert!(Err(err) = RawIndex::from_json(json));
        let_assert!(Malformation::Syntax(_) = err.reason);
    }

    #[test]
    fn missing_field_is_syntax_error() {
        let_assert!(Err(err) = RawIndex::from_json(r#"{"demo":{"t":[],"n":[]}}"#));
        let_assert!(Malformation::Syntax(message) = err.reason);
        check!(message.contains("missing field"));
    }

    #[test]
    fn script_output_reads_back() {
        let_assert!(Ok(mut raw) = RawIndex::from_json(DEMO_JSON));
        raw.crates.get_mut("demo").unwrap().doc = "it's a \\ test".to_string();
        let_assert!(Ok(script) = raw.to_js());
        check!(script.starts_with("var searchIndex = JSON.parse('{\\\n\"demo\":"));
        check!(script.contains("window.initSearch(searchIndex)"));
        check!(script.contains("exports.searchIndex = searchIndex"));
        let_assert!(Ok(back) = RawIndex::from_payload(&script));
        check!(back == raw);
    }

    #[test]
    fn empty_index_script() {
        let_assert!(Ok(script) = RawIndex::default().to_js());
        let_assert!(Ok(back) = RawIndex::from_payload(&script));
        check!(back.crates.is_empty());
    }
}
