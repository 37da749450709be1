//! Identifier quoting.
//!
//! Quoting is purely syntactic: a token is wrapped in the dialect's quote
//! characters when it looks like a plain identifier and is left untouched
//! otherwise. A segment that already carries quote characters is kept as
//! written, so re-quoting never doubles quotes but also never converts
//! another dialect's quotes. Adding a table prefix is idempotent too.

use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;

/// A single quotable word: no dots, no whitespace, no operators.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_]+$").expect("valid word pattern"));

/// A field name, possibly dotted.
static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.\-]+$").expect("valid field name pattern"));

/// A trailing comparison operator, with the column before it.
static TRAILING_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^(?P<column>.*?)\s*(?P<op><=|>=|<>|!=|<|>|=|\bnot\s+like|\blike|\bnot\s+in|\bin)\s*$",
    )
    .expect("valid operator pattern")
});

/// Returns true if `s` is a bare, possibly dotted, field name.
#[must_use]
pub fn is_field_name(s: &str) -> bool {
    FIELD_NAME.is_match(s)
}

/// Splits a key ending in a comparison operator into `(column, operator)`.
///
/// Word operators are returned upper-cased with single spaces
/// (`"name not like"` gives `("name", "NOT LIKE")`).
#[must_use]
pub fn split_trailing_operator(key: &str) -> Option<(&str, String)> {
    let caps = TRAILING_OPERATOR.captures(key)?;
    let column = caps.name("column")?.as_str();
    if column.trim().is_empty() {
        return None;
    }
    let op = caps.name("op")?.as_str();
    let op = if op.starts_with(|c: char| c.is_ascii_alphabetic()) {
        op.split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        op.to_string()
    };
    Some((column, op))
}

/// Returns true if `s` is a sub-query fragment (leading `(` or `SELECT`).
#[must_use]
pub fn is_sub_query(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with('(')
        || s.split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("select"))
}

/// Quotes a single word if it is a plain identifier.
///
/// `NULL` and words that already contain a quote character are returned
/// unchanged.
#[must_use]
pub fn quote_word(word: &str, left: char, right: char) -> String {
    if WORD.is_match(word) && !word.eq_ignore_ascii_case("null") {
        format!("{left}{word}{right}")
    } else {
        word.to_string()
    }
}

/// Quotes every leaf of a comma list of dotted names.
///
/// Only the first space-separated token of each item is quoted, so aliases
/// and `ASC`/`DESC` suffixes are kept. Items are rejoined with `,`.
#[must_use]
pub fn quote_string(s: &str, left: char, right: char) -> String {
    if s.trim().is_empty() || is_sub_query(s) || split_trailing_operator(s).is_some() {
        return s.to_string();
    }
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| quote_item(item, left, right))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_item(item: &str, left: char, right: char) -> String {
    let mut words = item.split_whitespace();
    let Some(head) = words.next() else {
        return String::new();
    };
    let head = head
        .split('.')
        .map(|segment| {
            if segment.is_empty() {
                String::new()
            } else {
                quote_word(segment, left, right)
            }
        })
        .collect::<Vec<_>>()
        .join(".");
    std::iter::once(head)
        .chain(words.map(str::to_string))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quotes a table list, adding `prefix` to the last dotted segment of each
/// table.
///
/// Existing quote characters are stripped first. A segment that already starts
/// with the prefix is not prefixed again.
#[must_use]
pub fn quote_table_name(table: &str, prefix: &str, left: char, right: char) -> String {
    if table.trim().is_empty() || is_sub_query(table) {
        return table.to_string();
    }
    let strip = |s: &str| s.trim_matches(|c| c == left || c == right).to_string();
    table
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let mut words = item.split_whitespace();
            let head = words.next().unwrap_or_default();
            let mut segments: Vec<String> = strip(head).split('.').map(strip).collect();
            if let Some(last) = segments.last_mut() {
                if !prefix.is_empty() && !(last.len() > prefix.len() && last.starts_with(prefix)) {
                    *last = format!("{prefix}{last}");
                }
            }
            let rest: Vec<&str> = words.collect();
            let head = quote_item(&segments.join("."), left, right);
            if rest.is_empty() {
                head
            } else {
                format!("{head} {}", rest.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Quotes `s` with the quote characters of `dialect`.
#[must_use]
pub fn quote_identifier(s: &str, dialect: &dyn Dialect) -> String {
    let (left, right) = dialect.quote_chars();
    quote_string(s, left, right)
}
