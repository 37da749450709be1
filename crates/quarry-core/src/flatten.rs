//! Argument flattening.
//!
//! Expands list arguments into one placeholder per element so that every
//! placeholder binds exactly one scalar. An empty list cannot be expanded
//! into valid SQL (`IN ()`), so the boolean term holding it is replaced with
//! a constant predicate instead.

use crate::clause::CompiledClause;
use crate::lexer::{depths, splice, tokenize, Keyword, Span, Token, TokenKind};
use crate::normalize::{inline_with, normalize_clause};
use crate::value::SqlValue;

/// Flattens list arguments of `text` into individual placeholders.
///
/// - a non-empty list replaces its `?` with `?,?,...` and splices its
///   elements into the argument list;
/// - an empty list turns its enclosing boolean term into `0=1` (`1=1` for
///   `NOT IN`), dropping the arguments of that term;
/// - blobs are scalars and are never expanded;
/// - a single list whose length equals the placeholder count is spread over
///   the placeholders as is.
#[must_use]
pub fn flatten(text: &str, args: Vec<SqlValue>) -> CompiledClause {
    let CompiledClause { text, args } = inline_with(text, args, stringify);
    if !args.iter().any(SqlValue::is_list) {
        return CompiledClause::new(text, args);
    }

    let tokens = tokenize(&text);
    let questions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_question())
        .map(|(i, _)| i)
        .collect();

    if let [SqlValue::List(items)] = args.as_slice() {
        if questions.len() > 1 && items.len() == questions.len() {
            let items = items.clone();
            return CompiledClause::new(text, items);
        }
    }

    let depths = depths(&tokens);
    let mut terms: Vec<(Span, &'static str)> = Vec::new();
    for (k, &index) in questions.iter().enumerate() {
        if matches!(args.get(k), Some(SqlValue::List(items)) if items.is_empty()) {
            let term = enclosing_term(&tokens, &depths, index);
            tracing::warn!(
                term = term.0.slice(&text),
                replacement = term.1,
                "empty list argument"
            );
            terms.push(term);
        }
    }
    let terms = merge_terms(terms);
    let covered = |span: Span| {
        terms
            .iter()
            .any(|(term, _)| term.start <= span.start && span.end <= term.end)
    };

    let mut replacements: Vec<(Span, String)> = terms
        .iter()
        .map(|(span, predicate)| (*span, (*predicate).to_string()))
        .collect();
    let mut flat = Vec::with_capacity(args.len());
    let mut args = args.into_iter();
    for &index in &questions {
        let Some(arg) = args.next() else {
            break;
        };
        let span = tokens[index].span;
        if covered(span) {
            continue;
        }
        match arg {
            SqlValue::List(items) => {
                replacements.push((span, vec!["?"; items.len()].join(",")));
                flat.extend(items);
            }
            other => flat.push(other),
        }
    }
    flat.extend(args);
    replacements.sort_by_key(|(span, _)| span.start);

    CompiledClause::new(splice(&text, &replacements), flat)
}

/// Flattens a hand-written statement and its arguments.
///
/// Raw arguments are written into the statement, sub-queries are inlined, and
/// list arguments are expanded.
#[must_use]
pub fn format_query(sql: &str, args: Vec<SqlValue>) -> CompiledClause {
    let clause = normalize_clause(sql, args);
    flatten(&clause.text, clause.args)
}

/// Stringifies `Display` values; timestamps and everything else pass through.
fn stringify(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Stringer(s) => SqlValue::Text(s.to_string()),
        other => other,
    }
}

/// Tokens that end a boolean term at the term's depth.
fn is_boundary(token: &Token) -> bool {
    match token.kind {
        TokenKind::Keyword(keyword) => matches!(
            keyword,
            Keyword::And
                | Keyword::Or
                | Keyword::Where
                | Keyword::Having
                | Keyword::On
                | Keyword::Order
                | Keyword::Group
                | Keyword::Limit
                | Keyword::Union
                | Keyword::Select
                | Keyword::From
        ),
        TokenKind::Comma | TokenKind::Semicolon | TokenKind::Eof => true,
        _ => false,
    }
}

/// Finds the boolean term around the placeholder at `index`.
///
/// Returns the term's span and the constant predicate replacing it.
fn enclosing_term(tokens: &[Token], depths: &[usize], index: usize) -> (Span, &'static str) {
    // `IN (?)` is one operand; the term sits at the depth of its parentheses.
    let anchor = if index >= 2
        && tokens[index - 1].kind == TokenKind::LeftParen
        && tokens[index - 2].is_keyword(Keyword::In)
        && tokens
            .get(index + 1)
            .is_some_and(|t| t.kind == TokenKind::RightParen)
    {
        index - 1
    } else {
        index
    };
    let level = depths[anchor];

    let mut start = anchor;
    while start > 0 {
        let j = start - 1;
        if depths[j] < level || (depths[j] == level && is_boundary(&tokens[j])) {
            break;
        }
        start = j;
    }

    let mut end = anchor + 1;
    while end < tokens.len() {
        if depths[end] < level || (depths[end] == level && is_boundary(&tokens[end])) {
            break;
        }
        end += 1;
    }

    let negated = (start..end.saturating_sub(1)).any(|i| {
        depths[i] == level
            && tokens[i].is_keyword(Keyword::Not)
            && tokens[i + 1].is_keyword(Keyword::In)
    });
    let span = Span::new(tokens[start].span.start, tokens[end - 1].span.end);
    (span, if negated { "1=1" } else { "0=1" })
}

/// Merges overlapping term spans; a false predicate wins.
fn merge_terms(mut terms: Vec<(Span, &'static str)>) -> Vec<(Span, &'static str)> {
    terms.sort_by_key(|(span, _)| span.start);
    let mut merged: Vec<(Span, &'static str)> = Vec::with_capacity(terms.len());
    for (span, predicate) in terms {
        match merged.last_mut() {
            Some((last, last_predicate)) if span.start < last.end => {
                *last = last.merge(span);
                if predicate == "0=1" {
                    *last_predicate = predicate;
                }
            }
            _ => merged.push((span, predicate)),
        }
    }
    merged
}
