//! Canonicalization of arguments before binding.

use crate::clause::CompiledClause;
use crate::lexer::{splice, tokenize};
use crate::value::{SqlValue, TIMESTAMP_FORMAT};

/// What a normalized argument turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Text to write into the statement in place of the placeholder.
    Inline(String),
    /// A value to bind.
    Bind(SqlValue),
}

/// Normalizes one argument value.
///
/// Raw values are inlined, timestamps become their canonical
/// timezone-qualified text, stringers are stringified, and everything else
/// passes through unchanged.
#[must_use]
pub fn normalize(value: SqlValue) -> Normalized {
    match value {
        SqlValue::Raw(sql) => Normalized::Inline(sql),
        SqlValue::Timestamp(t) => {
            Normalized::Bind(SqlValue::Text(t.format(TIMESTAMP_FORMAT).to_string()))
        }
        SqlValue::Stringer(s) => Normalized::Bind(SqlValue::Text(s.to_string())),
        other => Normalized::Bind(other),
    }
}

/// Normalizes a value that is known not to be raw.
///
/// Raw values are turned into text so the result is always bindable.
#[must_use]
pub fn normalize_bound(value: SqlValue) -> SqlValue {
    match normalize(value) {
        Normalized::Inline(sql) => SqlValue::Text(sql),
        Normalized::Bind(value) => value,
    }
}

/// Normalizes every argument of a clause.
///
/// Raw arguments are written over their `?`, and sub-query arguments are
/// inlined in parentheses with their own arguments spliced in place. List
/// elements are normalized one by one.
#[must_use]
pub fn normalize_clause(text: &str, args: Vec<SqlValue>) -> CompiledClause {
    inline_with(text, args, normalize_bound)
}

/// Inlines raw and sub-query arguments, converting the rest with `bind`.
pub(crate) fn inline_with(
    text: &str,
    args: Vec<SqlValue>,
    bind: fn(SqlValue) -> SqlValue,
) -> CompiledClause {
    let convert = |value: SqlValue| match value {
        SqlValue::List(items) => SqlValue::List(items.into_iter().map(bind).collect()),
        other => bind(other),
    };
    if !args
        .iter()
        .any(|arg| matches!(arg, SqlValue::Raw(_) | SqlValue::SubQuery(_)))
    {
        return CompiledClause::new(text, args.into_iter().map(convert).collect());
    }

    let mut replacements = Vec::new();
    let mut bound = Vec::with_capacity(args.len());
    let mut args = args.into_iter();
    for token in tokenize(text).iter().filter(|t| t.is_question()) {
        let Some(arg) = args.next() else {
            break;
        };
        match arg {
            SqlValue::Raw(sql) => replacements.push((token.span, sql)),
            SqlValue::SubQuery(clause) => {
                let inner = inline_with(&clause.text, clause.args, bind);
                replacements.push((token.span, format!("({})", inner.text)));
                bound.extend(inner.args);
            }
            other => bound.push(convert(other)),
        }
    }
    bound.extend(args.map(convert));
    CompiledClause::new(splice(text, &replacements), bound)
}
