//! Pagination rewriting.
//!
//! Only the last `LIMIT` at parenthesis depth zero is considered, so limits
//! inside sub-queries are never touched. The statement must be a `SELECT`, a
//! `WITH` query or a parenthesized compound query; any other statement with a
//! top-level `LIMIT` is a gap for dialects without `LIMIT first,count`.

use crate::dialect::{Dialect, PaginationStyle};
use crate::lexer::{depths, tokenize, Keyword, Token, TokenKind};

/// A statement the dialect cannot paginate, with the statement to fall back
/// to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Gap {
    pub reason: String,
    pub fallback: String,
}

impl Gap {
    fn new(reason: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fallback: fallback.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Number(u64),
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `LIMIT count`
    Count(Operand),
    /// `LIMIT first,count`
    Comma(Operand, Operand),
    /// `LIMIT count OFFSET first`
    Offset(Operand, Operand),
}

/// The depth-zero `LIMIT` of a statement.
struct LimitClause {
    /// Token index of `LIMIT`.
    index: usize,
    shape: Shape,
    /// Byte offset of whatever follows the operands (`;`, `FOR UPDATE`).
    rest: usize,
}

impl LimitClause {
    /// Returns `(first, count)` when both operands are literal numbers.
    fn window(&self) -> Option<(u64, u64)> {
        match self.shape {
            Shape::Count(Operand::Number(count)) => Some((0, count)),
            Shape::Comma(Operand::Number(first), Operand::Number(count))
            | Shape::Offset(Operand::Number(count), Operand::Number(first)) => {
                Some((first, count))
            }
            _ => None,
        }
    }
}

fn operand(text: &str, token: &Token) -> Option<Operand> {
    match token.kind {
        TokenKind::Number => token.span.slice(text).parse().ok().map(Operand::Number),
        TokenKind::Placeholder(_) => Some(Operand::Placeholder),
        _ => None,
    }
}

/// Whether the statement is a query whose result can be paginated:
/// a `SELECT`, a `WITH` query or a parenthesized compound query.
fn is_query(tokens: &[Token]) -> bool {
    tokens.first().is_some_and(|t| {
        t.is_keyword(Keyword::Select)
            || t.is_keyword(Keyword::With)
            || t.kind == TokenKind::LeftParen
    })
}

/// Parses the operands of the `LIMIT` at token `index`.
fn parse_limit(text: &str, tokens: &[Token], index: usize) -> Option<LimitClause> {
    let at = |i: usize| tokens.get(index + i);
    let first = operand(text, at(1)?)?;
    let (shape, next) = match (at(2), at(3).and_then(|t| operand(text, t))) {
        (Some(sep), Some(second)) if sep.kind == TokenKind::Comma => {
            (Shape::Comma(first, second), 4)
        }
        (Some(sep), Some(second)) if sep.is_keyword(Keyword::Offset) => {
            (Shape::Offset(first, second), 4)
        }
        _ => (Shape::Count(first), 2),
    };
    // Operands must be whole: `LIMIT 2+3` or `LIMIT 5, x` is not understood.
    let after = at(next)?;
    match after.kind {
        TokenKind::Eof | TokenKind::Semicolon | TokenKind::Identifier | TokenKind::Keyword(_) => {
            Some(LimitClause {
                index,
                shape,
                rest: after.span.start,
            })
        }
        _ => None,
    }
}

/// Appends the clauses that followed `LIMIT` to a rewritten statement.
fn append_rest(sql: String, rest: &str) -> String {
    if rest.is_empty() || rest.starts_with(';') {
        format!("{sql}{rest}")
    } else {
        format!("{sql} {rest}")
    }
}

/// Rewrites the depth-zero `LIMIT` of `text` into the dialect's pagination.
///
/// A `LIMIT` that cannot be rewritten is a gap, never a pass-through.
pub(crate) fn rewrite(text: &str, dialect: &dyn Dialect) -> Result<String, Gap> {
    let style = dialect.pagination_style();
    if style == PaginationStyle::LimitComma {
        return Ok(text.to_string());
    }
    let tokens = tokenize(text);
    let depths = depths(&tokens);
    let Some(index) = tokens
        .iter()
        .zip(&depths)
        .rposition(|(t, &d)| d == 0 && t.is_keyword(Keyword::Limit))
    else {
        return Ok(text.to_string());
    };

    let limit = match parse_limit(text, &tokens, index) {
        Some(limit) if is_query(&tokens) => limit,
        _ => {
            return Err(Gap::new(
                "LIMIT is not in a form the dialect can rewrite",
                text,
            ))
        }
    };

    let before = text[..tokens[limit.index].span.start].trim_end();
    let rest = text[limit.rest..].trim();

    if style == PaginationStyle::LimitOffset {
        return match limit.shape {
            Shape::Count(_) | Shape::Offset(..) => Ok(text.to_string()),
            Shape::Comma(Operand::Number(first), Operand::Number(count)) => Ok(append_rest(
                format!("{before} LIMIT {count} OFFSET {first}"),
                rest,
            )),
            Shape::Comma(..) => Err(Gap::new(
                "LIMIT first,count with placeholder operands cannot be reordered",
                text,
            )),
        };
    }

    if !rest.is_empty() && rest != ";" {
        return Err(Gap::new(
            "clauses after LIMIT cannot be moved into a row window",
            text,
        ));
    }
    let Some((first, count)) = limit.window() else {
        return Err(Gap::new(
            "LIMIT operands must be numbers to build a row window",
            text,
        ));
    };
    let end = first.saturating_add(count);

    match style {
        PaginationStyle::RowNum => Ok(format!(
            "SELECT * FROM (SELECT GFORM.*, ROWNUM ROWNUM_ FROM ({before}) GFORM \
             WHERE ROWNUM <= {end}) WHERE ROWNUM_ >= {}{rest}",
            first.saturating_add(1)
        )),
        _ if tokens[0].is_keyword(Keyword::Select) => {
            row_number(text, &tokens, &depths, limit.index, first, count, rest)
        }
        _ => Err(Gap::new("a row window needs a plain SELECT", text)),
    }
}

/// Builds the SQL Server window for `LIMIT first,count`.
fn row_number(
    text: &str,
    tokens: &[Token],
    depths: &[usize],
    limit: usize,
    first: u64,
    count: u64,
    tail: &str,
) -> Result<String, Gap> {
    let end = first.saturating_add(count);
    let limit_start = tokens[limit].span.start;
    let select_end = tokens[0].span.end;
    let distinct = tokens
        .get(1)
        .filter(|t| t.is_keyword(Keyword::Distinct));

    let order = (0..limit).rev().find(|&i| {
        depths[i] == 0
            && tokens[i].is_keyword(Keyword::Order)
            && tokens.get(i + 1).is_some_and(|t| t.is_keyword(Keyword::By))
    });

    if let Some(order) = order {
        let body = text[select_end..tokens[order].span.start].trim();
        let order_by = text[tokens[order + 1].span.end..limit_start].trim();
        let holders_in = |range: std::ops::Range<usize>| {
            tokens[range].iter().any(Token::is_placeholder)
        };
        if holders_in(order + 2..limit) && holders_in(1..order) {
            return Err(Gap::new(
                "ORDER BY placeholders would move ahead of the query's own",
                text,
            ));
        }
        // ROW_NUMBER() cannot precede DISTINCT, so distinct rows are
        // windowed from a derived table.
        let source = match distinct {
            Some(_) if tokens[order + 2..limit].iter().any(|t| t.kind == TokenKind::Dot) => {
                return Err(Gap::new(
                    "qualified ORDER BY columns cannot address a DISTINCT derived table",
                    text,
                ));
            }
            Some(_) => format!("TMP_D_.* FROM (SELECT {body}) AS TMP_D_"),
            None => body.to_string(),
        };
        return Ok(format!(
            "SELECT * FROM (SELECT ROW_NUMBER() OVER (ORDER BY {order_by}) AS ROWNUM_, {source}) AS TMP_ \
             WHERE TMP_.ROWNUM_ > {first} AND TMP_.ROWNUM_ <= {end}{tail}"
        ));
    }

    let body = text[select_end..limit_start].trim();
    let inner = match distinct {
        Some(t) => {
            let rest = text[t.span.end..limit_start].trim();
            format!("SELECT DISTINCT TOP {end} {rest}")
        }
        None => format!("SELECT TOP {end} {body}"),
    };
    let windowed =
        format!("SELECT * FROM (SELECT TOP {count} * FROM ({inner}) AS TMP1_) AS TMP2_{tail}");
    if first > 0 {
        return Err(Gap::new(
            "skipping rows without ORDER BY has no stable order",
            windowed,
        ));
    }
    Ok(windowed)
}
