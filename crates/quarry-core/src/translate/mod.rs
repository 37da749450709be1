//! Dialect translation.
//!
//! The last pass before a statement reaches a driver. It rewrites the
//! universal `?` placeholder and MySQL-style `LIMIT first,count` into the
//! target dialect's syntax. Translation is a pure function of the statement
//! and the dialect.

mod pagination;
mod placeholder;

pub use placeholder::number_placeholders;

use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// Translates `text` into `dialect`'s placeholder and pagination syntax.
///
/// Pagination is rewritten first, then placeholders are numbered in textual
/// order of the rewritten statement.
///
/// # Errors
///
/// Returns [`Error::DialectGap`] when the statement's pagination cannot be
/// expressed safely. The error carries the translated fallback statement.
pub fn translate(text: &str, dialect: &dyn Dialect) -> Result<String> {
    let style = dialect.placeholder_style();
    match pagination::rewrite(text, dialect) {
        Ok(paged) => {
            let translated = number_placeholders(&paged, style);
            tracing::debug!(dialect = dialect.name(), sql = %translated, "translated statement");
            Ok(translated)
        }
        Err(gap) => {
            let fallback = number_placeholders(&gap.fallback, style);
            tracing::warn!(
                dialect = dialect.name(),
                reason = %gap.reason,
                fallback = %fallback,
                "dialect cannot rewrite statement"
            );
            Err(Error::DialectGap {
                dialect: dialect.name().to_string(),
                reason: gap.reason,
                fallback,
            })
        }
    }
}
