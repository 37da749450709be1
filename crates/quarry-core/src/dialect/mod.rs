//! SQL dialect support.
//!
//! A dialect is an immutable descriptor of a backend's syntax: quote
//! characters, placeholder form and pagination idiom. Everything upstream of
//! the translator speaks the universal `?` and `LIMIT first,count` forms.

mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod registry;
mod sqlite;

pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use registry::DialectRegistry;
pub use sqlite::SqliteDialect;

use crate::quote;

/// How bound arguments are marked in statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:v1`, `:v2`, ...
    ColonV,
    /// `@p1`, `@p2`, ...
    AtP,
}

impl PlaceholderStyle {
    /// Renders the placeholder for the 1-based argument `index`.
    #[must_use]
    pub fn render(self, index: usize) -> String {
        match self {
            Self::Question => String::from("?"),
            Self::Dollar => format!("${index}"),
            Self::ColonV => format!(":v{index}"),
            Self::AtP => format!("@p{index}"),
        }
    }
}

/// How a dialect expresses `LIMIT first,count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT first,count`, left as is.
    LimitComma,
    /// `LIMIT count OFFSET first`.
    LimitOffset,
    /// `ROW_NUMBER() OVER (...)` window, or nested `TOP`.
    RowNumber,
    /// Nested `ROWNUM` filters.
    RowNum,
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the left and right identifier quote characters.
    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    /// Returns the placeholder style.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    /// Returns the pagination style.
    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::LimitComma
    }

    /// Quotes an identifier list if its tokens are plain identifiers.
    fn quote_identifier(&self, name: &str) -> String {
        let (left, right) = self.quote_chars();
        quote::quote_string(name, left, right)
    }
}
