//! PostgreSQL dialect.

use super::{Dialect, PaginationStyle, PlaceholderStyle};

/// PostgreSQL: `$N` placeholders and `LIMIT count OFFSET first`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "pgsql"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::LimitOffset
    }
}
