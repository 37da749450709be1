//! Oracle dialect.

use super::{Dialect, PaginationStyle, PlaceholderStyle};

/// Oracle: `:vN` placeholders and nested `ROWNUM` windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::ColonV
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::RowNum
    }
}
