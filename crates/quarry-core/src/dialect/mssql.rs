//! SQL Server dialect.

use super::{Dialect, PaginationStyle, PlaceholderStyle};

/// SQL Server: `@pN` placeholders, `ROW_NUMBER()` or `TOP` pagination.
#[derive(Debug, Default, Clone, Copy)]
pub struct MssqlDialect;

impl Dialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::AtP
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::RowNumber
    }
}
