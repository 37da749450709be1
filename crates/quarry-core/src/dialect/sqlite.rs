//! SQLite dialect.

use super::Dialect;

/// SQLite accepts the MySQL forms unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_chars(&self) -> (char, char) {
        ('`', '`')
    }
}
