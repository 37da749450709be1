//! MySQL dialect.

use super::Dialect;

/// MySQL: backtick quoting, `?` placeholders, `LIMIT first,count`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_chars(&self) -> (char, char) {
        ('`', '`')
    }
}
