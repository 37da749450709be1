//! Registry of dialects by name.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{Dialect, MssqlDialect, MySqlDialect, OracleDialect, PostgresDialect, SqliteDialect};
use crate::error::{Error, Result};

/// Dialects keyed by lower-case name.
///
/// A registry is built once at startup and passed by reference to whatever
/// needs to resolve a dialect name; there is no process-wide instance.
#[derive(Clone, Default)]
pub struct DialectRegistry {
    dialects: IndexMap<String, Arc<dyn Dialect>>,
    aliases: IndexMap<String, String>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the five built-in dialects and their
    /// common aliases.
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new()
            .register(MySqlDialect)
            .register(PostgresDialect)
            .register(SqliteDialect)
            .register(MssqlDialect)
            .register(OracleDialect)
            .alias("postgres", "pgsql")
            .alias("postgresql", "pgsql")
            .alias("sqlite3", "sqlite")
            .alias("sqlserver", "mssql")
            .alias("mariadb", "mysql")
    }

    /// Registers `dialect` under its own name, replacing any previous entry.
    #[must_use]
    pub fn register<D: Dialect + 'static>(mut self, dialect: D) -> Self {
        let name = dialect.name().to_ascii_lowercase();
        tracing::trace!(dialect = %name, "registering dialect");
        self.dialects.insert(name, Arc::new(dialect));
        self
    }

    /// Makes `alias` resolve to the dialect registered as `target`.
    #[must_use]
    pub fn alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases
            .insert(alias.to_ascii_lowercase(), target.to_ascii_lowercase());
        self
    }

    /// Looks up a dialect by name or alias, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDialect`] if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Dialect>> {
        let key = name.trim().to_ascii_lowercase();
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.dialects
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnknownDialect(name.to_string()))
    }

    /// Returns the registered dialect names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.dialects.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.names())
            .field("aliases", &self.aliases)
            .finish()
    }
}
