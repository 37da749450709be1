//! Read-only table metadata lookups.
//!
//! The compiler asks a [`FieldLookup`] whether a bare column belongs to the
//! table named by `CompileOptions::table_prefix` before qualifying it.

use std::collections::{HashMap, HashSet};

/// Answers whether a table has a field.
pub trait FieldLookup {
    /// Returns true if `table` has a field named `field`.
    fn has_field(&self, table: &str, field: &str) -> bool;
}

impl<F> FieldLookup for F
where
    F: Fn(&str, &str) -> bool,
{
    fn has_field(&self, table: &str, field: &str) -> bool {
        self(table, field)
    }
}

/// An in-memory table to fields map.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    tables: HashMap<String, HashSet<String>>,
}

impl StaticSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `table` with its fields.
    #[must_use]
    pub fn table<I, S>(mut self, table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(table.into())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
        self
    }
}

impl FieldLookup for StaticSchema {
    fn has_field(&self, table: &str, field: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|fields| fields.contains(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_schema() {
        let schema = StaticSchema::new().table("user", ["id", "name"]);
        assert!(schema.has_field("user", "id"));
        assert!(!schema.has_field("user", "age"));
        assert!(!schema.has_field("order", "id"));
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |_: &str, field: &str| field.starts_with("u_");
        assert!(lookup.has_field("any", "u_id"));
        assert!(!lookup.has_field("any", "id"));
    }
}
