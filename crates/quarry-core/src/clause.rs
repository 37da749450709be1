//! Compiled statement fragments.

use crate::lexer::count_placeholders;
use crate::value::SqlValue;

/// Canonical compiler output: statement text plus positional arguments.
///
/// Once flattened, the number of placeholders in `text` equals `args.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledClause {
    /// Statement text with placeholders.
    pub text: String,
    /// Arguments in placeholder order.
    pub args: Vec<SqlValue>,
}

impl CompiledClause {
    /// Creates a clause from text and arguments.
    #[must_use]
    pub fn new(text: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            text: text.into(),
            args,
        }
    }

    /// Returns true if the clause has no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns the number of placeholders in the text.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.text)
    }

    /// Returns true if placeholders and arguments line up one-to-one.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.placeholder_count() == self.args.len()
    }
}

impl From<&str> for CompiledClause {
    fn from(text: &str) -> Self {
        Self::new(text, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance() {
        let clause = CompiledClause::new("a=? AND b=?", vec![SqlValue::Int(1)]);
        assert_eq!(clause.placeholder_count(), 2);
        assert!(!clause.is_balanced());

        let clause = CompiledClause::new("a='?'", vec![]);
        assert!(clause.is_balanced());
    }

    #[test]
    fn test_is_empty() {
        assert!(CompiledClause::from("  ").is_empty());
        assert!(!CompiledClause::from("1=1").is_empty());
    }
}
