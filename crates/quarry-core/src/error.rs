//! Error types for condition compilation and dialect translation.

/// Errors produced while compiling conditions or translating statements.
///
/// Every error is returned as a value so that a fluent builder can keep the
/// first one and surface it when the statement is finally built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input string could not be parsed into the expected parts.
    #[error("malformed input '{input}': {reason}")]
    MalformedInput {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A condition value has no compilation rule.
    #[error("unsupported condition shape: {0}")]
    UnsupportedShape(String),

    /// The dialect cannot safely express a construct of the statement.
    ///
    /// `fallback` holds the statement that would have been produced instead,
    /// so it can still be logged or inspected.
    #[error("dialect '{dialect}' cannot rewrite statement: {reason}")]
    DialectGap {
        /// Name of the target dialect.
        dialect: String,
        /// What could not be rewritten.
        reason: String,
        /// The least-surprising legal statement.
        fallback: String,
    },

    /// No dialect is registered under the requested name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

impl Error {
    /// Creates a `MalformedInput` error.
    #[must_use]
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `UnsupportedShape` error.
    #[must_use]
    pub fn unsupported(shape: impl Into<String>) -> Self {
        Self::UnsupportedShape(shape.into())
    }
}

/// Result type alias for quarry operations.
pub type Result<T> = std::result::Result<T, Error>;
