//! Byte ranges of tokens inside a statement.

/// A byte range in the scanned statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merges two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Returns the text covered by this span.
    #[must_use]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Rebuilds `input` with each span replaced by its paired text.
///
/// Spans must be sorted and must not overlap.
#[must_use]
pub fn splice(input: &str, replacements: &[(Span, String)]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    for (span, text) in replacements {
        out.push_str(&input[cursor..span.start]);
        out.push_str(text);
        cursor = span.end;
    }
    out.push_str(&input[cursor..]);
    out
}
