//! Statement scanner.
//!
//! A hand-written lexer that produces a stream of spanned tokens. It is what
//! lets the flattener, the translator and the debug renderer find real
//! placeholders and parenthesis depth without being fooled by literals.

mod span;
mod token;
mod tokenizer;

pub use span::{splice, Span};
pub use token::{Keyword, Placeholder, Token, TokenKind};
pub use tokenizer::Lexer;

/// Tokenizes `input`, ending with an `Eof` token.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

/// Counts placeholders of any dialect form in `input`.
#[must_use]
pub fn count_placeholders(input: &str) -> usize {
    tokenize(input).iter().filter(|t| t.is_placeholder()).count()
}

/// Returns the parenthesis depth at which each token sits.
///
/// A `(` sits at the depth outside of it and its matching `)` at the same
/// depth, so both brackets share the depth of the surrounding expression.
#[must_use]
pub fn depths(tokens: &[Token]) -> Vec<usize> {
    let mut depth = 0usize;
    tokens
        .iter()
        .map(|token| match token.kind {
            TokenKind::LeftParen => {
                depth += 1;
                depth - 1
            }
            TokenKind::RightParen => {
                depth = depth.saturating_sub(1);
                depth
            }
            _ => depth,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_placeholders() {
        assert_eq!(count_placeholders("a=? AND b IN (?,?)"), 3);
        assert_eq!(count_placeholders("a='?' AND b=$1"), 1);
        assert_eq!(count_placeholders("no markers"), 0);
    }

    #[test]
    fn test_depths() {
        let tokens = tokenize("a IN (b, (c))");
        let d = depths(&tokens);
        // a IN ( b , ( c ) ) Eof
        assert_eq!(d, vec![0, 0, 0, 1, 1, 1, 2, 1, 0, 0]);
    }
}
