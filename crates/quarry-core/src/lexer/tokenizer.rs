//! Statement scanner.
//!
//! The scanner only needs to be precise about string literals, quoted
//! identifiers, comments, parentheses and placeholders. Everything else is
//! carried through by span so callers can rebuild the original text.

use super::{Keyword, Placeholder, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

const OPERATOR_CHARS: &str = "<>=!|&+-*/%~^:@#";

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- line comment
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // /* block comment */
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn scan_word(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.make_token(TokenKind::Number)
    }

    /// Scans a quoted run ending in `close`; a doubled `close` is an escape.
    ///
    /// Backslash escapes are honoured only when `backslash` is set, which is
    /// the case for `E'...'` strings alone.
    fn scan_quoted(&mut self, close: char, kind: TokenKind, backslash: bool) -> Token {
        loop {
            match self.advance() {
                Some('\\') if backslash => {
                    self.advance();
                }
                Some(c) if c == close => {
                    if self.peek() == Some(close) {
                        self.advance();
                    } else {
                        return self.make_token(kind);
                    }
                }
                Some(_) => {}
                None => return self.make_token(TokenKind::Unterminated),
            }
        }
    }

    /// Consumes `prefix` followed by at least one digit, if present.
    fn scan_numbered(&mut self, prefix: Option<char>) -> Option<usize> {
        let rest = &self.input[self.pos..];
        let digits_at = match prefix {
            Some(p) if rest.starts_with(p) => p.len_utf8(),
            Some(_) => return None,
            None => 0,
        };
        let digits: String = rest[digits_at..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            return None;
        }
        let end = digits_at + digits.len();
        // `:value` or `@param1x` are not placeholders.
        if rest[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            return None;
        }
        let index = digits.parse().ok()?;
        self.pos += end;
        Some(index)
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),
            '?' => self.make_token(TokenKind::Placeholder(Placeholder::Question)),
            '\'' => self.scan_quoted('\'', TokenKind::String, false),
            'E' | 'e' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_quoted('\'', TokenKind::String, true)
            }
            '"' => self.scan_quoted('"', TokenKind::QuotedIdentifier, false),
            '`' => self.scan_quoted('`', TokenKind::QuotedIdentifier, false),
            '[' => self.scan_quoted(']', TokenKind::QuotedIdentifier, false),
            '$' => match self.scan_numbered(None) {
                Some(n) => self.make_token(TokenKind::Placeholder(Placeholder::Dollar(n))),
                None => self.scan_word(),
            },
            ':' if self.peek() != Some(':') => match self.scan_numbered(Some('v')) {
                Some(n) => self.make_token(TokenKind::Placeholder(Placeholder::Colon(n))),
                None => self.scan_operator(),
            },
            '@' => match self.scan_numbered(Some('p')) {
                Some(n) => self.make_token(TokenKind::Placeholder(Placeholder::At(n))),
                None => self.scan_operator(),
            },
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            _ => self.scan_operator(),
        }
    }

    fn scan_operator(&mut self) -> Token {
        while self.peek().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
            // `-- comment` and `/* comment */` end the operator run.
            if matches!(
                (self.peek(), self.peek_next()),
                (Some('-'), Some('-')) | (Some('/'), Some('*'))
            ) {
                break;
            }
            self.advance();
        }
        self.make_token(TokenKind::Operator)
    }

    /// Tokenizes the entire input and returns all tokens, ending with `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds("   \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_placeholder_forms() {
        assert_eq!(
            token_kinds("? $2 :v3 @p4"),
            vec![
                TokenKind::Placeholder(Placeholder::Question),
                TokenKind::Placeholder(Placeholder::Dollar(2)),
                TokenKind::Placeholder(Placeholder::Colon(3)),
                TokenKind::Placeholder(Placeholder::At(4)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_not_placeholders() {
        let kinds = token_kinds("a::int @name :value");
        assert!(!kinds.iter().any(|k| matches!(k, TokenKind::Placeholder(_))));
    }

    #[test]
    fn test_question_inside_literal_is_ignored() {
        assert_eq!(
            token_kinds("name='who?' AND id=?"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::String,
                TokenKind::Keyword(Keyword::And),
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Placeholder(Placeholder::Question),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            token_kinds(r"'it''s' E'a\'b' e'c\\'"),
            vec![
                TokenKind::String,
                TokenKind::String,
                TokenKind::String,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_backslash_is_literal_in_standard_strings() {
        assert_eq!(
            token_kinds(r"p='C:\' AND id=?"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::String,
                TokenKind::Keyword(Keyword::And),
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Placeholder(Placeholder::Question),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifier_starting_with_e() {
        assert_eq!(
            token_kinds("email=?"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Placeholder(Placeholder::Question),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        assert_eq!(
            token_kinds("\"a?\" `b` [c d]"),
            vec![
                TokenKind::QuotedIdentifier,
                TokenKind::QuotedIdentifier,
                TokenKind::QuotedIdentifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            token_kinds("a -- why?\n/* or? */ b"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            token_kinds("'abc"),
            vec![TokenKind::Unterminated, TokenKind::Eof]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("age >= ?").tokenize();
        assert_eq!(tokens[1].span, Span::new(4, 6));
        assert_eq!(tokens[2].span, Span::new(7, 8));
    }
}
