//! Token types for the statement scanner.

use super::Span;

/// Keywords that matter to compilation and translation.
///
/// Every other word is reported as an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    Having,
    On,
    And,
    Or,
    Not,
    In,
    Is,
    Like,
    Null,
    As,
    Distinct,
    Order,
    Group,
    By,
    Limit,
    Offset,
    Union,
    With,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "HAVING" => Some(Self::Having),
            "ON" => Some(Self::On),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "IN" => Some(Self::In),
            "IS" => Some(Self::Is),
            "LIKE" => Some(Self::Like),
            "NULL" => Some(Self::Null),
            "AS" => Some(Self::As),
            "DISTINCT" => Some(Self::Distinct),
            "ORDER" => Some(Self::Order),
            "GROUP" => Some(Self::Group),
            "BY" => Some(Self::By),
            "LIMIT" => Some(Self::Limit),
            "OFFSET" => Some(Self::Offset),
            "UNION" => Some(Self::Union),
            "WITH" => Some(Self::With),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Having => "HAVING",
            Self::On => "ON",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Is => "IS",
            Self::Like => "LIKE",
            Self::Null => "NULL",
            Self::As => "AS",
            Self::Distinct => "DISTINCT",
            Self::Order => "ORDER",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Union => "UNION",
            Self::With => "WITH",
        }
    }
}

/// A bound-argument marker in one of the supported dialect forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Question,
    /// `$N`
    Dollar(usize),
    /// `:vN`
    Colon(usize),
    /// `@pN`
    At(usize),
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A recognized keyword.
    Keyword(Keyword),
    /// An unquoted word that is not a keyword.
    Identifier,
    /// A quoted identifier (`"a"`, `` `a` ``, `[a]`).
    QuotedIdentifier,
    /// A string literal.
    String,
    /// A numeric literal.
    Number,
    /// A placeholder.
    Placeholder(Placeholder),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,
    /// A run of operator characters (`>=`, `<>`, `::`, ...).
    Operator,
    /// Unterminated literal or quoted identifier.
    Unterminated,
    /// End of input.
    Eof,
}

/// A token with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The byte range in the input.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Returns true if this token is a placeholder of any form.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.kind, TokenKind::Placeholder(_))
    }

    /// Returns true if this token is the universal `?` placeholder.
    #[must_use]
    pub const fn is_question(&self) -> bool {
        matches!(self.kind, TokenKind::Placeholder(Placeholder::Question))
    }
}
