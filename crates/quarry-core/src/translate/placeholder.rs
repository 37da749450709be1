//! Placeholder numbering.

use crate::dialect::PlaceholderStyle;
use crate::lexer::{splice, tokenize};

/// Rewrites every `?` in `text` into `style`, numbering from 1.
///
/// Placeholders inside literals, quoted identifiers and comments are left
/// alone, as are placeholders that are already numbered.
#[must_use]
pub fn number_placeholders(text: &str, style: PlaceholderStyle) -> String {
    if style == PlaceholderStyle::Question {
        return text.to_string();
    }
    let replacements: Vec<_> = tokenize(text)
        .iter()
        .filter(|t| t.is_question())
        .enumerate()
        .map(|(i, t)| (t.span, style.render(i + 1)))
        .collect();
    splice(text, &replacements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        let sql = "a=? AND b IN (?,?)";
        assert_eq!(
            number_placeholders(sql, PlaceholderStyle::Dollar),
            "a=$1 AND b IN ($2,$3)"
        );
        assert_eq!(
            number_placeholders(sql, PlaceholderStyle::ColonV),
            "a=:v1 AND b IN (:v2,:v3)"
        );
        assert_eq!(
            number_placeholders(sql, PlaceholderStyle::AtP),
            "a=@p1 AND b IN (@p2,@p3)"
        );
        assert_eq!(number_placeholders(sql, PlaceholderStyle::Question), sql);
    }

    #[test]
    fn test_literals_are_untouched() {
        assert_eq!(
            number_placeholders("note='why?' AND id=? -- really?", PlaceholderStyle::Dollar),
            "note='why?' AND id=$1 -- really?"
        );
    }
}
