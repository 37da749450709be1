//! Literal rendering of statements for logs.

use crate::lexer::{splice, tokenize};
use crate::value::SqlValue;

/// Substitutes `args` into the placeholders of `sql`, in textual order.
///
/// Placeholders of every dialect form are recognized. Strings, lists, maps
/// and timestamps are quoted with embedded quotes doubled, raw values are
/// written verbatim and null renders as `null`. Placeholders beyond the last
/// argument are left as they are.
///
/// The output is for humans and must never be sent to a driver.
#[must_use]
pub fn render_for_debug(sql: &str, args: &[SqlValue]) -> String {
    let replacements: Vec<_> = tokenize(sql)
        .iter()
        .filter(|t| t.is_placeholder())
        .zip(args)
        .map(|(t, arg)| (t.span, arg.to_sql_inline()))
        .collect();
    splice(sql, &replacements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_question_marks() {
        assert_eq!(
            render_for_debug(
                "select * from t where id=? and name=?",
                &[SqlValue::Int(1), SqlValue::Null]
            ),
            "select * from t where id=1 and name=null"
        );
    }

    #[test]
    fn test_render_numbered_forms() {
        let args = [SqlValue::Text(String::from("it's")), SqlValue::Bool(true)];
        assert_eq!(
            render_for_debug("a=$1 AND b=$2", &args),
            "a='it''s' AND b=true"
        );
        assert_eq!(
            render_for_debug("a=:v1 AND b=:v2", &args),
            "a='it''s' AND b=true"
        );
        assert_eq!(
            render_for_debug("a=@p1 AND b=@p2", &args),
            "a='it''s' AND b=true"
        );
    }

    #[test]
    fn test_render_raw_and_lists() {
        let args = [
            SqlValue::raw("NOW()"),
            SqlValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)]),
        ];
        assert_eq!(
            render_for_debug("t<? AND id IN (?)", &args),
            "t<NOW() AND id IN ('[1,2]')"
        );
    }

    #[test]
    fn test_literal_question_marks_are_kept() {
        assert_eq!(
            render_for_debug("note='?' AND id=?", &[SqlValue::Int(7)]),
            "note='?' AND id=7"
        );
    }

    #[test]
    fn test_missing_arguments_leave_placeholders() {
        assert_eq!(render_for_debug("a=? AND b=?", &[SqlValue::Int(1)]), "a=1 AND b=?");
    }
}
