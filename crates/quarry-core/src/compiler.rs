//! Condition compiler.
//!
//! Renders a [`Condition`] into a [`CompiledClause`] using only the universal
//! `?` placeholder. Dialect-specific syntax is left to the translator; the
//! dialect is consulted only for identifier quote characters.

use crate::clause::CompiledClause;
use crate::condition::{Condition, Fields, Joiner};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::lexer::{count_placeholders, depths, tokenize, Keyword};
use crate::normalize::normalize_clause;
use crate::quote::{is_field_name, quote_string, split_trailing_operator};
use crate::schema::FieldLookup;
use crate::value::SqlValue;

/// Options controlling condition compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Drop map pairs whose value is null.
    pub omit_nil: bool,
    /// Drop map pairs whose value is empty (null, zero, `""`, `[]`, ...).
    pub omit_empty: bool,
    /// Table name or alias used to qualify bare columns.
    pub table_prefix: Option<String>,
}

impl CompileOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `omit_nil`.
    #[must_use]
    pub const fn omit_nil(mut self, omit: bool) -> Self {
        self.omit_nil = omit;
        self
    }

    /// Sets `omit_empty`.
    #[must_use]
    pub const fn omit_empty(mut self, omit: bool) -> Self {
        self.omit_empty = omit;
        self
    }

    /// Sets the qualifying table prefix.
    #[must_use]
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }
}

/// Compiles conditions for one dialect.
pub struct Compiler<'a> {
    dialect: &'a dyn Dialect,
    lookup: Option<&'a dyn FieldLookup>,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    /// Creates a compiler with default options.
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            lookup: None,
            options: CompileOptions::default(),
        }
    }

    /// Sets the compile options.
    #[must_use]
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the field lookup used to decide table-prefix qualification.
    #[must_use]
    pub fn with_lookup(mut self, lookup: &'a dyn FieldLookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Compiles `condition` into text and pending arguments.
    ///
    /// List arguments are left whole; the flattener expands them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedShape`] for a value with no compilation
    /// rule.
    pub fn compile(&self, condition: Condition) -> Result<CompiledClause> {
        let clause = self.compile_condition(condition)?;
        let clause = normalize_clause(&clause.text, clause.args);
        tracing::trace!(
            sql = %clause.text,
            args = clause.args.len(),
            "compiled condition"
        );
        Ok(clause)
    }

    fn compile_condition(&self, condition: Condition) -> Result<CompiledClause> {
        match condition {
            Condition::Scalar(value) => self.compile_scalar(value),
            Condition::List(values) => self.compile_list(values),
            Condition::KeyValue(key, value) => self.compile_key_value(&key, value),
            Condition::Map(fields) => self.compile_map(fields),
            Condition::Raw(text, args) => self.compile_fragment(&text, args),
            Condition::SubQuery(clause) => Ok(clause),
            Condition::Composite(left, joiner, right) => {
                let left = self.compile_condition(*left)?;
                let right = self.compile_condition(*right)?;
                Ok(join(left, joiner, right))
            }
        }
    }

    fn compile_scalar(&self, value: SqlValue) -> Result<CompiledClause> {
        match value {
            SqlValue::Null => Ok(CompiledClause::default()),
            SqlValue::Text(text) | SqlValue::Raw(text) => self.compile_fragment(&text, Vec::new()),
            SqlValue::List(values) => self.compile_list(values),
            SqlValue::SubQuery(clause) => Ok(*clause),
            json @ SqlValue::Json(serde_json::Value::Object(_)) => {
                self.compile_condition(Condition::from(json))
            }
            other => Err(Error::unsupported(format!(
                "a bare {} value is not a condition",
                other.kind()
            ))),
        }
    }

    /// Even length: key/value pairs. Odd length: fragments, each followed by
    /// one argument per placeholder.
    fn compile_list(&self, values: Vec<SqlValue>) -> Result<CompiledClause> {
        if values.len() % 2 == 0 {
            let mut parts = Vec::with_capacity(values.len() / 2);
            let mut iter = values.into_iter();
            while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                let key = list_key(key)?;
                parts.push(self.compile_key_value(&key, value)?);
            }
            return Ok(join_all(parts, Joiner::And));
        }

        let mut text = Vec::new();
        let mut args = Vec::new();
        let mut iter = values.into_iter();
        while let Some(element) = iter.next() {
            let fragment = list_key(element)?;
            let holders = count_placeholders(&fragment);
            for _ in 0..holders {
                let arg = iter.next().ok_or_else(|| {
                    Error::unsupported(format!(
                        "list fragment '{fragment}' has {holders} placeholder(s) but too few values follow it"
                    ))
                })?;
                args.push(arg);
            }
            text.push(fragment);
        }
        Ok(CompiledClause::new(text.join(" "), args))
    }

    fn compile_map(&self, fields: Fields) -> Result<CompiledClause> {
        let omit_nil = self.options.omit_nil || fields.params;
        let mut parts = Vec::with_capacity(fields.pairs.len());
        for (key, value) in fields.pairs {
            if omit_nil && value.is_null() {
                continue;
            }
            if self.options.omit_empty && value.is_empty() {
                continue;
            }
            parts.push(self.compile_key_value(&key, value)?);
        }
        Ok(join_all(parts, Joiner::And))
    }

    fn compile_fragment(&self, text: &str, mut args: Vec<SqlValue>) -> Result<CompiledClause> {
        let holders = count_placeholders(text);
        if holders == 0 && args.len() == 1 {
            if let Some(value) = args.pop() {
                return self.compile_key_value(text, value);
            }
        }
        if let [SqlValue::List(items)] = args.as_slice() {
            if holders > 1 && items.len() == holders {
                return Ok(CompiledClause::new(text, items.clone()));
            }
        }
        Ok(CompiledClause::new(text, args))
    }

    /// Synthesizes the comparison for one key and its value.
    fn compile_key_value(&self, key: &str, value: SqlValue) -> Result<CompiledClause> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::unsupported("empty condition key"));
        }
        let holders = count_placeholders(key);

        match value {
            SqlValue::List(items) if holders > 0 && holders == items.len() => {
                Ok(CompiledClause::new(key, items))
            }
            SqlValue::List(items) if holders == 0 => {
                let text = match split_trailing_operator(key) {
                    Some((column, op)) if op == "IN" || op == "NOT IN" => {
                        format!("{} {op} (?)", self.qualify(column, false))
                    }
                    _ if is_field_name(key) => format!("{} IN (?)", self.qualify(key, true)),
                    _ => format!("{key} IN (?)"),
                };
                Ok(CompiledClause::new(text, vec![SqlValue::List(items)]))
            }
            SqlValue::Null => {
                if holders > 0 {
                    Ok(CompiledClause::new(key, vec![SqlValue::Null; holders]))
                } else if is_field_name(key) {
                    Ok(CompiledClause::new(
                        format!("{} IS NULL", self.qualify(key, true)),
                        Vec::new(),
                    ))
                } else {
                    Ok(CompiledClause::new(key, Vec::new()))
                }
            }
            value if holders > 0 => Ok(CompiledClause::new(key, vec![value])),
            value => {
                let text = if let Some((column, op)) = split_trailing_operator(key) {
                    let column = self.qualify(column, false);
                    match op.as_str() {
                        "IN" | "NOT IN" => format!("{column} {op} (?)"),
                        word if word.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                            format!("{column} {op} ?")
                        }
                        symbol => format!("{column}{symbol}?"),
                    }
                } else if is_field_name(key) {
                    let column = self.qualify(key, true);
                    if matches!(value, SqlValue::SubQuery(_)) {
                        format!("{column} IN ?")
                    } else {
                        format!("{column}=?")
                    }
                } else {
                    format!("{key}=?")
                };
                Ok(CompiledClause::new(text, vec![value]))
            }
        }
    }

    /// Qualifies a bare column with the table prefix, quoting it if asked.
    fn qualify(&self, column: &str, quote: bool) -> String {
        let column = column.trim();
        let (left, right) = self.dialect.quote_chars();
        let render = |s: &str| {
            if quote {
                quote_string(s, left, right)
            } else {
                s.to_string()
            }
        };
        match &self.options.table_prefix {
            Some(prefix)
                if !prefix.is_empty()
                    && is_field_name(column)
                    && !column.contains('.')
                    && self.lookup.is_none_or(|l| l.has_field(prefix, column)) =>
            {
                format!("{}.{}", render(prefix), render(column))
            }
            _ => render(column),
        }
    }
}

/// Extracts a key or fragment from a list element.
fn list_key(value: SqlValue) -> Result<String> {
    match value {
        SqlValue::Text(key) | SqlValue::Raw(key) => Ok(key),
        other => Err(Error::unsupported(format!(
            "list key must be text, found {}",
            other.kind()
        ))),
    }
}

/// Returns true if `text` has `keyword` outside any parentheses.
fn has_top_level(text: &str, keyword: Keyword) -> bool {
    let tokens = tokenize(text);
    let depths = depths(&tokens);
    tokens
        .iter()
        .zip(depths)
        .any(|(token, depth)| depth == 0 && token.is_keyword(keyword))
}

fn wrap(clause: CompiledClause) -> CompiledClause {
    CompiledClause::new(format!("({})", clause.text), clause.args)
}

/// Joins two clauses, parenthesizing sides whose own connectives would
/// otherwise bind differently.
fn join(left: CompiledClause, joiner: Joiner, right: CompiledClause) -> CompiledClause {
    if left.is_empty() {
        return right;
    }
    if right.is_empty() {
        return left;
    }
    let needs_parens = |clause: &CompiledClause| match joiner {
        Joiner::And => has_top_level(&clause.text, Keyword::Or),
        Joiner::Or => {
            has_top_level(&clause.text, Keyword::And) || has_top_level(&clause.text, Keyword::Or)
        }
    };
    let left = if needs_parens(&left) { wrap(left) } else { left };
    let right = if needs_parens(&right) { wrap(right) } else { right };
    let mut args = left.args;
    args.extend(right.args);
    CompiledClause::new(
        format!("{} {} {}", left.text, joiner.as_str(), right.text),
        args,
    )
}

fn join_all(parts: Vec<CompiledClause>, joiner: Joiner) -> CompiledClause {
    parts
        .into_iter()
        .fold(CompiledClause::default(), |acc, part| join(acc, joiner, part))
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::dialect::{MySqlDialect, PostgresDialect};
    use crate::schema::StaticSchema;
    use crate::value::ToSqlValue;

    fn compile(condition: impl Into<Condition>) -> CompiledClause {
        Compiler::new(&MySqlDialect).compile(condition.into()).unwrap()
    }

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(String::from(s))
    }

    #[test]
    fn test_map_synthesis() {
        let mut map: IndexMap<&str, SqlValue> = IndexMap::new();
        map.insert("name", text("john"));
        map.insert("age >", SqlValue::Int(18));
        let clause = compile(map);
        assert_eq!(clause.text, "`name`=? AND age>?");
        assert_eq!(clause.args, vec![text("john"), SqlValue::Int(18)]);
    }

    #[test]
    fn test_key_value_forms() {
        let cases = [
            ("id", SqlValue::Int(1), "`id`=?"),
            ("age >=", SqlValue::Int(1), "age>=?"),
            ("name like", text("j%"), "name LIKE ?"),
            ("name NOT LIKE", text("j%"), "name NOT LIKE ?"),
            ("u.id", SqlValue::Int(1), "`u`.`id`=?"),
            ("id", SqlValue::Null, "`id` IS NULL"),
            ("age > 16", SqlValue::Null, "age > 16"),
            ("a = ? OR b = ?", SqlValue::Null, "a = ? OR b = ?"),
            ("count(*)", SqlValue::Int(2), "count(*)=?"),
            ("age between ? and ?", vec![1, 9].to_sql_value(), "age between ? and ?"),
        ];
        for (key, value, expected) in cases {
            let clause = compile(Condition::KeyValue(key.to_string(), value));
            assert_eq!(clause.text, expected, "key {key}");
            assert!(clause.is_balanced(), "key {key}");
        }
    }

    #[test]
    fn test_list_value_becomes_in() {
        let clause = compile(Condition::key_value("id", vec![1, 2, 3]));
        assert_eq!(clause.text, "`id` IN (?)");
        assert_eq!(clause.args, vec![vec![1, 2, 3].to_sql_value()]);

        let clause = compile(Condition::key_value("id not in", vec![1]));
        assert_eq!(clause.text, "id NOT IN (?)");
    }

    #[test]
    fn test_fragment_with_one_argument_is_key_value() {
        let clause = compile(Condition::from("age >").bind(vec![SqlValue::Int(16)]).unwrap());
        assert_eq!(clause.text, "age>?");
        assert_eq!(clause.args, vec![SqlValue::Int(16)]);

        let clause = compile(Condition::from("id").bind(vec![SqlValue::Int(16)]).unwrap());
        assert_eq!(clause.text, "`id`=?");
    }

    #[test]
    fn test_fragment_binds_positionally() {
        let clause = compile(
            Condition::from("a=? AND b=?")
                .bind(vec![SqlValue::Int(1), SqlValue::Int(2)])
                .unwrap(),
        );
        assert_eq!(clause.text, "a=? AND b=?");
        assert_eq!(clause.args, vec![SqlValue::Int(1), SqlValue::Int(2)]);

        let clause = compile(
            Condition::from("id IN (?,?)")
                .bind(vec![vec![7, 8].to_sql_value()])
                .unwrap(),
        );
        assert_eq!(clause.args, vec![SqlValue::Int(7), SqlValue::Int(8)]);
    }

    #[test]
    fn test_even_list_is_pairs() {
        let clause = compile(Condition::List(vec![
            text("name"),
            text("john"),
            text("age <"),
            SqlValue::Int(30),
        ]));
        assert_eq!(clause.text, "`name`=? AND age<?");
        assert_eq!(clause.args, vec![text("john"), SqlValue::Int(30)]);
    }

    #[test]
    fn test_odd_list_counts_holders() {
        let clause = compile(Condition::List(vec![
            text("a=? AND"),
            SqlValue::Int(1),
            text("b IS NULL"),
        ]));
        assert_eq!(clause.text, "a=? AND b IS NULL");
        assert_eq!(clause.args, vec![SqlValue::Int(1)]);

        let err = Compiler::new(&MySqlDialect)
            .compile(Condition::List(vec![SqlValue::Int(1), text("a"), text("b")]));
        assert!(matches!(err, Err(Error::UnsupportedShape(_))));
    }

    #[test]
    fn test_bare_scalar_is_unsupported() {
        let err = Compiler::new(&MySqlDialect).compile(Condition::Scalar(SqlValue::Int(5)));
        assert!(matches!(err, Err(Error::UnsupportedShape(_))));
    }

    #[test]
    fn test_omit_nil_and_empty() {
        let map = IndexMap::from([
            ("a", SqlValue::Null),
            ("b", SqlValue::Int(0)),
            ("c", SqlValue::Int(1)),
        ]);

        let clause = Compiler::new(&MySqlDialect)
            .with_options(CompileOptions::new().omit_nil(true))
            .compile(Condition::from(map.clone()))
            .unwrap();
        assert_eq!(clause.text, "`b`=? AND `c`=?");

        let clause = Compiler::new(&MySqlDialect)
            .with_options(CompileOptions::new().omit_empty(true))
            .compile(Condition::from(map))
            .unwrap();
        assert_eq!(clause.text, "`c`=?");
    }

    #[test]
    fn test_params_struct_forces_omit_nil() {
        let fields = Fields {
            pairs: IndexMap::from([
                (String::from("id"), SqlValue::Null),
                (String::from("name"), text("x")),
            ]),
            params: true,
        };
        assert_eq!(compile(Condition::Map(fields)).text, "`name`=?");
    }

    #[test]
    fn test_composite_parenthesizes() {
        let cond = Condition::from("a=1 OR b=2").and("c=3");
        assert_eq!(compile(cond).text, "(a=1 OR b=2) AND c=3");

        let cond = Condition::from("a=1 AND b=2").or("c=3");
        assert_eq!(compile(cond).text, "(a=1 AND b=2) OR c=3");

        let cond = Condition::from("f(a, b) OR c").and("");
        assert_eq!(compile(cond).text, "f(a, b) OR c");
    }

    #[test]
    fn test_sub_query_is_inlined() {
        let sub = CompiledClause::new("SELECT uid FROM vip WHERE level>?", vec![SqlValue::Int(3)]);
        let clause = compile(
            Condition::from("status=? AND id IN ?")
                .bind(vec![SqlValue::Int(1), SqlValue::sub_query(sub.clone())])
                .unwrap(),
        );
        assert_eq!(
            clause.text,
            "status=? AND id IN (SELECT uid FROM vip WHERE level>?)"
        );
        assert_eq!(clause.args, vec![SqlValue::Int(1), SqlValue::Int(3)]);

        let clause = compile(Condition::key_value("id", sub));
        assert_eq!(clause.text, "`id` IN (SELECT uid FROM vip WHERE level>?)");
        assert_eq!(clause.args, vec![SqlValue::Int(3)]);
    }

    #[test]
    fn test_raw_value_is_inlined() {
        let clause = compile(Condition::key_value("updated_at <", SqlValue::raw("NOW()")));
        assert_eq!(clause.text, "updated_at<NOW()");
        assert!(clause.args.is_empty());
    }

    #[test]
    fn test_table_prefix_uses_lookup() {
        let schema = StaticSchema::new().table("u", ["id"]);
        let compiler = Compiler::new(&PostgresDialect)
            .with_options(CompileOptions::new().table_prefix("u"))
            .with_lookup(&schema);
        let clause = compiler
            .compile(Condition::from(IndexMap::from([
                ("id", SqlValue::Int(1)),
                ("name", text("x")),
            ])))
            .unwrap();
        assert_eq!(clause.text, "\"u\".\"id\"=? AND \"name\"=?");
    }
}
