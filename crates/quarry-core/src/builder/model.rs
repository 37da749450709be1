//! Fluent statement builder.

use std::fmt;
use std::sync::Arc;

use super::pagination::Pagination;
use crate::args::IntoArgs;
use crate::clause::CompiledClause;
use crate::compiler::{CompileOptions, Compiler};
use crate::condition::{Condition, Joiner};
use crate::debug::render_for_debug;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::quote::quote_table_name;
use crate::schema::FieldLookup;
use crate::translate::translate;
use crate::value::SqlValue;

/// A statement ready for a driver: translated text and flat arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    /// Dialect-specific SQL.
    pub sql: String,
    /// One argument per placeholder.
    pub args: Vec<SqlValue>,
}

impl Prepared {
    /// Renders the statement with its arguments inlined, for logs only.
    #[must_use]
    pub fn debug_sql(&self) -> String {
        render_for_debug(&self.sql, &self.args)
    }
}

/// Row count used for an offset without a limit.
const UNBOUNDED: u64 = 9_223_372_036_854_775_807;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Select,
    Count,
    Delete,
}

/// A fluent builder over one table.
///
/// Conditions are compiled when a statement is built. The first error met
/// while chaining is kept and returned by every build method.
///
/// ```rust
/// use quarry_core::{Model, MySqlDialect, PostgresDialect};
///
/// let model = Model::table("user").where_("age >", 16).limit(0, 10);
///
/// let mysql = model.build(&MySqlDialect).unwrap();
/// assert_eq!(mysql.sql, "SELECT * FROM `user` WHERE age>? LIMIT 0,10");
///
/// let pg = model.build(&PostgresDialect).unwrap();
/// assert_eq!(pg.sql, "SELECT * FROM \"user\" WHERE age>$1 LIMIT 10 OFFSET 0");
/// assert_eq!(pg.args, mysql.args);
/// ```
#[derive(Clone)]
pub struct Model {
    table: String,
    prefix: String,
    fields: String,
    distinct: bool,
    condition: Option<Condition>,
    having: Option<Condition>,
    group: Vec<String>,
    order: Vec<String>,
    window: Option<Pagination>,
    offset: Option<u64>,
    options: CompileOptions,
    lookup: Option<Arc<dyn FieldLookup + Send + Sync>>,
    error: Option<Error>,
}

impl Model {
    /// Creates a builder over `table`.
    ///
    /// `table` may be a comma list with aliases (`"user u, user_detail ut"`).
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            prefix: String::new(),
            fields: String::from("*"),
            distinct: false,
            condition: None,
            having: None,
            group: Vec::new(),
            order: Vec::new(),
            window: None,
            offset: None,
            options: CompileOptions::default(),
            lookup: None,
            error: None,
        }
    }

    /// Sets the table-name prefix added to every table.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the selected fields.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Selects distinct rows.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the compile options.
    #[must_use]
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Drops nil values from map and struct conditions.
    #[must_use]
    pub fn omit_nil(mut self) -> Self {
        self.options.omit_nil = true;
        self
    }

    /// Drops empty values from map and struct conditions.
    #[must_use]
    pub fn omit_empty(mut self) -> Self {
        self.options.omit_empty = true;
        self
    }

    /// Sets the schema lookup used to qualify bare columns.
    #[must_use]
    pub fn lookup(mut self, lookup: Arc<dyn FieldLookup + Send + Sync>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    fn push_condition(
        mut self,
        slot: fn(&mut Self) -> &mut Option<Condition>,
        joiner: Joiner,
        condition: Condition,
        args: Vec<SqlValue>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match condition.bind(args) {
            Ok(condition) => {
                let current = slot(&mut self);
                *current = Some(match current.take() {
                    None => condition,
                    Some(existing) => {
                        Condition::Composite(Box::new(existing), joiner, Box::new(condition))
                    }
                });
            }
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Adds a `WHERE` condition, AND-joined with earlier ones.
    #[must_use]
    pub fn where_(self, condition: impl Into<Condition>, args: impl IntoArgs) -> Self {
        self.push_condition(
            |m| &mut m.condition,
            Joiner::And,
            condition.into(),
            args.into_args(),
        )
    }

    /// Adds a `WHERE` condition with the table's primary key as the default
    /// key for bare values.
    #[must_use]
    pub fn where_primary(
        self,
        primary: &str,
        condition: impl Into<Condition>,
        args: impl IntoArgs,
    ) -> Self {
        let args = args.into_args();
        let condition = condition.into();
        let condition = if args.is_empty() {
            Condition::primary(primary, condition)
        } else {
            condition
        };
        self.push_condition(|m| &mut m.condition, Joiner::And, condition, args)
    }

    /// Same as [`Model::where_`].
    #[must_use]
    pub fn and(self, condition: impl Into<Condition>, args: impl IntoArgs) -> Self {
        self.where_(condition, args)
    }

    /// Adds a `WHERE` condition, OR-joined with earlier ones.
    #[must_use]
    pub fn or(self, condition: impl Into<Condition>, args: impl IntoArgs) -> Self {
        self.push_condition(
            |m| &mut m.condition,
            Joiner::Or,
            condition.into(),
            args.into_args(),
        )
    }

    /// Adds a `HAVING` condition, AND-joined with earlier ones.
    #[must_use]
    pub fn having(self, condition: impl Into<Condition>, args: impl IntoArgs) -> Self {
        self.push_condition(
            |m| &mut m.having,
            Joiner::And,
            condition.into(),
            args.into_args(),
        )
    }

    /// Adds `GROUP BY` fields.
    #[must_use]
    pub fn group(mut self, fields: impl Into<String>) -> Self {
        self.group.push(fields.into());
        self
    }

    /// Adds `ORDER BY` fields (`"id desc, name"`).
    #[must_use]
    pub fn order(mut self, fields: impl Into<String>) -> Self {
        self.order.push(fields.into());
        self
    }

    /// Sets `LIMIT offset,count`; negative inputs become zero.
    #[must_use]
    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.window = Some(Pagination::new(offset, count));
        self.offset = None;
        self
    }

    /// Sets the row count, keeping the current offset.
    #[must_use]
    pub fn limit_count(mut self, count: i64) -> Self {
        let offset = self
            .window
            .map_or_else(|| self.offset.take().unwrap_or(0), |w| w.offset);
        self.window = Some(Pagination {
            offset,
            limit: Pagination::new(0, count).limit,
        });
        self
    }

    /// Sets the offset; negative inputs become zero.
    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        let offset = Pagination::default().with_offset(offset).offset;
        match &mut self.window {
            Some(window) => window.offset = offset,
            None => self.offset = Some(offset),
        }
        self
    }

    /// Selects the 1-based `page` of `size` rows.
    #[must_use]
    pub fn page(mut self, page: i64, size: i64) -> Self {
        self.window = Some(Pagination::page(page, size));
        self.offset = None;
        self
    }

    /// Returns the pagination window, if any.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        self.window.or_else(|| {
            self.offset.map(|offset| Pagination {
                offset,
                limit: UNBOUNDED,
            })
        })
    }

    /// Builds the `SELECT` statement for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns the first error met while chaining, a compile error, or a
    /// [`Error::DialectGap`] from translation.
    pub fn build(&self, dialect: &dyn Dialect) -> Result<Prepared> {
        self.select_sql(dialect)
    }

    /// Builds the `SELECT` statement for `dialect`.
    ///
    /// # Errors
    ///
    /// See [`Model::build`].
    pub fn select_sql(&self, dialect: &dyn Dialect) -> Result<Prepared> {
        self.prepare(Kind::Select, dialect)
    }

    /// Builds a `SELECT COUNT(1)` over the same rows.
    ///
    /// # Errors
    ///
    /// See [`Model::build`].
    pub fn count_sql(&self, dialect: &dyn Dialect) -> Result<Prepared> {
        self.prepare(Kind::Count, dialect)
    }

    /// Builds the `DELETE` statement for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedShape`] when there is no `WHERE`
    /// condition, in addition to the errors of [`Model::build`].
    pub fn delete_sql(&self, dialect: &dyn Dialect) -> Result<Prepared> {
        self.prepare(Kind::Delete, dialect)
    }

    /// Compiles the `SELECT` in the universal form, for use as a sub-query
    /// argument of another statement.
    ///
    /// # Errors
    ///
    /// Returns the first error met while chaining or a compile error.
    pub fn sub_query(&self, dialect: &dyn Dialect) -> Result<CompiledClause> {
        let clause = self.compose(Kind::Select, dialect)?;
        Ok(flatten(&clause.text, clause.args))
    }

    fn prepare(&self, kind: Kind, dialect: &dyn Dialect) -> Result<Prepared> {
        let clause = self.compose(kind, dialect)?;
        let flat = flatten(&clause.text, clause.args);
        let sql = translate(&flat.text, dialect)?;
        tracing::debug!(
            dialect = dialect.name(),
            sql = %sql,
            args = flat.args.len(),
            "built statement"
        );
        Ok(Prepared {
            sql,
            args: flat.args,
        })
    }

    /// Assembles the statement in the universal `?` / `LIMIT first,count`
    /// form.
    fn compose(&self, kind: Kind, dialect: &dyn Dialect) -> Result<CompiledClause> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let (left, right) = dialect.quote_chars();
        let mut compiler = Compiler::new(dialect).with_options(self.options.clone());
        if let Some(lookup) = &self.lookup {
            compiler = compiler.with_lookup(lookup.as_ref());
        }

        let table = quote_table_name(&self.table, &self.prefix, left, right);
        let fields = dialect.quote_identifier(&self.fields);
        let select = if self.distinct {
            format!("SELECT DISTINCT {fields} FROM {table}")
        } else {
            format!("SELECT {fields} FROM {table}")
        };

        let mut sql = match kind {
            Kind::Select => select,
            Kind::Count if self.group.is_empty() && !self.distinct => {
                format!("SELECT COUNT(1) FROM {table}")
            }
            Kind::Count => select,
            Kind::Delete => format!("DELETE FROM {table}"),
        };
        let mut args = Vec::new();

        let condition = match &self.condition {
            Some(condition) => compiler.compile(condition.clone())?,
            None => CompiledClause::default(),
        };
        if condition.is_empty() {
            if kind == Kind::Delete {
                return Err(Error::unsupported(
                    "DELETE without a WHERE condition would remove every row",
                ));
            }
        } else {
            sql.push_str(" WHERE ");
            sql.push_str(&condition.text);
            args.extend(condition.args);
        }

        if kind != Kind::Delete {
            if !self.group.is_empty() {
                sql.push_str(" GROUP BY ");
                sql.push_str(&dialect.quote_identifier(&self.group.join(",")));
            }
            if let Some(having) = &self.having {
                let having = compiler.compile(having.clone())?;
                if !having.is_empty() {
                    sql.push_str(" HAVING ");
                    sql.push_str(&having.text);
                    args.extend(having.args);
                }
            }
        }

        match kind {
            Kind::Select => {
                if !self.order.is_empty() {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&dialect.quote_identifier(&self.order.join(",")));
                }
                if let Some(window) = self.pagination() {
                    sql.push_str(&format!(" LIMIT {},{}", window.offset, window.limit));
                }
            }
            Kind::Count if !self.group.is_empty() || self.distinct => {
                sql = format!("SELECT COUNT(1) FROM ({sql}) COUNT_ALIAS");
            }
            Kind::Count | Kind::Delete => {}
        }

        Ok(CompiledClause::new(sql, args))
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("table", &self.table)
            .field("prefix", &self.prefix)
            .field("fields", &self.fields)
            .field("condition", &self.condition)
            .field("having", &self.having)
            .field("group", &self.group)
            .field("order", &self.order)
            .field("pagination", &self.pagination())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MssqlDialect, MySqlDialect, OracleDialect, PostgresDialect};
    use crate::schema::StaticSchema;

    #[test]
    fn test_simple_select() {
        let prepared = Model::table("user").build(&MySqlDialect).unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM `user`");
        assert!(prepared.args.is_empty());
    }

    #[test]
    fn test_select_with_clauses() {
        let prepared = Model::table("user u")
            .prefix("gf_")
            .fields("u.id, u.name")
            .where_("u.status", 1)
            .and("u.id", vec![1, 2, 3])
            .group("u.id")
            .having("COUNT(*) > ?", 1)
            .order("u.id desc")
            .page(2, 20)
            .build(&MySqlDialect)
            .unwrap();
        assert_eq!(
            prepared.sql,
            "SELECT `u`.`id`,`u`.`name` FROM `gf_user` u WHERE `u`.`status`=? AND `u`.`id` IN (?,?,?) \
             GROUP BY `u`.`id` HAVING COUNT(*) > ? ORDER BY `u`.`id` desc LIMIT 20,20"
        );
        assert_eq!(
            prepared.args,
            vec![
                SqlValue::Int(1),
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::Int(3),
                SqlValue::Int(1),
            ]
        );
    }

    #[test]
    fn test_or_groups_earlier_conditions() {
        let prepared = Model::table("t")
            .where_("a", 1)
            .and("b", 2)
            .or("c", 3)
            .build(&MySqlDialect)
            .unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM `t` WHERE (`a`=? AND `b`=?) OR `c`=?");
    }

    #[test]
    fn test_cross_dialect() {
        let model = Model::table("user").where_("age >", 16).limit(0, 10);
        let expected: [(&dyn Dialect, &str); 4] = [
            (
                &MySqlDialect,
                "SELECT * FROM `user` WHERE age>? LIMIT 0,10",
            ),
            (
                &PostgresDialect,
                "SELECT * FROM \"user\" WHERE age>$1 LIMIT 10 OFFSET 0",
            ),
            (
                &MssqlDialect,
                "SELECT * FROM (SELECT TOP 10 * FROM (SELECT TOP 10 * FROM \"user\" WHERE age>@p1) AS TMP1_) AS TMP2_",
            ),
            (
                &OracleDialect,
                "SELECT * FROM (SELECT GFORM.*, ROWNUM ROWNUM_ FROM (SELECT * FROM \"user\" WHERE age>:v1) GFORM \
                 WHERE ROWNUM <= 10) WHERE ROWNUM_ >= 1",
            ),
        ];
        for (dialect, sql) in expected {
            let prepared = model.build(dialect).unwrap();
            assert_eq!(prepared.sql, sql, "{}", dialect.name());
            assert_eq!(prepared.args, vec![SqlValue::Int(16)], "{}", dialect.name());
        }
    }

    #[test]
    fn test_first_error_is_kept() {
        let model = Model::table("t")
            .where_(vec![1, 2], 3)
            .where_("a", 1);
        assert!(matches!(
            model.build(&MySqlDialect),
            Err(Error::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_count_and_delete() {
        let model = Model::table("t").where_("a", 1).limit(0, 5);
        assert_eq!(
            model.count_sql(&MySqlDialect).unwrap().sql,
            "SELECT COUNT(1) FROM `t` WHERE `a`=?"
        );
        assert_eq!(
            model.delete_sql(&MySqlDialect).unwrap().sql,
            "DELETE FROM `t` WHERE `a`=?"
        );
        assert!(Model::table("t").delete_sql(&MySqlDialect).is_err());

        let grouped = Model::table("t").fields("a").group("a");
        assert_eq!(
            grouped.count_sql(&MySqlDialect).unwrap().sql,
            "SELECT COUNT(1) FROM (SELECT `a` FROM `t` GROUP BY `a`) COUNT_ALIAS"
        );
    }

    #[test]
    fn test_sub_query_argument() {
        let vip = Model::table("vip")
            .fields("uid")
            .where_("level >", 3)
            .sub_query(&PostgresDialect)
            .unwrap();
        let prepared = Model::table("user")
            .where_("id", vip)
            .and("status", 1)
            .build(&PostgresDialect)
            .unwrap();
        assert_eq!(
            prepared.sql,
            "SELECT * FROM \"user\" WHERE \"id\" IN (SELECT \"uid\" FROM \"vip\" WHERE level>$1) AND \"status\"=$2"
        );
        assert_eq!(prepared.args, vec![SqlValue::Int(3), SqlValue::Int(1)]);
    }

    #[test]
    fn test_empty_in_list() {
        let prepared = Model::table("t")
            .where_("id", Vec::<i64>::new())
            .build(&MySqlDialect)
            .unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM `t` WHERE 0=1");
        assert!(prepared.args.is_empty());
    }

    #[test]
    fn test_where_primary() {
        let prepared = Model::table("t")
            .where_primary("id", vec![1, 2], ())
            .build(&MySqlDialect)
            .unwrap();
        assert_eq!(prepared.sql, "SELECT * FROM `t` WHERE `id` IN (?,?)");
    }

    #[test]
    fn test_lookup_qualifies_columns() {
        let schema = StaticSchema::new().table("u", ["id"]);
        let prepared = Model::table("user u")
            .options(CompileOptions::new().table_prefix("u"))
            .lookup(Arc::new(schema))
            .where_("id", 1)
            .and("nick", "x")
            .build(&MySqlDialect)
            .unwrap();
        assert_eq!(
            prepared.sql,
            "SELECT * FROM `user` u WHERE `u`.`id`=? AND `nick`=?"
        );
    }

    #[test]
    fn test_offset_and_limit_count() {
        let model = Model::table("t").limit_count(10).offset(-3);
        assert_eq!(model.pagination(), Some(Pagination { offset: 0, limit: 10 }));
        let model = Model::table("t").offset(5).limit_count(10);
        assert_eq!(model.pagination(), Some(Pagination { offset: 5, limit: 10 }));
        let model = Model::table("t").offset(5);
        assert_eq!(
            model.build(&MySqlDialect).unwrap().sql,
            "SELECT * FROM `t` LIMIT 5,9223372036854775807"
        );
    }

    #[test]
    fn test_debug_sql() {
        let prepared = Model::table("t")
            .where_("name", "o'neil")
            .build(&PostgresDialect)
            .unwrap();
        assert_eq!(
            prepared.debug_sql(),
            "SELECT * FROM \"t\" WHERE \"name\"='o''neil'"
        );
    }
}
