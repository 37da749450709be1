//! # quarry-core
//!
//! Condition compilation and cross-dialect translation for SQL statements.
//!
//! This crate provides:
//! - A condition compiler that turns strings, maps, lists, structs and
//!   sub-queries into parameterized SQL with the universal `?` placeholder
//! - An argument flattener that expands list arguments into `?,?,?` and turns
//!   empty `IN` lists into a false predicate
//! - A dialect translator for MySQL, PostgreSQL, SQLite, SQL Server and Oracle
//!   placeholders and pagination
//! - Identifier quoting with table prefixes, and a debug renderer for logs
//!
//! ## Compiling a condition
//!
//! ```rust
//! use indexmap::IndexMap;
//! use quarry_core::{compile_where, CompileOptions, MySqlDialect, SqlValue};
//!
//! let mut map = IndexMap::new();
//! map.insert("name", SqlValue::Text(String::from("john")));
//! map.insert("age >", SqlValue::Int(18));
//!
//! let clause = compile_where(map, (), &CompileOptions::default(), &MySqlDialect).unwrap();
//! assert_eq!(clause.text, "`name`=? AND age>?");
//! assert_eq!(clause.args.len(), 2);
//! ```
//!
//! ## Values never enter the statement
//!
//! Every value travels as an argument, except values explicitly wrapped with
//! [`SqlValue::raw`]:
//!
//! ```rust
//! use quarry_core::{compile_where, CompileOptions, MySqlDialect};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let clause = compile_where("name", user_input, &CompileOptions::default(), &MySqlDialect)
//!     .unwrap();
//!
//! assert_eq!(clause.text, "`name`=?");
//! ```

pub mod args;
pub mod builder;
pub mod clause;
pub mod compiler;
pub mod condition;
pub mod debug;
pub mod dialect;
pub mod error;
pub mod flatten;
pub mod lexer;
pub mod normalize;
pub mod quote;
pub mod relation;
pub mod schema;
pub mod translate;
pub mod value;

pub use args::{Args, IntoArgs};
pub use builder::{Model, Pagination, Prepared};
pub use clause::CompiledClause;
pub use compiler::{CompileOptions, Compiler};
pub use condition::{Condition, Fields, Joiner, WhereFields};
pub use debug::render_for_debug;
pub use dialect::{
    Dialect, DialectRegistry, MssqlDialect, MySqlDialect, OracleDialect, PaginationStyle,
    PlaceholderStyle, PostgresDialect, SqliteDialect,
};
pub use error::{Error, Result};
pub use flatten::{flatten, format_query};
pub use quote::{quote_identifier, quote_table_name};
pub use relation::RelationKey;
pub use schema::{FieldLookup, StaticSchema};
pub use translate::translate;
pub use value::{SqlValue, ToSqlValue};

/// Compiles a condition and flattens its arguments.
///
/// The result still uses the universal `?` placeholder; pass its text to
/// [`translate`] for a specific backend.
///
/// # Errors
///
/// Returns [`Error::UnsupportedShape`] for conditions with no compilation
/// rule, and [`Error::MalformedInput`] when the placeholders of a
/// hand-written fragment do not match its arguments.
pub fn compile_where(
    condition: impl Into<Condition>,
    args: impl IntoArgs,
    options: &CompileOptions,
    dialect: &dyn Dialect,
) -> Result<CompiledClause> {
    let condition = condition.into().bind(args.into_args())?;
    let clause = Compiler::new(dialect)
        .with_options(options.clone())
        .compile(condition)?;
    let clause = flatten(&clause.text, clause.args);
    if !clause.is_balanced() {
        return Err(Error::malformed(
            clause.text.clone(),
            format!(
                "{} placeholder(s) for {} argument(s)",
                clause.placeholder_count(),
                clause.args.len()
            ),
        ));
    }
    Ok(clause)
}
