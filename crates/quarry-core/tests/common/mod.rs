#![allow(dead_code)]

use quarry_core::{
    compile_where, CompileOptions, CompiledClause, Condition, IntoArgs, MySqlDialect, SqlValue,
    ToSqlValue,
};

/// Compiles and flattens a condition for MySQL with default options.
pub fn mysql_where(condition: impl Into<Condition>, args: impl IntoArgs) -> CompiledClause {
    compile_where(condition, args, &CompileOptions::default(), &MySqlDialect)
        .unwrap_or_else(|e| panic!("Failed to compile condition: {e}"))
}

/// Asserts that the clause has one argument per placeholder.
pub fn assert_balanced(clause: &CompiledClause) {
    assert_eq!(
        clause.placeholder_count(),
        clause.args.len(),
        "Unbalanced clause.\n  Text: {}\n  Args: {:?}",
        clause.text,
        clause.args
    );
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

pub fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().map(|&v| v.to_sql_value()).collect()
}
