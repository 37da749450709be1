//! End-to-end tests for condition compilation and argument flattening.

mod common;

use common::{assert_balanced, ints, mysql_where, text};
use indexmap::IndexMap;
use quarry_core::{
    compile_where, CompileOptions, Compiler, Condition, Error, MySqlDialect, PostgresDialect,
    SqlValue, ToSqlValue,
};

// =============================================================================
// Map conditions
// =============================================================================

#[test]
fn test_map_condition_keeps_insertion_order() {
    let mut map = IndexMap::new();
    map.insert("name", text("john"));
    map.insert("age >", SqlValue::Int(18));

    let clause = mysql_where(map, ());
    assert_eq!(clause.text, "`name`=? AND age>?");
    assert_eq!(clause.args, vec![text("john"), SqlValue::Int(18)]);
}

#[test]
fn test_json_object_condition() {
    let clause = mysql_where(
        serde_json::json!({"status": 1, "name like": "jo%", "deleted_at": null}),
        (),
    );
    assert_eq!(clause.text, "`status`=? AND name LIKE ? AND `deleted_at` IS NULL");
    assert_eq!(clause.args, vec![SqlValue::Int(1), text("jo%")]);
}

#[test]
fn test_omit_nil_option() {
    let options = CompileOptions::new().omit_nil(true);
    let clause = compile_where(
        serde_json::json!({"a": null, "b": 2}),
        (),
        &options,
        &MySqlDialect,
    )
    .unwrap();
    assert_eq!(clause.text, "`b`=?");
}

// =============================================================================
// List arguments
// =============================================================================

#[test]
fn test_in_list_before_and_after_flattening() {
    let clause = Compiler::new(&MySqlDialect)
        .compile(Condition::key_value("id", vec![1, 2, 3]))
        .unwrap();
    assert_eq!(clause.text, "`id` IN (?)");
    assert_eq!(clause.args, vec![vec![1, 2, 3].to_sql_value()]);

    let clause = mysql_where("id", vec![1, 2, 3]);
    assert_eq!(clause.text, "`id` IN (?,?,?)");
    assert_eq!(clause.args, ints(&[1, 2, 3]));
}

#[test]
fn test_empty_in_list_is_false() {
    let clause = mysql_where(Condition::key_value("id", Vec::<i64>::new()), ());
    assert!(clause.text.contains("0=1"), "got {}", clause.text);
    assert!(clause.args.is_empty());
}

#[test]
fn test_empty_not_in_list_is_true() {
    let clause = mysql_where("status=? AND id NOT IN (?)", (1, Vec::<i64>::new()));
    assert_eq!(clause.text, "status=? AND 1=1");
    assert_eq!(clause.args, ints(&[1]));
}

#[test]
fn test_list_spread_over_fragment() {
    let clause = mysql_where("age BETWEEN ? AND ?", vec![18, 30]);
    assert_eq!(clause.text, "age BETWEEN ? AND ?");
    assert_eq!(clause.args, ints(&[18, 30]));
}

// =============================================================================
// Fragments and composition
// =============================================================================

#[test]
fn test_fragment_with_positional_args() {
    let clause = mysql_where("a=? AND b IN (?) AND c=?", (1, vec!["x", "y"], 3));
    assert_eq!(clause.text, "a=? AND b IN (?,?) AND c=?");
    assert_eq!(clause.args, vec![SqlValue::Int(1), text("x"), text("y"), SqlValue::Int(3)]);
}

#[test]
fn test_injection_stays_in_arguments() {
    let hostile = "x' OR '1'='1";
    let clause = mysql_where("name", hostile);
    assert_eq!(clause.text, "`name`=?");
    assert_eq!(clause.args, vec![text(hostile)]);
}

#[test]
fn test_composite_condition() {
    let condition = Condition::from("a=? OR b=?")
        .bind(ints(&[1, 2]))
        .unwrap()
        .and(Condition::key_value("c", 3));
    let clause = mysql_where(condition, ());
    assert_eq!(clause.text, "(a=? OR b=?) AND `c`=?");
    assert_eq!(clause.args, ints(&[1, 2, 3]));
}

#[test]
fn test_postgres_quoting_in_conditions() {
    let clause = compile_where(
        Condition::key_value("u.id", 1),
        (),
        &CompileOptions::default(),
        &PostgresDialect,
    )
    .unwrap();
    assert_eq!(clause.text, "\"u\".\"id\"=?");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_placeholder_mismatch_is_malformed() {
    let err = compile_where("a=? AND b=?", 1, &CompileOptions::default(), &MySqlDialect)
        .unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }), "got {err:?}");
}

#[test]
fn test_args_on_map_are_unsupported() {
    let err = compile_where(
        serde_json::json!({"a": 1}),
        2,
        &CompileOptions::default(),
        &MySqlDialect,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedShape(_)), "got {err:?}");
}

// =============================================================================
// Placeholder balance
// =============================================================================

#[test]
fn test_compiled_clauses_are_balanced() {
    let clauses = [
        mysql_where("id", vec![1, 2, 3]),
        mysql_where("id", Vec::<i64>::new()),
        mysql_where("a=? AND b IN (?)", (1, vec![2, 3, 4])),
        mysql_where("a IN (?) OR b IN (?)", (Vec::<i64>::new(), vec![5])),
        mysql_where(serde_json::json!({"x": [1, 2], "y": "z", "w": null}), ()),
        mysql_where(
            Condition::List(vec![text("a=? AND"), SqlValue::Int(1), text("b IS NULL")]),
            (),
        ),
    ];
    for clause in &clauses {
        assert_balanced(clause);
    }
}
