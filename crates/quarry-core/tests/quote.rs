//! Identifier and table-name quoting.

use quarry_core::{
    quote_identifier, quote_table_name, Dialect, Model, MySqlDialect, PostgresDialect,
};

#[test]
fn test_table_prefix_is_applied_once() {
    let once = quote_table_name("user", "gf_", '`', '`');
    assert_eq!(once, "`gf_user`");
    assert_eq!(quote_table_name(&once, "gf_", '`', '`'), "`gf_user`");
    assert_eq!(quote_table_name("gf_user", "gf_", '`', '`'), "`gf_user`");
}

#[test]
fn test_table_prefix_with_schema_and_alias() {
    assert_eq!(
        quote_table_name("UserCenter.user u, user_detail ut", "gf_", '"', '"'),
        "\"UserCenter\".\"gf_user\" u,\"gf_user_detail\" ut"
    );
}

#[test]
fn test_dialect_quote_characters() {
    assert_eq!(quote_identifier("u.id", &MySqlDialect), "`u`.`id`");
    assert_eq!(quote_identifier("u.id", &PostgresDialect), "\"u\".\"id\"");
    assert_eq!(PostgresDialect.quote_identifier("id desc"), "\"id\" desc");
}

#[test]
fn test_expressions_are_left_alone() {
    assert_eq!(quote_identifier("count(*)", &MySqlDialect), "count(*)");
    assert_eq!(quote_identifier("NULL", &MySqlDialect), "NULL");
    assert_eq!(
        quote_identifier("(SELECT id FROM t)", &MySqlDialect),
        "(SELECT id FROM t)"
    );
}

#[test]
fn test_model_applies_prefix() {
    let prepared = Model::table("user")
        .prefix("gf_")
        .fields("id, name")
        .build(&MySqlDialect)
        .unwrap();
    assert_eq!(prepared.sql, "SELECT `id`,`name` FROM `gf_user`");
}

#[test]
fn test_requoting_never_doubles_quotes() {
    let once = quote_identifier("u.id, name", &MySqlDialect);
    assert_eq!(once, "`u`.`id`,`name`");
    assert_eq!(quote_identifier(&once, &MySqlDialect), once);
    assert_eq!(quote_identifier(&once, &PostgresDialect), once);
}
