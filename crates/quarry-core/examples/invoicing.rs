//! Invoicing Queries - Cross-Dialect Example
//!
//! This example builds the queries of a small invoicing system once and
//! prints them for every built-in dialect:
//! - Struct filters through `#[derive(Where)]`
//! - `IN` lists, including an empty one
//! - Sub-queries as arguments
//! - Pagination rewritten per dialect
//!
//! Run with: cargo run --example invoicing

use quarry_core::{Condition, Dialect, DialectRegistry, Model, Result, SqlValue};
use quarry_derive::Where;

/// Search form of the invoice list page.
#[derive(Debug, Clone, Default, Where)]
#[condition(params)]
pub struct InvoiceSearch {
    pub company_id: Option<i64>,
    pub status: Option<Vec<String>>,
    #[condition(name = "total >=")]
    pub min_total: Option<f64>,
    #[condition(name = "due_date <")]
    pub due_before: Option<String>,
}

fn print_query(title: &str, model: &Model, dialect: &dyn Dialect) {
    match model.build(dialect) {
        Ok(prepared) => {
            println!("-- {title} ({})", dialect.name());
            println!("{};", prepared.sql);
            println!("-- {}", prepared.debug_sql());
        }
        Err(e) => println!("-- {title} ({}): {e}", dialect.name()),
    }
    println!();
}

/// Sub-queries are compiled for the dialect of the outer statement.
fn overdue_invoices(search: &InvoiceSearch, dialect: &dyn Dialect) -> Result<Model> {
    let vip_clients = Model::table("clients")
        .prefix("inv_")
        .fields("id")
        .where_("tier", "vip")
        .sub_query(dialect)?;

    Ok(Model::table("invoices")
        .prefix("inv_")
        .fields("id, number, total, due_date")
        .where_(Condition::fields(search), ())
        .and("client_id IN ?", SqlValue::sub_query(vip_clients))
        .order("due_date asc")
        .page(1, 20))
}

fn main() -> Result<()> {
    let registry = DialectRegistry::with_builtin();

    let search = InvoiceSearch {
        company_id: Some(1),
        status: Some(vec![String::from("sent"), String::from("overdue")]),
        due_before: Some(String::from("2024-01-15")),
        ..InvoiceSearch::default()
    };

    let archived = Model::table("invoices")
        .prefix("inv_")
        .where_("id", Vec::<i64>::new())
        .or("status", "archived");

    for name in registry.names() {
        let dialect = registry.get(name)?;
        let overdue = overdue_invoices(&search, dialect.as_ref())?;
        print_query("Overdue invoices of VIP clients", &overdue, dialect.as_ref());
        print_query("Archived or selected invoices", &archived, dialect.as_ref());
    }

    Ok(())
}
