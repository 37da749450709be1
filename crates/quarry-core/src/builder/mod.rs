//! Fluent statement building.
//!
//! [`Model`] collects a table, conditions and clauses, then runs the whole
//! pipeline (compile, flatten, translate) for a dialect when built.
//!
//! # Example
//!
//! ```rust
//! use quarry_core::builder::Model;
//! use quarry_core::dialect::PostgresDialect;
//!
//! let prepared = Model::table("user")
//!     .where_("id", vec![1, 2, 3])
//!     .and("name like", "j%")
//!     .build(&PostgresDialect)
//!     .unwrap();
//!
//! assert_eq!(
//!     prepared.sql,
//!     "SELECT * FROM \"user\" WHERE \"id\" IN ($1,$2,$3) AND name LIKE $4"
//! );
//! assert_eq!(prepared.args.len(), 4);
//! ```

mod model;
mod pagination;

pub use model::{Model, Prepared};
pub use pagination::Pagination;
