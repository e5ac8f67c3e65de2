//! Binder module for semantic analysis.
//!
//! The binder validates parsed statements against the catalog:
//! - Table and view names are resolved through one namespace lookup
//! - Projection and predicate columns are resolved against table schemas
//! - Literals are coerced to their column types
//!
//! The output is a bound statement ready for execution; a bound
//! statement owns schema snapshots rather than catalog borrows.

mod select;
mod statement;

pub use select::{BoundColumn, BoundOrderBy, BoundPredicate, BoundSelect, SelectBinder};
pub use statement::{
    BindError, BoundCreateView, BoundInsert, BoundStatement, StatementBinder, StatementKind,
};
