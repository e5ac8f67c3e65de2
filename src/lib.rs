//! minirel - an embeddable relational database engine.
//!
//! Statements flow parse → bind → execute: the parser produces an AST,
//! the binder validates it against the catalog and takes ownership of
//! the bound pieces, and the database facade dispatches the bound
//! statement to the catalog or the row operators.

pub mod binder;
pub mod catalog;
pub mod error;
pub mod executor;
pub mod parser;
pub mod storage;
pub mod types;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

pub use error::{MinirelError, Result};
pub use types::{DataType, QueryResult, Row, Value};

use binder::{BoundCreateView, BoundInsert, BoundSelect, BoundStatement, StatementBinder};
use catalog::{Catalog, TableSchema, View};
use executor::{FilterOperator, PhysicalOperator, ProjectOperator, ScanOperator};
use storage::Table;

/// The main database struct providing statement execution.
///
/// Owns the catalog and the in-memory tables, and plays the role of the
/// session context for statement dispatch.
pub struct Database {
    /// Schema catalog.
    catalog: Catalog,
    /// In-memory tables.
    tables: HashMap<String, Arc<Table>>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates a new in-memory database.
    #[must_use]
    pub fn new() -> Self {
        Database {
            catalog: Catalog::new(),
            tables: HashMap::new(),
        }
    }

    /// Returns a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Executes a SQL statement and returns the result.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, binding fails, or execution
    /// encounters an error. Errors surface unchanged from the failing
    /// stage; nothing is retried.
    pub fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        let statement = parser::parse_statement(sql)?;
        let bound = StatementBinder::new(&self.catalog).bind(statement)?;

        match bound {
            BoundStatement::CreateTable(schema) => self.execute_create_table(schema),
            BoundStatement::CreateView(stmt) => self.execute_create_view(stmt),
            BoundStatement::Insert(insert) => self.execute_insert(insert),
            BoundStatement::Select(select) => self.execute_select(&select),
        }
    }

    fn execute_create_table(&mut self, mut schema: TableSchema) -> Result<QueryResult> {
        let table_id = self.catalog.create_table(schema.clone())?;
        schema.table_id = table_id;

        let name = schema.name.clone();
        self.tables
            .insert(name, Arc::new(Table::new(Arc::new(schema))));

        Ok(QueryResult::empty())
    }

    fn execute_create_view(&mut self, stmt: BoundCreateView) -> Result<QueryResult> {
        let (view_name, definition) = stmt.into_parts();
        let view = View::new(view_name, definition)?;
        self.catalog.create_view(view)?;
        Ok(QueryResult::empty())
    }

    fn execute_insert(&mut self, insert: BoundInsert) -> Result<QueryResult> {
        let name = insert.table.name.as_str();
        let table = self.tables.get_mut(name).ok_or_else(|| {
            MinirelError::ExecutionError(format!("Table '{name}' does not exist"))
        })?;

        // Need inner mutable access through the Arc
        let table = Arc::get_mut(table).ok_or_else(|| {
            MinirelError::ExecutionError("Cannot modify table: multiple references exist".into())
        })?;

        table.insert(insert.values)?;
        Ok(QueryResult::empty())
    }

    fn execute_select(&self, select: &BoundSelect) -> Result<QueryResult> {
        let table = self.tables.get(&select.table.name).ok_or_else(|| {
            MinirelError::ExecutionError(format!("Table '{}' does not exist", select.table.name))
        })?;

        let mut op: Box<dyn PhysicalOperator> = Box::new(ScanOperator::new(Arc::clone(table)));
        if let Some(predicate) = &select.predicate {
            op = Box::new(FilterOperator::new(op, predicate.clone()));
        }
        let project = ProjectOperator::new(op, select.projections.clone());
        let columns = project.output_columns();
        let mut op: Box<dyn PhysicalOperator> = Box::new(project);

        let mut rows = Vec::new();
        while let Some(row) = op.next()? {
            rows.push(row);
        }

        if !select.order_by.is_empty() {
            rows.sort_by(|a, b| {
                for key in &select.order_by {
                    let ordering = match (a.get(&key.column.name), b.get(&key.column.name)) {
                        (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
                        _ => Ordering::Equal,
                    };
                    let ordering = if key.ascending {
                        ordering
                    } else {
                        ordering.reverse()
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = select.limit {
            rows.truncate(limit);
        }

        let mut result = QueryResult::new(columns);
        for row in rows {
            result.add_row(row);
        }
        Ok(result)
    }
}
