//! Statement binding: from parsed AST to executable bound statements.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogObject, ColumnDef, TableSchema};
use crate::error::{MinirelError, Result};
use crate::parser::ast::{Literal, SelectNode, Statement};
use crate::types::{DataType, Value};

use super::select::{coerce_literal, BoundSelect, SelectBinder};

/// Errors that can occur during binding.
#[derive(Debug, Clone)]
pub enum BindError {
    /// Requested name collides with an existing table.
    TableAlreadyExists(String),
    /// Requested name collides with an existing view.
    ViewAlreadyExists(String),
    /// CREATE VIEW without a defining query.
    MissingViewQuery(String),
    /// Referenced an undefined table.
    UndefinedTable(String),
    /// Referenced an undefined column.
    UndefinedColumn(String, String),
    /// Literal type does not match the column type.
    TypeMismatch {
        expected: DataType,
        actual: DataType,
    },
    /// INSERT value count does not match the table's column count.
    ColumnCountMismatch { expected: usize, actual: usize },
    /// Unknown column type keyword.
    UnknownType(String),
    /// ORDER BY references a column outside the projection.
    OrderByColumnNotProjected(String),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::TableAlreadyExists(name) => {
                write!(f, "Table with name {name} already exists")
            }
            BindError::ViewAlreadyExists(name) => write!(f, "View {name} already exists"),
            BindError::MissingViewQuery(name) => {
                write!(f, "No select statement provided for view {name}")
            }
            BindError::UndefinedTable(name) => write!(f, "Undefined table: {name}"),
            BindError::UndefinedColumn(table, col) => {
                write!(f, "Undefined column '{col}' in table '{table}'")
            }
            BindError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {expected}, got {actual}")
            }
            BindError::ColumnCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} values, got {actual}")
            }
            BindError::UnknownType(name) => write!(f, "Unknown data type: {name}"),
            BindError::OrderByColumnNotProjected(col) => {
                write!(f, "ORDER BY column '{col}' must appear in the SELECT list")
            }
        }
    }
}

impl std::error::Error for BindError {}

impl From<BindError> for MinirelError {
    fn from(err: BindError) -> Self {
        MinirelError::BindError(err.to_string())
    }
}

/// Statement kind tag exposed at the dispatch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// CREATE TABLE statement.
    CreateTable,
    /// CREATE VIEW statement.
    CreateView,
    /// INSERT statement.
    Insert,
    /// SELECT statement.
    Select,
}

/// Bound statement after semantic analysis.
#[derive(Debug)]
pub enum BoundStatement {
    /// Bound CREATE TABLE carrying the validated schema.
    CreateTable(TableSchema),
    /// Bound CREATE VIEW.
    CreateView(BoundCreateView),
    /// Bound INSERT.
    Insert(BoundInsert),
    /// Bound SELECT query.
    Select(BoundSelect),
}

impl BoundStatement {
    /// Returns the statement kind tag.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        match self {
            BoundStatement::CreateTable(_) => StatementKind::CreateTable,
            BoundStatement::CreateView(_) => StatementKind::CreateView,
            BoundStatement::Insert(_) => StatementKind::Insert,
            BoundStatement::Select(_) => StatementKind::Select,
        }
    }
}

/// Bound CREATE VIEW statement: a name validated against the catalog
/// namespace plus the owned, validated defining query.
///
/// The statement owns the definition until the dispatcher hands it to
/// the view via [`BoundCreateView::into_parts`].
#[derive(Debug)]
pub struct BoundCreateView {
    view_name: String,
    definition: Box<BoundSelect>,
}

impl BoundCreateView {
    /// Returns the target view name, exactly as requested.
    #[must_use]
    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    /// Returns the bound defining query.
    #[must_use]
    pub fn definition(&self) -> &BoundSelect {
        &self.definition
    }

    /// Consumes the statement, transferring ownership of the name and
    /// definition to the caller.
    #[must_use]
    pub fn into_parts(self) -> (String, Box<BoundSelect>) {
        (self.view_name, self.definition)
    }
}

/// Bound INSERT statement with values coerced to the column types.
#[derive(Debug)]
pub struct BoundInsert {
    /// Target table schema snapshot.
    pub table: Arc<TableSchema>,
    /// Row values in schema column order.
    pub values: Vec<Value>,
}

/// Binder turning parsed statements into bound statements.
pub struct StatementBinder<'a> {
    /// Reference to the database catalog; the binder does not own it.
    catalog: &'a Catalog,
}

impl<'a> StatementBinder<'a> {
    /// Creates a new statement binder with the given catalog.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        StatementBinder { catalog }
    }

    /// Binds a parsed statement against the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if any name or type fails to resolve; see
    /// [`BindError`] for the taxonomy.
    pub fn bind(&self, statement: Statement) -> Result<BoundStatement> {
        match statement {
            Statement::CreateTable {
                table_name,
                columns,
                primary_key,
            } => Ok(BoundStatement::CreateTable(bind_create_table(
                table_name,
                columns,
                primary_key,
            )?)),
            Statement::CreateView { view_name, query } => Ok(BoundStatement::CreateView(
                self.bind_create_view(view_name, query)?,
            )),
            Statement::Insert { table_name, values } => {
                Ok(BoundStatement::Insert(self.bind_insert(&table_name, values)?))
            }
            Statement::Select(node) => Ok(BoundStatement::Select(
                SelectBinder::new(self.catalog).bind(node)?,
            )),
        }
    }

    /// Binds a CREATE VIEW statement.
    ///
    /// Checks run in order and short-circuit on the first failure: the
    /// name must not collide with a table, nor with a view, the defining
    /// query must be present, and the query must bind. Inner binder
    /// errors propagate unchanged. No catalog mutation happens here;
    /// registration re-validates uniqueness.
    pub fn bind_create_view(
        &self,
        view_name: String,
        query: Option<SelectNode>,
    ) -> Result<BoundCreateView> {
        debug!(view = %view_name, "binding CREATE VIEW");

        match self.catalog.resolve(&view_name) {
            Some(CatalogObject::Table(_)) => {
                warn!(name = %view_name, "table with this name already exists");
                return Err(BindError::TableAlreadyExists(view_name).into());
            }
            Some(CatalogObject::View(_)) => {
                warn!(name = %view_name, "view already exists");
                return Err(BindError::ViewAlreadyExists(view_name).into());
            }
            None => {}
        }

        let Some(query) = query else {
            warn!(name = %view_name, "no select statement provided for view");
            return Err(BindError::MissingViewQuery(view_name).into());
        };

        let definition = SelectBinder::new(self.catalog).bind(query)?;

        Ok(BoundCreateView {
            view_name,
            definition: Box::new(definition),
        })
    }

    fn bind_insert(&self, table_name: &str, values: Vec<Literal>) -> Result<BoundInsert> {
        let schema = self
            .catalog
            .find_table(table_name)
            .ok_or_else(|| BindError::UndefinedTable(table_name.to_string()))?;
        let table = Arc::new(schema.clone());

        if values.len() != table.columns.len() {
            return Err(BindError::ColumnCountMismatch {
                expected: table.columns.len(),
                actual: values.len(),
            }
            .into());
        }

        let mut bound = Vec::with_capacity(values.len());
        for (literal, col) in values.into_iter().zip(table.columns.iter()) {
            bound.push(coerce_literal(literal, col.data_type)?);
        }

        Ok(BoundInsert {
            table,
            values: bound,
        })
    }
}

fn bind_create_table(
    table_name: String,
    columns: Vec<(String, String)>,
    primary_key: Vec<String>,
) -> Result<TableSchema> {
    let column_defs = columns
        .into_iter()
        .map(|(name, type_str)| {
            let data_type = DataType::parse(&type_str)
                .ok_or_else(|| BindError::UnknownType(type_str.clone()))?;
            ColumnDef::new(name, data_type)
        })
        .collect::<Result<Vec<_>>>()?;

    TableSchema::new(table_name, column_defs, primary_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display() {
        let err = BindError::TableAlreadyExists("orders".to_string());
        assert_eq!(err.to_string(), "Table with name orders already exists");

        let err = BindError::ViewAlreadyExists("v1".to_string());
        assert_eq!(err.to_string(), "View v1 already exists");

        let err = BindError::MissingViewQuery("v3".to_string());
        assert_eq!(err.to_string(), "No select statement provided for view v3");

        let err = BindError::TypeMismatch {
            expected: DataType::Int64,
            actual: DataType::String,
        };
        assert!(err.to_string().contains("Type mismatch"));
    }

    #[test]
    fn test_bound_statement_kind_tags() {
        let schema = TableSchema::new(
            "t".to_string(),
            vec![ColumnDef::new("id".to_string(), DataType::Int64).unwrap()],
            vec![],
        )
        .unwrap();
        let stmt = BoundStatement::CreateTable(schema);
        assert_eq!(stmt.kind(), StatementKind::CreateTable);
    }
}
