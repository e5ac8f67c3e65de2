//! Schema definitions and the catalog registry.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MinirelError, Result};
use crate::types::DataType;

use super::view::View;

/// A named object resolved from the catalog namespace.
///
/// Tables and views share one identifier space; a single `resolve` call
/// reports which kind a name refers to, so callers cannot observe the
/// two registries at different points in time.
#[derive(Debug)]
pub enum CatalogObject<'a> {
    /// The name refers to a table.
    Table(&'a TableSchema),
    /// The name refers to a view.
    View(&'a View),
}

/// Central registry of all named schema objects in the database.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Table schemas.
    tables: HashMap<String, TableSchema>,
    /// View entries.
    views: HashMap<String, View>,
    /// Next table ID for auto-increment.
    next_table_id: u32,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Catalog {
            tables: HashMap::new(),
            views: HashMap::new(),
            next_table_id: 0,
        }
    }

    /// Returns the next table ID and increments the counter.
    fn next_id(&mut self) -> u32 {
        let id = self.next_table_id;
        self.next_table_id += 1;
        id
    }

    /// Registers a new table schema in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a table or view with the same name already
    /// exists.
    pub fn create_table(&mut self, mut schema: TableSchema) -> Result<u32> {
        if self.tables.contains_key(&schema.name) || self.views.contains_key(&schema.name) {
            return Err(MinirelError::SchemaError(format!(
                "Table '{}' already exists",
                schema.name
            )));
        }
        let table_id = self.next_id();
        schema.table_id = table_id;
        debug!(table = %schema.name, table_id, "registered table");
        self.tables.insert(schema.name.clone(), schema);
        Ok(table_id)
    }

    /// Registers a view in the catalog, taking ownership of the view and
    /// its definition.
    ///
    /// The binder's collision check is advisory; registration re-validates
    /// uniqueness against both tables and views.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is invalid or its name already exists
    /// in the catalog namespace.
    pub fn create_view(&mut self, view: View) -> Result<()> {
        if !view.is_valid() {
            return Err(MinirelError::SchemaError(
                "View entry is not valid".into(),
            ));
        }
        if self.tables.contains_key(view.name()) || self.views.contains_key(view.name()) {
            return Err(MinirelError::SchemaError(format!(
                "Name '{}' already exists in the catalog",
                view.name()
            )));
        }
        debug!(view = %view.name(), "registered view");
        self.views.insert(view.name().to_string(), view);
        Ok(())
    }

    /// Retrieves a table schema by name.
    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Retrieves a view by name.
    #[must_use]
    pub fn find_view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    /// Resolves a name against the shared table/view namespace.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<CatalogObject<'_>> {
        if let Some(table) = self.tables.get(name) {
            return Some(CatalogObject::Table(table));
        }
        self.views.get(name).map(CatalogObject::View)
    }

    /// Checks if a table exists in the catalog.
    #[must_use]
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Checks if a view exists in the catalog.
    #[must_use]
    pub fn view_exists(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Returns all table names.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Returns all view names.
    #[must_use]
    pub fn view_names(&self) -> Vec<&str> {
        self.views.keys().map(String::as_str).collect()
    }
}

/// Schema definition for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Internal table ID.
    pub table_id: u32,
    /// Table name.
    pub name: String,
    /// Ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
    /// Column names forming the primary key.
    pub primary_key: Vec<String>,
}

impl TableSchema {
    /// Creates a new table schema with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (empty columns, duplicate
    /// names, invalid primary key).
    pub fn new(name: String, columns: Vec<ColumnDef>, primary_key: Vec<String>) -> Result<Self> {
        let schema = TableSchema {
            table_id: 0, // Will be set by catalog
            name,
            columns,
            primary_key,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        // Check at least one column
        if self.columns.is_empty() {
            return Err(MinirelError::SchemaError(
                "Table must have at least one column".into(),
            ));
        }

        // Check column name uniqueness
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(&col.name) {
                return Err(MinirelError::SchemaError(format!(
                    "Duplicate column name '{}'",
                    col.name
                )));
            }
        }

        // Check primary key columns exist
        for pk_col in &self.primary_key {
            if !self.columns.iter().any(|c| &c.name == pk_col) {
                return Err(MinirelError::SchemaError(format!(
                    "Primary key column '{pk_col}' not found in table"
                )));
            }
        }

        Ok(())
    }

    /// Finds a column definition by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Finds the index of a column by name.
    #[must_use]
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Definition of a single column in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
}

impl ColumnDef {
    /// Creates a new column definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name is empty.
    pub fn new(name: String, data_type: DataType) -> Result<Self> {
        if name.is_empty() {
            return Err(MinirelError::SchemaError(
                "Column name cannot be empty".into(),
            ));
        }
        Ok(ColumnDef { name, data_type })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::binder::{BoundColumn, BoundSelect};

    fn orders_schema() -> TableSchema {
        TableSchema::new(
            "orders".to_string(),
            vec![
                ColumnDef::new("id".to_string(), DataType::Int64).unwrap(),
                ColumnDef::new("amount".to_string(), DataType::Float64).unwrap(),
            ],
            vec!["id".to_string()],
        )
        .unwrap()
    }

    fn view_over(schema: &TableSchema, name: &str) -> View {
        let table = Arc::new(schema.clone());
        let definition = BoundSelect {
            projections: vec![BoundColumn {
                name: "id".to_string(),
                index: 0,
                data_type: DataType::Int64,
            }],
            table,
            predicate: None,
            order_by: Vec::new(),
            limit: None,
        };
        View::new(name.to_string(), Box::new(definition)).unwrap()
    }

    #[test]
    fn test_create_table_rejects_duplicate() {
        let mut catalog = Catalog::new();
        catalog.create_table(orders_schema()).unwrap();

        let result = catalog.create_table(orders_schema());
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_tagged_lookup() {
        let mut catalog = Catalog::new();
        let schema = orders_schema();
        let view = view_over(&schema, "recent");
        catalog.create_table(schema).unwrap();
        catalog.create_view(view).unwrap();

        assert!(matches!(
            catalog.resolve("orders"),
            Some(CatalogObject::Table(_))
        ));
        assert!(matches!(
            catalog.resolve("recent"),
            Some(CatalogObject::View(_))
        ));
        assert!(catalog.resolve("missing").is_none());
    }

    #[test]
    fn test_create_view_revalidates_uniqueness() {
        let mut catalog = Catalog::new();
        let schema = orders_schema();
        let against_table = view_over(&schema, "orders");
        let first = view_over(&schema, "v1");
        let second = view_over(&schema, "v1");
        catalog.create_table(schema).unwrap();

        // Collides with the table name
        assert!(catalog.create_view(against_table).is_err());

        catalog.create_view(first).unwrap();
        // Collides with the first view
        assert!(catalog.create_view(second).is_err());
        assert!(catalog.view_exists("v1"));
    }

    #[test]
    fn test_table_name_blocked_by_view() {
        let mut catalog = Catalog::new();
        let schema = orders_schema();
        let view = view_over(&schema, "orders_view");
        catalog.create_view(view).unwrap();

        let mut blocked = orders_schema();
        blocked.name = "orders_view".to_string();
        assert!(catalog.create_table(blocked).is_err());
    }
}
