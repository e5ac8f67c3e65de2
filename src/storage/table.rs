//! In-memory row-oriented table storage.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::TableSchema;
use crate::error::{MinirelError, Result};
use crate::types::Value;

/// Row-oriented table with primary-key enforcement.
pub struct Table {
    schema: Arc<TableSchema>,
    rows: Vec<Vec<Value>>,
    pk_index: HashMap<Vec<Value>, usize>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("schema", &self.schema.name)
            .field("row_count", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Creates a new empty table with the given schema.
    #[must_use]
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Table {
            schema,
            rows: Vec::new(),
            pk_index: HashMap::new(),
        }
    }

    /// Returns the table schema.
    #[must_use]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the number of rows in the table.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a row by index, in schema column order.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Inserts a row given in schema column order.
    ///
    /// # Errors
    ///
    /// Returns an error if the value count does not match the schema, a
    /// value's type does not match its column, a primary-key value is
    /// NULL, or the primary key is already present.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.schema.columns.len() {
            return Err(MinirelError::ExecutionError(format!(
                "Expected {} values, got {}",
                self.schema.columns.len(),
                values.len()
            )));
        }

        for (value, col) in values.iter().zip(self.schema.columns.iter()) {
            if let Some(actual) = value.data_type() {
                if actual != col.data_type {
                    return Err(MinirelError::TypeError {
                        expected: col.data_type.name().to_string(),
                        actual: actual.name().to_string(),
                    });
                }
            }
        }

        let key = self.primary_key_of(&values)?;
        if !key.is_empty() && self.pk_index.contains_key(&key) {
            return Err(MinirelError::ConstraintViolation(format!(
                "Duplicate primary key in table '{}'",
                self.schema.name
            )));
        }

        if !key.is_empty() {
            self.pk_index.insert(key, self.rows.len());
        }
        self.rows.push(values);
        Ok(())
    }

    fn primary_key_of(&self, values: &[Value]) -> Result<Vec<Value>> {
        let mut key = Vec::with_capacity(self.schema.primary_key.len());
        for pk_col in &self.schema.primary_key {
            let index = self.schema.get_column_index(pk_col).ok_or_else(|| {
                MinirelError::SchemaError(format!(
                    "Primary key column '{pk_col}' not found in table"
                ))
            })?;
            let value = &values[index];
            if value.is_null() {
                return Err(MinirelError::ConstraintViolation(format!(
                    "Primary key column '{pk_col}' cannot be NULL"
                )));
            }
            key.push(value.clone());
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnDef;
    use crate::types::DataType;

    fn orders_table() -> Table {
        let schema = TableSchema::new(
            "orders".to_string(),
            vec![
                ColumnDef::new("id".to_string(), DataType::Int64).unwrap(),
                ColumnDef::new("note".to_string(), DataType::String).unwrap(),
            ],
            vec!["id".to_string()],
        )
        .unwrap();
        Table::new(Arc::new(schema))
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut table = orders_table();
        table
            .insert(vec![Value::Int64(1), Value::String("a".to_string())])
            .unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.row(0).unwrap()[0], Value::Int64(1));
    }

    #[test]
    fn test_insert_rejects_type_mismatch() {
        let mut table = orders_table();
        let result = table.insert(vec![
            Value::String("oops".to_string()),
            Value::String("a".to_string()),
        ]);
        assert!(matches!(result, Err(MinirelError::TypeError { .. })));
    }

    #[test]
    fn test_insert_rejects_duplicate_primary_key() {
        let mut table = orders_table();
        table
            .insert(vec![Value::Int64(1), Value::String("a".to_string())])
            .unwrap();
        let result = table.insert(vec![Value::Int64(1), Value::String("b".to_string())]);
        assert!(matches!(
            result,
            Err(MinirelError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_insert_rejects_null_primary_key() {
        let mut table = orders_table();
        let result = table.insert(vec![Value::Null, Value::String("a".to_string())]);
        assert!(matches!(
            result,
            Err(MinirelError::ConstraintViolation(_))
        ));
    }
}
