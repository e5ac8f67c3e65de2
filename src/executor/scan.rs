//! Table scan operator.

use std::sync::Arc;

use crate::error::Result;
use crate::executor::PhysicalOperator;
use crate::storage::Table;
use crate::types::Row;

/// Scan operator for full table scans.
pub struct ScanOperator {
    table: Arc<Table>,
    cursor: usize,
}

impl ScanOperator {
    /// Creates a new scan operator for the given table.
    #[must_use]
    pub fn new(table: Arc<Table>) -> Self {
        ScanOperator { table, cursor: 0 }
    }
}

impl PhysicalOperator for ScanOperator {
    fn next(&mut self) -> Result<Option<Row>> {
        let Some(values) = self.table.row(self.cursor) else {
            return Ok(None);
        };

        let mut row = Row::new();
        for (col_def, value) in self.table.schema().columns.iter().zip(values.iter()) {
            row.set(col_def.name.clone(), value.clone());
        }

        self.cursor += 1;
        Ok(Some(row))
    }
}
