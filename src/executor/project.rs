//! Project operator for SELECT projections.

use crate::binder::BoundColumn;
use crate::error::Result;
use crate::executor::PhysicalOperator;
use crate::types::Row;

/// Project operator for column projection.
pub struct ProjectOperator {
    child: Box<dyn PhysicalOperator>,
    projections: Vec<BoundColumn>,
}

impl ProjectOperator {
    /// Creates a new project operator with the given child and projections.
    #[must_use]
    pub fn new(child: Box<dyn PhysicalOperator>, projections: Vec<BoundColumn>) -> Self {
        ProjectOperator { child, projections }
    }

    /// Returns the column names that will be in the output.
    #[must_use]
    pub fn output_columns(&self) -> Vec<String> {
        self.projections.iter().map(|c| c.name.clone()).collect()
    }
}

impl PhysicalOperator for ProjectOperator {
    fn next(&mut self) -> Result<Option<Row>> {
        let Some(input_row) = self.child.next()? else {
            return Ok(None);
        };

        let mut output_row = Row::new();
        for col in &self.projections {
            if let Some(value) = input_row.get(&col.name) {
                output_row.set(col.name.clone(), value.clone());
            }
        }

        Ok(Some(output_row))
    }
}
