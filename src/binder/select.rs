//! SELECT binding against the catalog.

use std::sync::Arc;

use crate::catalog::{Catalog, TableSchema};
use crate::error::Result;
use crate::parser::ast::{ComparisonOp, Expression, Literal, Projection, SelectNode};
use crate::types::{DataType, Value};

use super::statement::BindError;

/// A column resolved against a table schema.
#[derive(Debug, Clone)]
pub struct BoundColumn {
    /// Column name.
    pub name: String,
    /// Position within the table schema.
    pub index: usize,
    /// Column data type.
    pub data_type: DataType,
}

/// A bound WHERE comparison with the literal coerced to the column type.
#[derive(Debug, Clone)]
pub struct BoundPredicate {
    /// Filtered column.
    pub column: BoundColumn,
    /// Comparison operator.
    pub op: ComparisonOp,
    /// Comparison value.
    pub value: Value,
}

/// A bound ORDER BY key.
#[derive(Debug, Clone)]
pub struct BoundOrderBy {
    /// Sort column.
    pub column: BoundColumn,
    /// Sort ascending (true) or descending (false).
    pub ascending: bool,
}

/// Bound SELECT query with all clauses resolved.
#[derive(Debug, Clone)]
pub struct BoundSelect {
    /// Source table schema snapshot.
    pub table: Arc<TableSchema>,
    /// Resolved output columns, in projection order.
    pub projections: Vec<BoundColumn>,
    /// Bound WHERE clause.
    pub predicate: Option<BoundPredicate>,
    /// Bound ORDER BY keys (empty when absent).
    pub order_by: Vec<BoundOrderBy>,
    /// LIMIT amount.
    pub limit: Option<usize>,
}

impl BoundSelect {
    /// Returns the output column names, in projection order.
    #[must_use]
    pub fn output_columns(&self) -> Vec<String> {
        self.projections.iter().map(|c| c.name.clone()).collect()
    }
}

/// Binder for SELECT queries.
pub struct SelectBinder<'a> {
    /// Reference to the database catalog.
    catalog: &'a Catalog,
}

impl<'a> SelectBinder<'a> {
    /// Creates a new SELECT binder with the given catalog.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        SelectBinder { catalog }
    }

    /// Binds a parsed SELECT against the catalog, producing an owned,
    /// validated query.
    ///
    /// The FROM name resolves against tables only; views are not
    /// queryable at SELECT time.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist, a referenced column
    /// does not exist, the WHERE literal is incompatible with its column
    /// type, or an ORDER BY column is not part of the projection.
    pub fn bind(&self, node: SelectNode) -> Result<BoundSelect> {
        let schema = self
            .catalog
            .find_table(&node.table_name)
            .ok_or_else(|| BindError::UndefinedTable(node.table_name.clone()))?;
        let table = Arc::new(schema.clone());

        let projections: Vec<BoundColumn> = match node.projection {
            Projection::All => table
                .columns
                .iter()
                .enumerate()
                .map(|(index, col)| BoundColumn {
                    name: col.name.clone(),
                    index,
                    data_type: col.data_type,
                })
                .collect(),
            Projection::Columns(names) => names
                .iter()
                .map(|name| resolve_column(&table, name))
                .collect::<Result<Vec<_>>>()?,
        };

        let predicate = match node.filter {
            Some(expr) => Some(bind_comparison(&table, expr)?),
            None => None,
        };

        let mut order_by = Vec::new();
        if let Some(items) = node.order_by {
            for item in items {
                let column = resolve_column(&table, &item.column)?;
                // Rows are sorted after projection, so the key must be
                // part of the output
                if !projections.iter().any(|p| p.index == column.index) {
                    return Err(
                        BindError::OrderByColumnNotProjected(item.column.clone()).into()
                    );
                }
                order_by.push(BoundOrderBy {
                    column,
                    ascending: item.ascending,
                });
            }
        }

        Ok(BoundSelect {
            table,
            projections,
            predicate,
            order_by,
            limit: node.limit.map(|n| n as usize),
        })
    }
}

fn resolve_column(table: &TableSchema, name: &str) -> Result<BoundColumn> {
    let index = table
        .get_column_index(name)
        .ok_or_else(|| BindError::UndefinedColumn(table.name.clone(), name.to_string()))?;
    Ok(BoundColumn {
        name: name.to_string(),
        index,
        data_type: table.columns[index].data_type,
    })
}

fn bind_comparison(table: &TableSchema, expr: Expression) -> Result<BoundPredicate> {
    let column = resolve_column(table, &expr.column)?;
    let value = coerce_literal(expr.value, column.data_type)?;
    Ok(BoundPredicate {
        column,
        op: expr.op,
        value,
    })
}

/// Converts a literal to a value of the target column type.
///
/// Int64 literals are promoted to Float64 for float columns; NULL passes
/// through untyped.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn coerce_literal(literal: Literal, target: DataType) -> Result<Value> {
    let value = match literal {
        Literal::Int64(n) => {
            if target == DataType::Float64 {
                Value::Float64(n as f64)
            } else {
                Value::Int64(n)
            }
        }
        Literal::Float64(f) => Value::Float64(f),
        Literal::String(s) => Value::String(s),
        Literal::Bool(b) => Value::Bool(b),
        Literal::Null => return Ok(Value::Null),
    };
    match value.data_type() {
        Some(actual) if actual != target => Err(BindError::TypeMismatch {
            expected: target,
            actual,
        }
        .into()),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnDef;
    use crate::error::MinirelError;
    use crate::parser::ast::OrderByItem;

    fn catalog_with_orders() -> Catalog {
        let mut catalog = Catalog::new();
        let schema = TableSchema::new(
            "orders".to_string(),
            vec![
                ColumnDef::new("id".to_string(), DataType::Int64).unwrap(),
                ColumnDef::new("amount".to_string(), DataType::Float64).unwrap(),
            ],
            vec!["id".to_string()],
        )
        .unwrap();
        catalog.create_table(schema).unwrap();
        catalog
    }

    fn select_all_from(table: &str) -> SelectNode {
        SelectNode {
            projection: Projection::All,
            table_name: table.to_string(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    #[test]
    fn test_bind_star_expands_all_columns() {
        let catalog = catalog_with_orders();
        let bound = SelectBinder::new(&catalog)
            .bind(select_all_from("orders"))
            .unwrap();
        assert_eq!(bound.output_columns(), vec!["id", "amount"]);
        assert_eq!(bound.projections[1].index, 1);
    }

    #[test]
    fn test_bind_undefined_table_rejected() {
        let catalog = catalog_with_orders();
        let result = SelectBinder::new(&catalog).bind(select_all_from("missing"));
        match result {
            Err(MinirelError::BindError(msg)) => {
                assert!(msg.contains("Undefined table"), "unexpected message: {msg}");
            }
            other => panic!("Expected BindError, got {other:?}"),
        }
    }

    #[test]
    fn test_bind_predicate_promotes_int_literal() {
        let catalog = catalog_with_orders();
        let mut node = select_all_from("orders");
        node.filter = Some(Expression {
            column: "amount".to_string(),
            op: ComparisonOp::Gt,
            value: Literal::Int64(100),
        });
        let bound = SelectBinder::new(&catalog).bind(node).unwrap();
        let predicate = bound.predicate.unwrap();
        assert_eq!(predicate.value, Value::Float64(100.0));
    }

    #[test]
    fn test_bind_predicate_type_mismatch_rejected() {
        let catalog = catalog_with_orders();
        let mut node = select_all_from("orders");
        node.filter = Some(Expression {
            column: "id".to_string(),
            op: ComparisonOp::Eq,
            value: Literal::String("abc".to_string()),
        });
        let result = SelectBinder::new(&catalog).bind(node);
        match result {
            Err(MinirelError::BindError(msg)) => {
                assert!(msg.contains("Type mismatch"), "unexpected message: {msg}");
            }
            other => panic!("Expected BindError, got {other:?}"),
        }
    }

    #[test]
    fn test_bind_order_by_requires_projected_column() {
        let catalog = catalog_with_orders();
        let mut node = select_all_from("orders");
        node.projection = Projection::Columns(vec!["id".to_string()]);
        node.order_by = Some(vec![OrderByItem {
            column: "amount".to_string(),
            ascending: true,
        }]);
        assert!(SelectBinder::new(&catalog).bind(node).is_err());
    }
}
