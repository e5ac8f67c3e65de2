//! Abstract Syntax Tree definitions for SQL statements.

/// A parsed SQL statement.
#[derive(Debug, Clone)]
pub enum Statement {
    /// CREATE TABLE statement.
    CreateTable {
        table_name: String,
        columns: Vec<(String, String)>,
        primary_key: Vec<String>,
    },
    /// CREATE VIEW statement.
    CreateView {
        view_name: String,
        /// Defining query. Absent when the raw syntax node carried no
        /// SELECT; the binder rejects that case.
        query: Option<SelectNode>,
    },
    /// INSERT statement.
    Insert {
        table_name: String,
        values: Vec<Literal>,
    },
    /// SELECT statement.
    Select(SelectNode),
}

/// A parsed SELECT query.
#[derive(Debug, Clone)]
pub struct SelectNode {
    /// Projection list (`*` or named columns).
    pub projection: Projection,
    /// Table name in the FROM clause.
    pub table_name: String,
    /// WHERE clause filter.
    pub filter: Option<Expression>,
    /// ORDER BY clause.
    pub order_by: Option<Vec<OrderByItem>>,
    /// LIMIT amount.
    pub limit: Option<u64>,
}

/// Projection list in a SELECT.
#[derive(Debug, Clone)]
pub enum Projection {
    /// SELECT * — all columns of the source table.
    All,
    /// Explicit column list.
    Columns(Vec<String>),
}

/// Literal values in SQL statements.
#[derive(Debug, Clone)]
pub enum Literal {
    /// 64-bit integer literal.
    Int64(i64),
    /// 64-bit float literal.
    Float64(f64),
    /// String literal.
    String(String),
    /// Boolean literal.
    Bool(bool),
    /// NULL literal.
    Null,
}

/// Expression in WHERE clause: a single column/literal comparison.
#[derive(Debug, Clone)]
pub struct Expression {
    pub column: String,
    pub op: ComparisonOp,
    pub value: Literal,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
    Neq,
}

impl ComparisonOp {
    /// Parses a comparison operator from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ">" => Some(ComparisonOp::Gt),
            "<" => Some(ComparisonOp::Lt),
            "=" => Some(ComparisonOp::Eq),
            ">=" => Some(ComparisonOp::Gte),
            "<=" => Some(ComparisonOp::Lte),
            "<>" => Some(ComparisonOp::Neq),
            _ => None,
        }
    }
}

/// ORDER BY item.
#[derive(Debug, Clone)]
pub struct OrderByItem {
    /// Column name.
    pub column: String,
    /// Sort direction (true = ASC, false = DESC).
    pub ascending: bool,
}
