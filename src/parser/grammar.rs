//! Pest parser integration for the SQL grammar.

use pest::Parser;
use pest_derive::Parser;

use crate::error::{MinirelError, Result};
use crate::parser::ast::{
    ComparisonOp, Expression, Literal, OrderByItem, Projection, SelectNode, Statement,
};

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
struct SqlParser;

/// Parses a SQL statement string into a [`Statement`] AST.
///
/// # Errors
///
/// Returns a `ParseError` if the statement is syntactically invalid.
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let pairs = SqlParser::parse(Rule::sql_statement, sql).map_err(|e| {
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c))
            | pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        MinirelError::ParseError {
            line,
            col,
            message: e.variant.message().to_string(),
        }
    })?;

    build_ast(pairs)
}

fn build_ast(pairs: pest::iterators::Pairs<Rule>) -> Result<Statement> {
    for pair in pairs {
        if pair.as_rule() == Rule::sql_statement {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::statement {
                    return build_statement(inner);
                }
            }
        }
    }
    Err(MinirelError::ParseError {
        line: 0,
        col: 0,
        message: "No statement found".into(),
    })
}

fn build_statement(pair: pest::iterators::Pair<Rule>) -> Result<Statement> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::create_table => return build_create_table(inner),
            Rule::create_view => return build_create_view(inner),
            Rule::insert_stmt => return build_insert(inner),
            Rule::select_stmt => return Ok(Statement::Select(build_select(inner)?)),
            _ => {}
        }
    }
    Err(MinirelError::ParseError {
        line: 0,
        col: 0,
        message: "Unknown statement type".into(),
    })
}

fn build_create_table(pair: pest::iterators::Pair<Rule>) -> Result<Statement> {
    let mut table_name = String::new();
    let mut columns = Vec::new();
    let mut primary_key = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => {
                table_name = inner.as_str().to_string();
            }
            Rule::column_defs => {
                for def in inner.into_inner() {
                    if def.as_rule() == Rule::column_def {
                        let mut name = String::new();
                        let mut type_name = String::new();
                        for part in def.into_inner() {
                            match part.as_rule() {
                                Rule::identifier => name = part.as_str().to_string(),
                                Rule::type_name => type_name = part.as_str().to_string(),
                                _ => {}
                            }
                        }
                        columns.push((name, type_name));
                    }
                }
            }
            Rule::primary_key => {
                for col in inner.into_inner() {
                    if col.as_rule() == Rule::identifier {
                        primary_key.push(col.as_str().to_string());
                    }
                }
            }
            _ => {}
        }
    }

    Ok(Statement::CreateTable {
        table_name,
        columns,
        primary_key,
    })
}

fn build_create_view(pair: pest::iterators::Pair<Rule>) -> Result<Statement> {
    let mut view_name = String::new();
    let mut query = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => view_name = inner.as_str().to_string(),
            Rule::select_stmt => query = Some(build_select(inner)?),
            _ => {}
        }
    }

    Ok(Statement::CreateView { view_name, query })
}

fn build_insert(pair: pest::iterators::Pair<Rule>) -> Result<Statement> {
    let mut table_name = String::new();
    let mut values = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => table_name = inner.as_str().to_string(),
            Rule::literal => values.push(build_literal(inner)?),
            _ => {}
        }
    }

    Ok(Statement::Insert { table_name, values })
}

fn build_select(pair: pest::iterators::Pair<Rule>) -> Result<SelectNode> {
    let mut projection = Projection::All;
    let mut table_name = String::new();
    let mut filter = None;
    let mut order_by = None;
    let mut limit = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::select_list => {
                for item in inner.into_inner() {
                    match item.as_rule() {
                        Rule::star => projection = Projection::All,
                        Rule::column_list => {
                            let columns = item
                                .into_inner()
                                .filter(|c| c.as_rule() == Rule::identifier)
                                .map(|c| c.as_str().to_string())
                                .collect();
                            projection = Projection::Columns(columns);
                        }
                        _ => {}
                    }
                }
            }
            Rule::identifier => table_name = inner.as_str().to_string(),
            Rule::where_clause => {
                for cmp in inner.into_inner() {
                    if cmp.as_rule() == Rule::comparison {
                        filter = Some(build_comparison(cmp)?);
                    }
                }
            }
            Rule::order_by_clause => {
                let mut items = Vec::new();
                for item in inner.into_inner() {
                    if item.as_rule() == Rule::order_item {
                        items.push(build_order_item(item));
                    }
                }
                order_by = Some(items);
            }
            Rule::limit_clause => {
                for lit in inner.into_inner() {
                    if lit.as_rule() == Rule::integer_literal {
                        limit = lit.as_str().parse::<u64>().ok();
                    }
                }
            }
            _ => {}
        }
    }

    Ok(SelectNode {
        projection,
        table_name,
        filter,
        order_by,
        limit,
    })
}

fn build_comparison(pair: pest::iterators::Pair<Rule>) -> Result<Expression> {
    let mut column = String::new();
    let mut op = ComparisonOp::Eq;
    let mut value = Literal::Null;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => column = inner.as_str().to_string(),
            Rule::compare_op => {
                op = ComparisonOp::parse(inner.as_str()).ok_or_else(|| {
                    MinirelError::ParseError {
                        line: 0,
                        col: 0,
                        message: format!("Unknown comparison operator: {}", inner.as_str()),
                    }
                })?;
            }
            Rule::literal => value = build_literal(inner)?,
            _ => {}
        }
    }

    Ok(Expression { column, op, value })
}

fn build_order_item(pair: pest::iterators::Pair<Rule>) -> OrderByItem {
    let mut column = String::new();
    let mut ascending = true;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => column = inner.as_str().to_string(),
            Rule::sort_dir => ascending = !inner.as_str().eq_ignore_ascii_case("DESC"),
            _ => {}
        }
    }

    OrderByItem { column, ascending }
}

fn build_literal(pair: pest::iterators::Pair<Rule>) -> Result<Literal> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::null_literal => return Ok(Literal::Null),
            Rule::bool_literal => {
                return Ok(Literal::Bool(inner.as_str().eq_ignore_ascii_case("TRUE")));
            }
            Rule::integer_literal => {
                let n = inner.as_str().parse::<i64>().map_err(|e| {
                    MinirelError::ParseError {
                        line: 0,
                        col: 0,
                        message: format!("Invalid integer literal: {e}"),
                    }
                })?;
                return Ok(Literal::Int64(n));
            }
            Rule::float_literal => {
                let f = inner.as_str().parse::<f64>().map_err(|e| {
                    MinirelError::ParseError {
                        line: 0,
                        col: 0,
                        message: format!("Invalid float literal: {e}"),
                    }
                })?;
                return Ok(Literal::Float64(f));
            }
            Rule::string_literal => {
                // Remove surrounding quotes
                let s = inner.as_str();
                return Ok(Literal::String(s[1..s.len() - 1].to_string()));
            }
            _ => {}
        }
    }
    Err(MinirelError::ParseError {
        line: 0,
        col: 0,
        message: "Invalid literal".into(),
    })
}
