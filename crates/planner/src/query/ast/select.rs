//! Defines the Abstract Syntax Tree (AST) for a SELECT query.

use crate::query::ast::{
    common::{OrderDir, TableRef},
    expr::Expr,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    /// The list of columns or expressions to be returned.
    /// e.g., `id`, `name`, `COUNT(*)`
    pub columns: Vec<Expr>,

    /// The primary table for the query.
    /// e.g., `FROM users`
    pub from: Option<FromClause>,

    /// The WHERE clause condition.
    pub where_clause: Option<Expr>,

    /// The ORDER BY clause.
    pub order_by: Vec<OrderByExpr>,

    /// The LIMIT clause.
    pub limit: Option<Expr>,
}

impl Select {
    /// The same scope counted: `SELECT COUNT(*)` with the FROM and WHERE
    /// clauses kept and ordering and limit dropped.
    pub fn to_count(&self) -> Select {
        Select {
            columns: vec![Expr::count_all()],
            from: self.from.clone(),
            where_clause: self.where_clause.clone(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn table_name(&self) -> Option<&str> {
        self.from.as_ref().map(|f| f.table.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: TableRef,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<OrderDir>,
}
