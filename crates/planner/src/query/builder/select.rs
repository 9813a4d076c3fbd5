//! Provides a type-safe, fluent builder for constructing `Select` ASTs.

// --- Typestate Marker Structs ---
// These zero-sized structs represent the state of the builder.
// They ensure that methods are called in the correct SQL order at compile time.

use crate::query::ast::{
    common::{OrderDir, TableRef},
    expr::Expr,
    select::{FromClause, OrderByExpr, Select},
};

/// The initial state of the builder before any clauses have been added.
#[derive(Debug, Default, Clone)]
pub struct InitialState;

/// The state after the `SELECT` clause has been added.
#[derive(Debug, Default, Clone)]
pub struct SelectState;

/// The state after the `FROM` clause has been added.
#[derive(Debug, Default, Clone)]
pub struct FromState;

// --- The Main Builder ---

#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    ast: Select,
    state: State,
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implementation for the initial state of the builder.
impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            ast: Select::default(),
            state: InitialState,
        }
    }

    /// Adds a `SELECT` clause with a list of columns.
    /// This is the entry point for building a select query.
    pub fn select(mut self, columns: Vec<Expr>) -> SelectBuilder<SelectState> {
        self.ast.columns = columns;
        SelectBuilder {
            ast: self.ast,
            state: SelectState,
        }
    }
}

/// Implementation for the state after `SELECT` has been called.
/// The only valid next step is to specify a `FROM` table.
impl SelectBuilder<SelectState> {
    /// Adds a `FROM` clause specifying the primary table.
    pub fn from(mut self, table: TableRef, alias: Option<&str>) -> SelectBuilder<FromState> {
        self.ast.from = Some(FromClause {
            table,
            alias: alias.map(String::from),
        });
        SelectBuilder {
            ast: self.ast,
            state: FromState,
        }
    }
}

/// Implementation for the state after `FROM` has been called.
/// From here, we can add optional clauses like `WHERE`, `ORDER BY`, etc.
impl SelectBuilder<FromState> {
    /// Sets the `WHERE` clause, replacing any existing condition.
    pub fn where_clause(mut self, condition: Expr) -> Self {
        self.ast.where_clause = Some(condition);
        self
    }

    /// Adds a condition to the `WHERE` clause, combined with `AND` when a
    /// condition already exists.
    pub fn and_where(mut self, condition: Expr) -> Self {
        self.ast.where_clause = Some(match self.ast.where_clause.take() {
            Some(existing) => Expr::and(existing, condition),
            None => condition,
        });
        self
    }

    /// Adds an `ORDER BY` clause to the query.
    pub fn order_by(mut self, expr: Expr, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr { expr, direction });
        self
    }

    /// Adds a `LIMIT` clause to the query.
    pub fn limit(mut self, limit: Expr) -> Self {
        self.ast.limit = Some(limit);
        self
    }

    /// Finalizes and returns the constructed `Select` AST.
    pub fn build(self) -> Select {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{
            common::OrderDir,
            expr::{BinaryOperator, Expr},
        },
        builder::select::SelectBuilder,
        ident, value,
    };
    use crate::table_ref;
    use model::core::value::Value;

    #[test]
    fn test_build_simple_select() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id"), ident("name")])
            .from(table_ref!("users"), None)
            .build();

        assert_eq!(ast.columns, vec![ident("id"), ident("name")]);
        assert_eq!(ast.table_name(), Some("users"));
        assert!(ast.where_clause.is_none());
    }

    #[test]
    fn test_and_where_combines_conditions() {
        let first = Expr::binary(ident("id"), BinaryOperator::Gt, value(Value::Int(10)));
        let second = Expr::binary(ident("id"), BinaryOperator::Lt, value(Value::Int(20)));

        let ast = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("users"), None)
            .and_where(first.clone())
            .and_where(second.clone())
            .build();

        assert_eq!(ast.where_clause, Some(Expr::and(first, second)));
    }

    #[test]
    fn test_build_with_ordering_and_limit() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("products"), None)
            .order_by(ident("created_at"), Some(OrderDir::Desc))
            .limit(value(Value::Int(50)))
            .build();

        assert_eq!(ast.order_by.len(), 1);
        assert_eq!(ast.order_by[0].direction, Some(OrderDir::Desc));
        assert_eq!(ast.limit, Some(value(Value::Int(50))));
    }

    #[test]
    fn test_count_drops_order_and_limit() {
        let filter = Expr::binary(ident("id"), BinaryOperator::Gt, value(Value::Int(3)));
        let ast = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("products"), None)
            .where_clause(filter.clone())
            .order_by(ident("id"), Some(OrderDir::Asc))
            .limit(value(Value::Int(5)))
            .build();

        let count = ast.to_count();
        assert_eq!(count.columns, vec![Expr::count_all()]);
        assert_eq!(count.where_clause, Some(filter));
        assert!(count.order_by.is_empty());
        assert!(count.limit.is_none());
    }
}
