//! An executor over tables held in memory, evaluating the same `Select` ASTs
//! the SQL executors render.

use crate::{error::DbError, executor::QueryExecutor};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::select::Select;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};
use tokio::sync::RwLock;
use tracing::debug;

mod eval;

#[derive(Debug, Default)]
pub struct MemoryExecutor {
    tables: RwLock<HashMap<String, Vec<RowData>>>,
    queries: AtomicUsize,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, rows: Vec<RowData>) -> Self {
        self.tables
            .get_mut()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }

    /// Appends rows to a table, creating it when missing.
    pub async fn insert(&self, table: &str, rows: Vec<RowData>) {
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Number of fetch and count queries executed so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn filtered(&self, query: &Select) -> Result<Vec<RowData>, DbError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let from = query
            .from
            .as_ref()
            .ok_or_else(|| DbError::UnsupportedQuery("SELECT without FROM".to_string()))?;
        let table = from.table.qualified_name();

        let tables = self.tables.read().await;
        let rows = tables
            .get(&table)
            .ok_or_else(|| DbError::UnknownTable(table.clone()))?;

        let mut matched = Vec::new();
        for row in rows {
            let keep = match &query.where_clause {
                Some(condition) => eval::satisfies(condition, row)?,
                None => true,
            };
            if keep {
                matched.push(row.clone());
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn fetch_rows(&self, query: &Select) -> Result<Vec<RowData>, DbError> {
        let mut rows = self.filtered(query).await?;
        eval::sort_rows(&mut rows, &query.order_by)?;
        if let Some(limit) = eval::limit(query)? {
            rows.truncate(limit);
        }

        let rows = rows
            .iter()
            .map(|row| eval::project(row, &query.columns))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(table = ?query.table_name(), rows = rows.len(), "Fetched rows from memory");
        Ok(rows)
    }

    async fn count_rows(&self, query: &Select) -> Result<u64, DbError> {
        let count = self.filtered(query).await?.len() as u64;
        debug!(table = ?query.table_name(), count, "Counted rows in memory");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::Value;
    use planner::{
        query::{
            ast::{
                common::OrderDir,
                expr::{BinaryOperator, Expr},
            },
            builder::select::SelectBuilder,
            ident, value,
        },
        table_ref,
    };
    use tracing_test::traced_test;

    fn numbers(n: i64) -> Vec<RowData> {
        (1..=n)
            .map(|i| {
                RowData::from_pairs(
                    "numbers",
                    [("id", Value::Int(i)), ("parity", Value::Int(i % 2))],
                )
            })
            .collect()
    }

    #[traced_test]
    #[tokio::test]
    async fn test_fetch_filters_orders_and_limits() {
        let executor = MemoryExecutor::new().with_table("numbers", numbers(10));

        let query = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("numbers"), None)
            .where_clause(Expr::binary(ident("id"), BinaryOperator::Gt, value(Value::Int(4))))
            .order_by(ident("id"), Some(OrderDir::Desc))
            .limit(value(Value::Int(3)))
            .build();

        let rows = executor.fetch_rows(&query).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.get_value("id")).collect();

        assert_eq!(ids, vec![Value::Int(10), Value::Int(9), Value::Int(8)]);
        assert!(rows[0].get("parity").is_none());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_count_ignores_limit() {
        let executor = MemoryExecutor::new();
        executor.insert("numbers", numbers(10)).await;

        let query = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("numbers"), None)
            .where_clause(Expr::binary(ident("parity"), BinaryOperator::Eq, value(Value::Int(0))))
            .limit(value(Value::Int(2)))
            .build();

        assert_eq!(executor.count_rows(&query.to_count()).await.unwrap(), 5);
        assert_eq!(executor.query_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let executor = MemoryExecutor::new();
        let query = SelectBuilder::new()
            .select(vec![ident("id")])
            .from(table_ref!("missing"), None)
            .build();

        let err = executor.fetch_rows(&query).await.unwrap_err();
        assert!(matches!(err, DbError::UnknownTable(name) if name == "missing"));
    }
}
