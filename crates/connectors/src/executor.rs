use crate::error::DbError;
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::ast::select::Select;

/// The store a page is read from.
///
/// Implementations run the query as given. Retries, timeouts and
/// cancellation are their own concern.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes the query and returns rows in the order it asks for.
    async fn fetch_rows(&self, query: &Select) -> Result<Vec<RowData>, DbError>;

    /// Counts the rows matching the query's table and filter, ignoring any
    /// projection, ordering or limit.
    async fn count_rows(&self, query: &Select) -> Result<u64, DbError>;
}
