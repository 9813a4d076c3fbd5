use crate::{
    error::{ConnectorError, DbError},
    executor::QueryExecutor,
    sql::postgres::{
        metadata::{
            COL_COLUMN_NAME, COL_CONSTRAINT_TYPE, COL_DATA_TYPE, ColumnInfo, UniqueInfo,
            build_schema,
        },
        params::PgParamStore,
        row::PgRowReader,
        utils::{connect_client, split_table},
    },
};
use async_trait::async_trait;
use model::{entity::EntitySchema, records::row::RowData};
use planner::query::{ast::select::Select, dialect, renderer::render_with};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

const QUERY_COLUMNS_SQL: &str = include_str!("sql/columns.sql");
const QUERY_UNIQUE_COLUMNS_SQL: &str = include_str!("sql/unique_columns.sql");

#[derive(Clone)]
pub struct PgExecutor {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

impl PgExecutor {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = Arc::new(RwLock::new(connect_client(url).await?));
        Ok(PgExecutor {
            client,
            dialect: dialect::Postgres,
        })
    }

    /// Introspects a table (optionally `schema.table`) into an entity schema.
    pub async fn describe_table(&self, table: &str) -> Result<EntitySchema, DbError> {
        let (schema, name) = split_table(table);
        let client = self.client.read().await;

        let columns = client
            .query(QUERY_COLUMNS_SQL, &[&schema, &name])
            .await?
            .iter()
            .map(|row| {
                Ok(ColumnInfo {
                    name: row.try_get(COL_COLUMN_NAME)?,
                    data_type: row.try_get(COL_DATA_TYPE)?,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        let uniques = client
            .query(QUERY_UNIQUE_COLUMNS_SQL, &[&schema, &name])
            .await?
            .iter()
            .map(|row| {
                Ok(UniqueInfo {
                    column: row.try_get(COL_COLUMN_NAME)?,
                    constraint_type: row.try_get(COL_CONSTRAINT_TYPE)?,
                })
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        debug!(table, columns = columns.len(), "Described table");
        build_schema(table, columns, uniques)
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch_rows(&self, query: &Select) -> Result<Vec<RowData>, DbError> {
        let (sql, params) = render_with(query, &self.dialect);
        debug!(%sql, params = params.len(), "Fetching rows");

        let bindings = PgParamStore::from_values(params);
        let client = self.client.read().await;
        let rows = client.query(&sql, &bindings.as_refs()).await?;

        let table = query.table_name().unwrap_or_default();
        Ok(rows
            .iter()
            .map(|row| PgRowReader(row).to_row_data(table))
            .collect())
    }

    async fn count_rows(&self, query: &Select) -> Result<u64, DbError> {
        let (sql, params) = render_with(&query.to_count(), &self.dialect);
        debug!(%sql, params = params.len(), "Counting rows");

        let bindings = PgParamStore::from_values(params);
        let client = self.client.read().await;
        let row = client.query_one(&sql, &bindings.as_refs()).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }
}
