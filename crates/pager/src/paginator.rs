//! The pagination entry point: resolves the request against an entity,
//! queries the executor and derives the surrounding cursors.

use crate::{
    config::{HasMoreStrategy, PagerConfig, SharedConfig},
    error::PagerError,
    position::{decode_boundary, encode_row},
    sort::{build_keyset, parse_sort},
};
use connectors::executor::QueryExecutor;
use model::{
    entity::{EntitySchema, SchemaRegistry},
    pagination::page::{BoundaryEdge, Page, PaginationRequest},
    records::row::RowData,
};
use planner::query::{
    ast::{common::TableRef, select::Select},
    builder::select::{FromState, SelectBuilder},
    ident,
    keyset::KeysetPagination,
};
use std::sync::Arc;
use tracing::debug;

pub struct Paginator {
    executor: Arc<dyn QueryExecutor>,
    config: SharedConfig,
}

impl Paginator {
    /// A paginator reading the process-wide configuration.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self::with_config(executor, SharedConfig::global())
    }

    pub fn with_config(executor: Arc<dyn QueryExecutor>, config: SharedConfig) -> Self {
        Paginator { executor, config }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub async fn paginate(
        &self,
        entity: &EntitySchema,
        request: &PaginationRequest,
    ) -> Result<Page, PagerError> {
        let config = self.config.snapshot();
        let limit = resolve_limit(request.limit, &config)?;

        let sort = parse_sort(request.sort.as_deref(), entity);
        let keyset = build_keyset(&sort, entity);

        let mut pagination = KeysetPagination::new(keyset);
        if let Some(bound) = decode_boundary(request.after.as_deref(), &pagination.keyset, entity)? {
            pagination = pagination.with_after(bound);
        }
        if let Some(bound) = decode_boundary(request.before.as_deref(), &pagination.keyset, entity)? {
            pagination = pagination.with_before(bound);
        }

        let fetch_limit = match config.has_more() {
            HasMoreStrategy::Count => limit,
            HasMoreStrategy::Overfetch => limit.saturating_add(1),
        };
        let query = pagination
            .apply_to_builder(base_query(entity), fetch_limit)
            .build();

        let mut rows = self.executor.fetch_rows(&query).await?;
        let has_more = match config.has_more() {
            HasMoreStrategy::Count => self.has_more_by_count(&query, rows.len()).await?,
            HasMoreStrategy::Overfetch => {
                let more = rows.len() > limit;
                rows.truncate(limit);
                more
            }
        };

        let edge = pagination.edge();
        if edge == Some(BoundaryEdge::Before) {
            rows.reverse();
        }

        let direction = pagination.direction();
        debug!(
            table = %entity.table,
            rows = rows.len(),
            limit,
            has_more,
            ?direction,
            "Fetched page"
        );

        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Ok(Page::empty(direction));
        };

        let keyset = &pagination.keyset;
        let encode_if = |present: bool, row: &RowData| {
            if present {
                encode_row(row, keyset)
            } else {
                String::new()
            }
        };

        let (prev_cursor, next_cursor) = match edge {
            None => (String::new(), encode_if(has_more, last)),
            Some(BoundaryEdge::After) => (encode_row(first, keyset), encode_if(has_more, last)),
            Some(BoundaryEdge::Before) => (encode_if(has_more, first), encode_row(last, keyset)),
        };

        Ok(Page {
            rows,
            prev_cursor,
            next_cursor,
            direction,
        })
    }

    /// Paginates the entity registered under `name`.
    pub async fn paginate_entity(
        &self,
        registry: &SchemaRegistry,
        name: &str,
        request: &PaginationRequest,
    ) -> Result<Page, PagerError> {
        let entity = registry
            .get(name)
            .ok_or_else(|| PagerError::UnknownEntity(name.to_string()))?;
        self.paginate(entity, request).await
    }

    /// More rows exist iff `0 < fetched < total` over the filtered scope.
    async fn has_more_by_count(&self, query: &Select, fetched: usize) -> Result<bool, PagerError> {
        if fetched == 0 {
            return Ok(false);
        }
        let total = self.executor.count_rows(&query.to_count()).await?;
        Ok((fetched as u64) < total)
    }
}

fn base_query(entity: &EntitySchema) -> SelectBuilder<FromState> {
    let columns = entity.column_names().into_iter().map(ident).collect();
    SelectBuilder::new()
        .select(columns)
        .from(TableRef::parse(&entity.table), None)
}

/// Requested limits below 1 are rejected; larger than `max_limit` are clamped.
fn resolve_limit(requested: Option<i64>, config: &PagerConfig) -> Result<usize, PagerError> {
    let Some(limit) = requested else {
        return Ok(config.limit());
    };
    if limit < 1 {
        return Err(PagerError::InvalidLimit { limit });
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    if limit > config.max_limit() {
        debug!(limit, max_limit = config.max_limit(), "Clamping requested limit");
        return Ok(config.max_limit());
    }
    Ok(limit)
}
