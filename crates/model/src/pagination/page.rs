use crate::records::row::RowData;
use serde::{Deserialize, Serialize};

/// Which side of a cursor a boundary filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryEdge {
    After,
    Before,
}

/// Direction of travel derived from the boundary edge and the effective sort
/// direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalDirection {
    #[default]
    Next,
    Prev,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationRequest {
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

impl PaginationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, cursor: &str) -> Self {
        self.after = Some(cursor.to_string());
        self
    }

    pub fn before(mut self, cursor: &str) -> Self {
        self.before = Some(cursor.to_string());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }
}

/// One slice of rows plus the cursors around it. Empty cursors mean there is
/// nothing further in that direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    pub rows: Vec<RowData>,
    pub prev_cursor: String,
    pub next_cursor: String,
    pub direction: TraversalDirection,
}

impl Page {
    pub fn empty(direction: TraversalDirection) -> Self {
        Page {
            rows: Vec::new(),
            prev_cursor: String::new(),
            next_cursor: String::new(),
            direction,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.next_cursor.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        !self.prev_cursor.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "rows": self.rows.iter().map(RowData::to_json).collect::<Vec<_>>(),
            "prev_cursor": self.prev_cursor,
            "next_cursor": self.next_cursor,
            "direction": self.direction,
        })
    }
}
