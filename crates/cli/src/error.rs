use connectors::error::{ConnectorError, DbError};
use pager::error::{ConfigError, CursorDecodeError, PagerError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load the pager configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to connect: {0}")]
    Connector(#[from] ConnectorError),

    /// PostgreSQL or metadata error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Pagination failed: {0}")]
    Pager(#[from] PagerError),

    #[error("Invalid cursor: {0}")]
    Cursor(#[from] CursorDecodeError),

    #[error("Invalid cursor pair `{0}`, expected column:value")]
    InvalidCursorPair(String),
}
