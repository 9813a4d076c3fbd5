use connectors::error::DbError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Everything a pagination call can fail with.
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("Invalid limit value: {limit} (must be at least 1)")]
    InvalidLimit { limit: i64 },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Invalid cursor: {0}")]
    CursorDecode(#[from] CursorDecodeError),

    /// Executor failures, passed through untouched.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

#[derive(Debug, Error)]
pub enum CursorDecodeError {
    #[error("malformed base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cursor is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("cursor pair `{0}` has no `:` separator")]
    MissingSeparator(String),

    #[error("cursor references unknown column `{0}`")]
    UnknownColumn(String),

    #[error("cursor value `{value}` for `{column}` is not a valid {expected}")]
    InvalidValue {
        column: String,
        value: String,
        expected: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value `{value}` for {name}")]
    InvalidVar { name: String, value: String },
}
