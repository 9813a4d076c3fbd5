use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any SQL driver error.
    #[error("SQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// The queried table is not known to the executor.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// The executor cannot evaluate the given query shape.
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    /// Introspected metadata cannot describe a paginated entity.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),
}

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Postgres connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}
