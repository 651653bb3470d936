//! Error types for the PostgreSQL backend.

use bench_framework::BackendError;
use thiserror::Error;

/// Errors that can occur while talking to PostgreSQL.
#[derive(Error, Debug)]
pub enum PostgresBackendError {
    /// PostgreSQL connection or query error.
    #[error("{0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A generated value does not fit the declared column type.
    #[error("column '{column}': {message}")]
    Conversion {
        /// Column name
        column: String,
        /// What went wrong
        message: String,
    },

    /// The backend was used before `open`.
    #[error("connection is not open")]
    NotConnected,
}

impl From<PostgresBackendError> for BackendError {
    fn from(err: PostgresBackendError) -> Self {
        match err {
            PostgresBackendError::PostgreSQL(e) => BackendError::Driver {
                backend: "postgresql",
                message: e.to_string(),
            },
            e @ PostgresBackendError::Conversion { .. } => BackendError::Conversion(e.to_string()),
            PostgresBackendError::NotConnected => BackendError::NotConnected,
        }
    }
}
