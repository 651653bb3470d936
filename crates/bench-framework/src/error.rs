//! Error types for the benchmark driver.

use bench_core::ComponentType;
use thiserror::Error;

/// Errors returned by backend operations.
#[derive(Error, Debug)]
pub enum BackendError {
    /// An operation needed a connection that is not open.
    #[error("connection is not open")]
    NotConnected,

    /// The backend never answered a ping while waiting for it.
    #[error("connection was not established")]
    ConnectionNotEstablished,

    /// Error reported by the backend driver.
    #[error("{backend} error: {message}")]
    Driver {
        /// Backend name
        backend: &'static str,
        /// Driver message
        message: String,
    },

    /// A generated value could not be bound to a column.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Configuration errors that end a run before any backend call.
#[derive(Error, Debug)]
pub enum BenchError {
    /// A credential the backend needs is missing from the test case.
    #[error("no required env var key: {0}")]
    MissingEnvVar(String),

    /// No backend is registered for the component type.
    #[error("unknown component for testing: {0}")]
    UnknownComponent(ComponentType),

    /// Invalid runner configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A failed benchmark step.
///
/// Formats as `<label>. <error>`, the form stored in the results accumulator.
#[derive(Error, Debug)]
#[error("{label}. {source}")]
pub struct StepError {
    /// Step label
    pub label: String,
    /// Underlying backend error
    pub source: BackendError,
}
