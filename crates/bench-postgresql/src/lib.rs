//! PostgreSQL backend for component-bench.
//!
//! Implements [`DatabaseBackend`](bench_framework::DatabaseBackend) on top of
//! `tokio-postgres`. Generated values are bound per declared column type
//! (see [`value`]), inserts use a single multi-row statement per batch and
//! reads count the returned rows while streaming them.
//!
//! # Example
//!
//! ```ignore
//! use bench_framework::{BackendRegistry, BenchConfig, DatabaseTester};
//! use bench_postgresql::PostgresBackendFactory;
//!
//! let registry = BackendRegistry::new().with_factory(PostgresBackendFactory::new());
//! let tester = DatabaseTester::new(registry, BenchConfig::default());
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod factory;
pub mod sql;
pub mod value;

pub use backend::PostgresBackend;
pub use config::{mask_connection_password, PostgresConfig};
pub use error::PostgresBackendError;
pub use factory::{PostgresBackendFactory, POSTGRES_PASSWORD, POSTGRES_USER};
