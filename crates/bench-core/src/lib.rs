//! Core types for the component-bench harness.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace:
//!
//! - [`TestCase`] - Description of one benchmark run (component, port, credentials)
//! - [`ComponentType`] - The kind of component under test
//! - [`TableDefinition`] - The fixed benchmark table schema
//! - [`GeneratedValue`] / [`GeneratedRow`] - Typed synthetic row data
//! - [`TestCaseResultsAccumulator`] - Sink for unit-tagged metrics and errors
//!
//! # Architecture
//!
//! ```text
//! bench-core (this crate)
//!    │
//!    ├─── bench-generator   (fills GeneratedRow values for a TableDefinition)
//!    │
//!    ├─── bench-framework   (step timer, scaling sweep, orchestrator)
//!    │
//!    └─── bench-postgresql  (binds GeneratedValue to PostgreSQL parameters)
//! ```
//!
//! # Example
//!
//! ```rust
//! use bench_core::{TestCaseResultsAccumulator, UnitOfMeasure, UnitPrefix};
//! use std::time::Duration;
//!
//! let mut results = TestCaseResultsAccumulator::new();
//! results.add_duration("openConnectionDuration", Duration::from_micros(1500));
//!
//! let metric = &results.metrics()[0];
//! assert_eq!(metric.value, 1500.0);
//! assert_eq!(metric.prefix, UnitPrefix::Micro);
//! assert_eq!(metric.unit, UnitOfMeasure::Second);
//! ```

pub mod results;
pub mod schema;
pub mod test_case;
pub mod values;

// Re-exports for convenience
pub use results::{Metric, TestCaseResultsAccumulator, UnitOfMeasure, UnitPrefix};
pub use schema::{
    ColumnDefinition, ColumnType, FieldDefinition, TableDefinition, ValueKind,
    DEFAULT_TABLE_NAME, SELECT_CONDITIONS,
};
pub use test_case::{ComponentType, TestCase, TestCaseError};
pub use values::{GeneratedRow, GeneratedValue};
