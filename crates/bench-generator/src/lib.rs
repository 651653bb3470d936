//! Synthetic data generator for the component-bench harness.
//!
//! This crate provides the [`TableDataGenerator`] which produces typed rows
//! for the fixed benchmark table. The generator uses a seeded RNG so that
//! two generators with the same seed produce the same values (apart from
//! timestamp columns, which always carry the generation time).
//!
//! # Architecture
//!
//! ```text
//! TableDefinition (bench-core)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │  TableDataGenerator  │
//! │                      │
//! │  - table             │
//! │  - rng (StdRng)      │
//! │  - generated         │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    GeneratedRow { f1, f2, ..., f11 }
//! ```
//!
//! # Example
//!
//! ```rust
//! use bench_core::TableDefinition;
//! use bench_generator::TableDataGenerator;
//!
//! let mut generator = TableDataGenerator::new(TableDefinition::default(), 42);
//! let rows = generator.generate(3);
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[0].len(), 11);
//! ```

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{GeneratedRowIterator, TableDataGenerator};
