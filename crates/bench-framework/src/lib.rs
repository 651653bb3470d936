//! Benchmark driver for component-bench.
//!
//! This crate runs the fixed benchmark protocol against any backend that
//! implements [`DatabaseBackend`]:
//! 1. Select a backend for the test case via the [`BackendRegistry`]
//! 2. Open the connection and wait until the backend answers pings
//! 3. Recreate the benchmark database and switch to it
//! 4. Run the scaling insert/select sweep ([`TableBenchmark`])
//! 5. Drop the database and close the connection
//!
//! Every step is wrapped by [`time_step`], which records either a
//! `<label>Duration` metric (integer microseconds) or a `<label>. <error>`
//! entry into the [`TestCaseResultsAccumulator`](bench_core::TestCaseResultsAccumulator).
//!
//! # Example
//!
//! ```ignore
//! use bench_core::{TestCase, TestCaseResultsAccumulator};
//! use bench_framework::{BackendRegistry, BenchConfig, DatabaseTester};
//!
//! let registry = BackendRegistry::new().with_factory(PostgresBackendFactory::default());
//! let tester = DatabaseTester::new(registry, BenchConfig::default());
//!
//! let mut results = TestCaseResultsAccumulator::new();
//! tester.run_case(&test_case, &mut results).await?;
//! ```

pub mod backend;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod step;
pub mod testing;

pub use backend::{BackendFactory, BackendRegistry, DatabaseBackend};
pub use benchmark::{insert_chunked, TableBenchmark};
pub use config::{BenchConfig, SweepConfig};
pub use error::{BackendError, BenchError, StepError};
pub use orchestrator::{await_ready, DatabaseTester};
pub use step::{time_step, StepOutcome, StepPolicy};
