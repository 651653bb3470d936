//! Case orchestrator.
//!
//! Drives one test case through the fixed protocol:
//!
//! ```text
//! select backend -> open -> await ready -> drop stale database
//!   -> create database -> switch database -> table benchmark
//!   -> switch to default database -> drop database -> close
//! ```
//!
//! Configuration errors (unknown component, missing credentials) are
//! returned before any backend call. Step failures are recorded in the
//! results accumulator and end the run without an error; a failing table
//! benchmark still lets the cleanup steps run.

use crate::backend::{BackendRegistry, DatabaseBackend};
use crate::benchmark::TableBenchmark;
use crate::config::BenchConfig;
use crate::error::{BackendError, BenchError, StepError};
use crate::step::{time_step, StepOutcome, StepPolicy};
use bench_core::{TableDefinition, TestCase, TestCaseResultsAccumulator};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Ping the backend until it answers.
///
/// Performs at most `attempts` pings and sleeps `interval` after every
/// failed one. The whole wait is bounded by `attempts * interval`, so a ping
/// that hangs cannot stall the run. Fails with
/// [`BackendError::ConnectionNotEstablished`] when no ping succeeded in time.
pub async fn await_ready(
    backend: &mut dyn DatabaseBackend,
    attempts: u32,
    interval: Duration,
) -> Result<(), BackendError> {
    let deadline = interval.saturating_mul(attempts);
    let polling = poll_ready(backend, attempts, interval);
    if deadline.is_zero() {
        return polling.await;
    }

    match tokio::time::timeout(deadline, polling).await {
        Ok(result) => result,
        Err(_) => {
            debug!(?deadline, "backend did not answer before the deadline");
            Err(BackendError::ConnectionNotEstablished)
        }
    }
}

async fn poll_ready(
    backend: &mut dyn DatabaseBackend,
    attempts: u32,
    interval: Duration,
) -> Result<(), BackendError> {
    for attempt in 1..=attempts {
        match backend.ping().await {
            Ok(()) => {
                debug!(attempt, "{} is ready", backend.name());
                return Ok(());
            }
            Err(e) => {
                debug!(attempt, error = %e, "ping failed");
                tokio::time::sleep(interval).await;
            }
        }
    }
    Err(BackendError::ConnectionNotEstablished)
}

/// Runs test cases against the backends of a registry.
pub struct DatabaseTester {
    registry: BackendRegistry,
    config: BenchConfig,
}

impl DatabaseTester {
    pub fn new(registry: BackendRegistry, config: BenchConfig) -> Self {
        Self { registry, config }
    }

    /// Run one test case, recording metrics and errors into `results`.
    ///
    /// Returns an error only for configuration problems, in which case no
    /// backend call was made and nothing was recorded.
    pub async fn run_case(
        &self,
        test_case: &TestCase,
        results: &mut TestCaseResultsAccumulator,
    ) -> Result<(), BenchError> {
        self.config.validate()?;
        let mut backend = self.registry.create(test_case)?;

        info!(
            "Starting benchmark of {} on port {}",
            test_case.component_type, test_case.port
        );

        match self.run_protocol(backend.as_mut(), results).await {
            Ok(()) => info!(
                "Benchmark finished with {} metrics and {} errors",
                results.metrics().len(),
                results.errors().len()
            ),
            Err(e) => warn!("Benchmark run ended early: {e}"),
        }
        Ok(())
    }

    async fn run_protocol(
        &self,
        backend: &mut dyn DatabaseBackend,
        results: &mut TestCaseResultsAccumulator,
    ) -> Result<(), StepError> {
        let config = &self.config;
        let database = config.database_name.as_str();

        time_step(results, "openConnection", StepPolicy::Fatal, backend.open()).await?;

        let startup = time_step(
            results,
            "startUp",
            StepPolicy::LogAndContinue,
            await_ready(&mut *backend, config.ready_attempts, config.ready_interval),
        )
        .await?;
        if let StepOutcome::Tolerated(e) = startup {
            debug!(error = %e, "couldn't ping database");
            tokio::time::sleep(config.startup_grace).await;
        }

        time_step(
            results,
            "dropStaleDatabase",
            StepPolicy::BestEffort,
            backend.drop_database(database),
        )
        .await?;

        time_step(
            results,
            "createDatabase",
            StepPolicy::Fatal,
            backend.create_database(database),
        )
        .await?;
        time_step(
            results,
            "switchDatabase",
            StepPolicy::Fatal,
            backend.switch_database(database),
        )
        .await?;

        let table = TableDefinition::benchmark(config.table_name.clone());
        let sweep = TableBenchmark::new(&mut *backend, table, config.seed, config.sweep.clone())
            .run(results)
            .await;
        if let Err(e) = sweep {
            warn!("Table benchmark aborted: {e}");
        }

        if let Err(e) = backend.switch_database("").await {
            warn!(error = %e, "couldn't switch back to the default database");
            results.add_error(e.to_string());
            return Ok(());
        }

        time_step(
            results,
            "dropDatabase",
            StepPolicy::Fatal,
            backend.drop_database(database),
        )
        .await?;
        time_step(results, "closeConnection", StepPolicy::Fatal, backend.close()).await?;

        Ok(())
    }
}
