//! Benchmark command runner.

use anyhow::Context;
use bench_core::{TestCase, TestCaseResultsAccumulator};
use bench_framework::{BackendRegistry, DatabaseTester};
use bench_postgresql::PostgresBackendFactory;
use chrono::Utc;
use tracing::info;

use crate::report::RunReport;
use crate::BenchOpts;

/// Registry with every backend this binary ships.
pub fn default_registry(opts: &BenchOpts) -> BackendRegistry {
    BackendRegistry::new().with_factory(
        PostgresBackendFactory::new()
            .with_host(opts.host.clone())
            .with_connect_timeout(opts.connect_timeout),
    )
}

/// Run the benchmark described by `opts` and write its report.
pub async fn run_bench(opts: &BenchOpts) -> anyhow::Result<()> {
    if let Some(report) = execute(opts).await? {
        report.write(opts.output.as_deref())?;
    }
    Ok(())
}

/// Run the benchmark and return its report, or `None` for a dry run.
pub async fn execute(opts: &BenchOpts) -> anyhow::Result<Option<RunReport>> {
    let test_case = TestCase::from_file(&opts.test_case)
        .with_context(|| format!("Failed to load test case from {:?}", opts.test_case))?;

    let config = opts.bench_config();
    config.validate()?;
    let registry = default_registry(opts);

    if opts.dry_run {
        // Resolving the backend checks the component and its credentials without I/O.
        registry
            .create(&test_case)
            .context("Test case is not runnable")?;

        let counts: Vec<u64> = config.sweep.data_counts().collect();
        info!(
            "[DRY-RUN] Would benchmark {} on {}:{} (seed={})",
            test_case.component_type, opts.host, test_case.port, config.seed
        );
        info!(
            "[DRY-RUN] Database '{}', table '{}'",
            config.database_name, config.table_name
        );
        info!(
            "[DRY-RUN] Row counts: {:?} (chunk size {})",
            counts, config.sweep.chunk_size
        );
        info!("[DRY-RUN] Test case validated successfully");
        return Ok(None);
    }

    let tester = DatabaseTester::new(registry, config);
    let mut results = TestCaseResultsAccumulator::new();

    let started_at = Utc::now();
    tester
        .run_case(&test_case, &mut results)
        .await
        .context("Benchmark could not start")?;
    let finished_at = Utc::now();

    info!(
        "Benchmark of {} took {}s: {} metrics, {} errors",
        test_case.component_type,
        (finished_at - started_at).num_seconds(),
        results.metrics().len(),
        results.errors().len()
    );

    Ok(Some(RunReport::new(
        &test_case,
        started_at,
        finished_at,
        results,
    )))
}
