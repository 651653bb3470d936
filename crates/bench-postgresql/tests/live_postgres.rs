//! Runs against a live PostgreSQL server.
//!
//! Start one with e.g.
//! `docker run --rm -p 15432:5432 -e POSTGRES_PASSWORD=postgres postgres:16`
//! and run `cargo test -p bench-postgresql -- --ignored`.
//! `BENCH_POSTGRES_PORT`, `BENCH_POSTGRES_USER` and `BENCH_POSTGRES_PASSWORD`
//! override the defaults below.

use anyhow::{Context, Result};
use bench_core::{TableDefinition, TestCase, TestCaseResultsAccumulator};
use bench_framework::{BackendRegistry, BenchConfig, DatabaseBackend, DatabaseTester};
use bench_generator::TableDataGenerator;
use bench_postgresql::{PostgresBackendFactory, POSTGRES_PASSWORD, POSTGRES_USER};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TEST_PORT: u16 = 15432;

fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn test_case() -> Result<TestCase> {
    let port = match std::env::var("BENCH_POSTGRES_PORT") {
        Ok(port) => port.parse().context("invalid BENCH_POSTGRES_PORT")?,
        Err(_) => TEST_PORT,
    };
    let user = std::env::var("BENCH_POSTGRES_USER").unwrap_or_else(|_| "postgres".into());
    let password = std::env::var("BENCH_POSTGRES_PASSWORD").unwrap_or_else(|_| "postgres".into());

    Ok(TestCase::new("postgres", port)
        .with_env_var(POSTGRES_USER, user)
        .with_env_var(POSTGRES_PASSWORD, password))
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_backend_roundtrip() -> Result<()> {
    init_logging();
    let factory = PostgresBackendFactory::new();
    let config = factory.config_for(&test_case()?)?;
    let mut backend = bench_postgresql::PostgresBackend::new(config);

    backend.open().await?;
    backend.ping().await?;
    backend.drop_database("bench_live_db").await?;
    backend.create_database("bench_live_db").await?;
    backend.switch_database("bench_live_db").await?;

    let table = TableDefinition::default();
    backend.create_table(&table).await?;

    let rows = TableDataGenerator::new(table.clone(), 42).generate(100);
    assert_eq!(backend.insert(&table, &rows).await?, 100);
    assert_eq!(backend.select_by_id(&table.name, 50).await?, 1);
    let matching = backend
        .select_by_conditions(&table.name, bench_core::SELECT_CONDITIONS)
        .await?;
    assert!(matching <= 100);

    backend.truncate_table(&table.name).await?;
    assert_eq!(backend.select_by_id(&table.name, 50).await?, 0);
    backend.drop_table(&table.name).await?;

    backend.switch_database("").await?;
    backend.drop_database("bench_live_db").await?;
    backend.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_full_case_without_errors() -> Result<()> {
    init_logging();
    let registry = BackendRegistry::new().with_factory(PostgresBackendFactory::new());
    let config = BenchConfig::default()
        .with_database_name("bench_live_case")
        .with_max_rows(1000)
        .with_ready_polling(50, Duration::from_millis(100));
    let tester = DatabaseTester::new(registry, config);

    let mut results = TestCaseResultsAccumulator::new();
    tester.run_case(&test_case()?, &mut results).await?;

    info!("Recorded {} metrics", results.metrics().len());
    assert!(results.errors().is_empty(), "errors: {:?}", results.errors());
    assert!(results.metric("1000xInsertEmptyTableDuration").is_some());
    assert!(results.metric("closeConnectionDuration").is_some());
    Ok(())
}
