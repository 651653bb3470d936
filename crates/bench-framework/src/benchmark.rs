//! Scaling insert/select benchmark.
//!
//! Creates the benchmark table, then for each row count `n` of the sweep
//! (1, 10, 100, ...) measures a bulk insert into the empty table, a point
//! read, a range read, inserts into the populated table (from 1000 rows on)
//! and a truncate. The table is dropped after the last round. The first
//! failing step aborts the remaining sweep, including the final drop.

use crate::backend::DatabaseBackend;
use crate::config::SweepConfig;
use crate::error::{BackendError, StepError};
use crate::step::{time_step, StepPolicy};
use bench_core::{GeneratedRow, TableDefinition, TestCaseResultsAccumulator};
use bench_generator::TableDataGenerator;
use tracing::{debug, info};

/// Insert `count` freshly generated rows.
///
/// When `count` exceeds `chunk_size`, rows are inserted in `count / chunk_size`
/// sequential batches of exactly `chunk_size` rows; the remainder is not
/// inserted (1500 rows with a chunk size of 1000 insert 1000 rows).
/// Otherwise a single batch holds exactly `count` rows.
///
/// A batch larger than the backend's [`max_batch_rows`](DatabaseBackend::max_batch_rows)
/// is split into several `insert` calls, so the number of rows written does
/// not depend on the backend limit.
pub async fn insert_chunked(
    backend: &mut dyn DatabaseBackend,
    generator: &mut TableDataGenerator,
    table: &TableDefinition,
    count: u64,
    chunk_size: u64,
) -> Result<u64, BackendError> {
    let max_batch = backend
        .max_batch_rows(table)
        .map(to_usize)
        .transpose()?
        .filter(|max| *max > 0);

    if chunk_size > 0 && count > chunk_size {
        let batches = count / chunk_size;
        let batch_len = to_usize(chunk_size)?;
        let mut inserted = 0;

        for batch in 0..batches {
            let rows = generator.generate(batch_len);
            inserted += insert_batch(backend, table, &rows, max_batch).await?;
            debug!(batch = batch + 1, batches, "inserted batch");
        }
        return Ok(inserted);
    }

    let rows = generator.generate(to_usize(count)?);
    insert_batch(backend, table, &rows, max_batch).await
}

async fn insert_batch(
    backend: &mut dyn DatabaseBackend,
    table: &TableDefinition,
    rows: &[GeneratedRow],
    max_batch: Option<usize>,
) -> Result<u64, BackendError> {
    match max_batch {
        Some(max) if rows.len() > max => {
            let mut inserted = 0;
            for part in rows.chunks(max) {
                inserted += backend.insert(table, part).await?;
            }
            Ok(inserted)
        }
        _ => backend.insert(table, rows).await,
    }
}

fn to_usize(count: u64) -> Result<usize, BackendError> {
    usize::try_from(count)
        .map_err(|_| BackendError::Conversion(format!("row count {count} does not fit in usize")))
}

/// Runs the scaling sweep against one backend.
pub struct TableBenchmark<'a> {
    backend: &'a mut dyn DatabaseBackend,
    generator: TableDataGenerator,
    table: TableDefinition,
    sweep: SweepConfig,
}

impl<'a> TableBenchmark<'a> {
    pub fn new(
        backend: &'a mut dyn DatabaseBackend,
        table: TableDefinition,
        seed: u64,
        sweep: SweepConfig,
    ) -> Self {
        Self {
            backend,
            generator: TableDataGenerator::new(table.clone(), seed),
            table,
            sweep,
        }
    }

    /// Run the whole sweep, stopping at the first failing step.
    pub async fn run(&mut self, results: &mut TestCaseResultsAccumulator) -> Result<(), StepError> {
        let name = self.table.name.clone();

        time_step(
            results,
            "createTable",
            StepPolicy::Fatal,
            self.backend.create_table(&self.table),
        )
        .await?;
        time_step(
            results,
            "truncateEmptyTable",
            StepPolicy::Fatal,
            self.backend.truncate_table(&name),
        )
        .await?;

        let counts: Vec<u64> = self.sweep.data_counts().collect();
        for count in counts {
            info!("Benchmarking table '{}' with {} rows", name, count);
            self.run_round(results, &name, count).await?;
        }

        time_step(
            results,
            "dropTable",
            StepPolicy::Fatal,
            self.backend.drop_table(&name),
        )
        .await?;

        info!(
            "Table benchmark finished, {} rows generated",
            self.generator.generated()
        );
        Ok(())
    }

    async fn run_round(
        &mut self,
        results: &mut TestCaseResultsAccumulator,
        name: &str,
        count: u64,
    ) -> Result<(), StepError> {
        let chunk_size = self.sweep.chunk_size;

        time_step(
            results,
            &format!("{count}xInsertEmptyTable"),
            StepPolicy::Fatal,
            insert_chunked(
                &mut *self.backend,
                &mut self.generator,
                &self.table,
                count,
                chunk_size,
            ),
        )
        .await?;

        let id = i64::try_from(count / 2).unwrap_or(i64::MAX);
        time_step(
            results,
            &format!("selectById{count}xTable"),
            StepPolicy::Fatal,
            self.backend.select_by_id(name, id),
        )
        .await?;

        time_step(
            results,
            &format!("selectByConditions{count}xTable"),
            StepPolicy::Fatal,
            self.backend
                .select_by_conditions(name, &self.sweep.select_conditions),
        )
        .await?;

        if count >= self.sweep.populated_insert_threshold {
            let sizes: Vec<u64> = self.sweep.populated_insert_sizes().collect();
            for size in sizes {
                time_step(
                    results,
                    &format!("{size}xInsert{count}xTable"),
                    StepPolicy::Fatal,
                    insert_chunked(
                        &mut *self.backend,
                        &mut self.generator,
                        &self.table,
                        size,
                        chunk_size,
                    ),
                )
                .await?;
            }
        }

        time_step(
            results,
            &format!("truncate{count}xTable"),
            StepPolicy::Fatal,
            self.backend.truncate_table(name),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockCall, MockOperation};

    fn sweep(max_rows: u64) -> SweepConfig {
        SweepConfig {
            max_rows,
            ..SweepConfig::default()
        }
    }

    #[tokio::test]
    async fn test_insert_chunked_drops_remainder() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        let table = TableDefinition::default();
        let mut generator = TableDataGenerator::new(table.clone(), 42);

        let inserted = insert_chunked(&mut backend, &mut generator, &table, 1500, 1000)
            .await
            .unwrap();

        assert_eq!(inserted, 1000);
        assert_eq!(handle.inserted_batches(), vec![1000]);
        assert_eq!(generator.generated(), 1000);
    }

    #[tokio::test]
    async fn test_insert_chunked_splits_into_full_batches() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        let table = TableDefinition::default();
        let mut generator = TableDataGenerator::new(table.clone(), 42);

        insert_chunked(&mut backend, &mut generator, &table, 10_000, 1000)
            .await
            .unwrap();

        assert_eq!(handle.inserted_batches(), vec![1000; 10]);
    }

    #[tokio::test]
    async fn test_insert_chunked_single_call_up_to_chunk_size() {
        let table = TableDefinition::default();

        for count in [0u64, 1, 10, 999, 1000] {
            let mut backend = MockBackend::new();
            let handle = backend.handle();
            let mut generator = TableDataGenerator::new(table.clone(), 42);

            insert_chunked(&mut backend, &mut generator, &table, count, 1000)
                .await
                .unwrap();

            assert_eq!(handle.inserted_batches(), vec![count as usize], "count {count}");
        }
    }

    #[tokio::test]
    async fn test_insert_chunked_respects_backend_batch_limit() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        handle.set_max_batch_rows(300);
        let table = TableDefinition::default();
        let mut generator = TableDataGenerator::new(table.clone(), 42);

        let inserted = insert_chunked(&mut backend, &mut generator, &table, 1500, 1000)
            .await
            .unwrap();
        assert_eq!(inserted, 1000);
        assert_eq!(handle.inserted_batches(), vec![300, 300, 300, 100]);

        let inserted = insert_chunked(&mut backend, &mut generator, &table, 500, 1000)
            .await
            .unwrap();
        assert_eq!(inserted, 500);
        assert_eq!(
            handle.inserted_batches(),
            vec![300, 300, 300, 100, 300, 200]
        );
    }

    #[tokio::test]
    async fn test_oversized_chunk_size_runs_whole_sweep() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        handle.set_max_batch_rows(1000);
        let mut results = TestCaseResultsAccumulator::new();
        let sweep = SweepConfig {
            max_rows: 10_000,
            chunk_size: 10_000,
            ..SweepConfig::default()
        };

        TableBenchmark::new(&mut backend, TableDefinition::default(), 42, sweep)
            .run(&mut results)
            .await
            .unwrap();

        assert!(results.errors().is_empty());
        assert!(results.metric("10000xInsertEmptyTableDuration").is_some());
        assert!(handle.inserted_batches().iter().all(|rows| *rows <= 1000));
    }

    #[tokio::test]
    async fn test_sweep_metric_sequence() {
        let mut backend = MockBackend::new();
        let mut results = TestCaseResultsAccumulator::new();

        TableBenchmark::new(&mut backend, TableDefinition::default(), 42, sweep(1000))
            .run(&mut results)
            .await
            .unwrap();

        let mut expected = vec![
            "createTableDuration".to_string(),
            "truncateEmptyTableDuration".to_string(),
        ];
        for n in [1, 10, 100, 1000] {
            expected.push(format!("{n}xInsertEmptyTableDuration"));
            expected.push(format!("selectById{n}xTableDuration"));
            expected.push(format!("selectByConditions{n}xTableDuration"));
            if n >= 1000 {
                for s in [1000, 100, 10, 1] {
                    expected.push(format!("{s}xInsert{n}xTableDuration"));
                }
            }
            expected.push(format!("truncate{n}xTableDuration"));
        }
        expected.push("dropTableDuration".to_string());

        assert_eq!(results.metric_names(), expected);
        assert!(results.errors().is_empty());
    }

    #[tokio::test]
    async fn test_select_by_id_uses_half_count() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        let mut results = TestCaseResultsAccumulator::new();

        TableBenchmark::new(&mut backend, TableDefinition::default(), 42, sweep(100))
            .run(&mut results)
            .await
            .unwrap();

        let ids: Vec<i64> = handle
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::SelectById { id, .. } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![0, 5, 50]);
    }

    #[tokio::test]
    async fn test_failure_aborts_sweep_without_drop_table() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        // Second select by conditions belongs to the 10-row round.
        handle.fail_nth(MockOperation::SelectByConditions, 2);
        let mut results = TestCaseResultsAccumulator::new();

        let error = TableBenchmark::new(&mut backend, TableDefinition::default(), 42, sweep(1000))
            .run(&mut results)
            .await
            .unwrap_err();

        assert_eq!(error.label, "selectByConditions10xTable");
        assert_eq!(
            results.errors(),
            &["selectByConditions10xTable. mock error: injected SelectByConditions failure"
                .to_string()]
        );
        assert_eq!(
            results.metric_names().last().copied(),
            Some("selectById10xTableDuration")
        );
        assert_eq!(handle.count(MockOperation::DropTable), 0);
        assert_eq!(handle.count(MockOperation::SelectById), 2);
    }

    #[tokio::test]
    async fn test_create_table_failure_stops_immediately() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        handle.fail_always(MockOperation::CreateTable);
        let mut results = TestCaseResultsAccumulator::new();

        let result = TableBenchmark::new(&mut backend, TableDefinition::default(), 42, sweep(10))
            .run(&mut results)
            .await;

        assert!(result.is_err());
        assert!(results.metrics().is_empty());
        assert_eq!(handle.calls().len(), 1);
    }
}
