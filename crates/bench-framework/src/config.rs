//! Configuration types for a benchmark run.

use crate::error::BenchError;
use bench_core::{DEFAULT_TABLE_NAME, SELECT_CONDITIONS};
use std::time::Duration;

/// Name of the database created (and dropped) for each run.
pub const DEFAULT_DATABASE_NAME: &str = "cott_db";

/// Largest row count of the scaling sweep.
pub const DEFAULT_MAX_ROWS: u64 = 10_000_000;

/// Rows generated per bulk-load batch.
///
/// Backends with a statement size limit split larger batches further
/// (see `DatabaseBackend::max_batch_rows`).
pub const DEFAULT_CHUNK_SIZE: u64 = 1000;

/// Number of pings while waiting for the backend.
pub const DEFAULT_READY_ATTEMPTS: u32 = 300;

/// Pause between two pings.
pub const DEFAULT_READY_INTERVAL: Duration = Duration::from_millis(100);

/// Pause after the backend never became ready.
pub const DEFAULT_STARTUP_GRACE: Duration = Duration::from_secs(1);

/// Default seed for data generation.
pub const DEFAULT_SEED: u64 = 42;

/// Growth factor between two sweep rounds.
const SWEEP_FACTOR: u64 = 10;

/// Configuration of the scaling insert/select sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Largest row count (the sweep runs 1, 10, 100, ... up to this value).
    pub max_rows: u64,
    /// Rows per backend insert for bulk loads.
    pub chunk_size: u64,
    /// Row count from which inserts into the populated table are measured.
    pub populated_insert_threshold: u64,
    /// Largest insert into the populated table (shrinks by 10 down to 1).
    pub max_populated_insert: u64,
    /// Predicate for the range read.
    pub select_conditions: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            populated_insert_threshold: 1000,
            max_populated_insert: 1000,
            select_conditions: SELECT_CONDITIONS.to_string(),
        }
    }
}

impl SweepConfig {
    /// Row counts of the sweep: 1, 10, 100, ... while not above `max_rows`.
    pub fn data_counts(&self) -> impl Iterator<Item = u64> {
        let max_rows = self.max_rows;
        std::iter::successors(Some(1u64), |count| count.checked_mul(SWEEP_FACTOR))
            .take_while(move |count| *count <= max_rows)
    }

    /// Insert sizes for the populated table: `max_populated_insert`, then /10 down to 1.
    pub fn populated_insert_sizes(&self) -> impl Iterator<Item = u64> {
        let start = Some(self.max_populated_insert).filter(|size| *size > 0);
        std::iter::successors(start, |size| Some(size / SWEEP_FACTOR).filter(|next| *next > 0))
    }
}

/// Configuration of a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Database created for the run.
    pub database_name: String,
    /// Benchmark table name.
    pub table_name: String,
    /// Random seed for data generation.
    pub seed: u64,
    /// Number of pings while waiting for the backend.
    pub ready_attempts: u32,
    /// Pause between two pings.
    pub ready_interval: Duration,
    /// Pause after the backend never became ready.
    pub startup_grace: Duration,
    /// Sweep configuration.
    pub sweep: SweepConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            seed: DEFAULT_SEED,
            ready_attempts: DEFAULT_READY_ATTEMPTS,
            ready_interval: DEFAULT_READY_INTERVAL,
            startup_grace: DEFAULT_STARTUP_GRACE,
            sweep: SweepConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Set the database name.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Set the table name.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Set the generation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the ping attempts and interval.
    pub fn with_ready_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.ready_attempts = attempts;
        self.ready_interval = interval;
        self
    }

    /// Set the pause after the backend never became ready.
    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }

    /// Set the largest row count of the sweep.
    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.sweep.max_rows = max_rows;
        self
    }

    /// Set the rows per backend insert.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.sweep.chunk_size = chunk_size;
        self
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.database_name.is_empty() {
            return Err(BenchError::Config(
                "database name must not be empty".to_string(),
            ));
        }
        if self.table_name.is_empty() {
            return Err(BenchError::Config("table name must not be empty".to_string()));
        }
        if self.ready_attempts == 0 {
            return Err(BenchError::Config(
                "ready attempts must be at least 1".to_string(),
            ));
        }
        if self.sweep.chunk_size == 0 {
            return Err(BenchError::Config("chunk size must be at least 1".to_string()));
        }
        if self.sweep.max_rows == 0 {
            return Err(BenchError::Config("max rows must be at least 1".to_string()));
        }
        Ok(())
    }
}
