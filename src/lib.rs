//! component-bench library
//!
//! A harness that benchmarks a database component with a fixed workload:
//! it recreates a database, creates a table with eleven typed columns and
//! measures inserts, point reads, range reads and truncates at row counts
//! growing by a factor of ten. Every step is timed and recorded as a metric;
//! failures are recorded as errors next to the metrics.
//!
//! # Workspace Crates
//!
//! - `bench_core` - Test case, schema, generated values, results accumulator
//! - `bench_generator` - Seeded synthetic row generator
//! - `bench_framework` - Backend trait, step timer, scaling sweep, orchestrator
//! - `bench_postgresql` - PostgreSQL backend
//!
//! # CLI Usage
//!
//! ```bash
//! # Benchmark the PostgreSQL described in a test case file
//! component-bench --test-case postgres.yaml --output report.json
//!
//! # Quick run up to 10 000 rows
//! component-bench --test-case postgres.yaml --max-rows 10000
//!
//! # Validate the test case and credentials without connecting
//! component-bench --test-case postgres.yaml --dry-run
//! ```

use bench_framework::BenchConfig;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

pub mod config;
pub mod report;
pub mod run;

pub use report::RunReport;
pub use run::run_bench;

use config::parse_duration;

/// Options of a benchmark run.
#[derive(Args, Clone, Debug)]
pub struct BenchOpts {
    /// Path to the test case file (YAML or JSON)
    #[arg(long, short = 't', env = "BENCH_TEST_CASE")]
    pub test_case: PathBuf,

    /// Write the JSON report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Host the component under test listens on
    #[arg(long, default_value = "localhost", env = "BENCH_HOST")]
    pub host: String,

    /// Database created (and dropped) for the run
    #[arg(long, default_value = "cott_db")]
    pub database_name: String,

    /// Benchmark table name
    #[arg(long, default_value = "test_table")]
    pub table_name: String,

    /// Largest row count of the sweep (1, 10, 100, ... up to this value)
    #[arg(long, default_value = "10000000")]
    pub max_rows: u64,

    /// Rows per backend insert for bulk loads
    #[arg(long, default_value = "1000")]
    pub chunk_size: u64,

    /// Number of pings while waiting for the component
    #[arg(long, default_value = "300")]
    pub ready_attempts: u32,

    /// Pause between two pings (e.g. "100ms", "1s")
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    pub ready_interval: Duration,

    /// Timeout of a single connection attempt to the component
    #[arg(long, default_value = "5s", value_parser = parse_duration)]
    pub connect_timeout: Duration,

    /// Pause after the component never answered a ping
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub startup_grace: Duration,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Dry run mode - validate the test case and credentials without connecting
    #[arg(long)]
    pub dry_run: bool,
}

impl BenchOpts {
    /// Framework configuration for these options.
    pub fn bench_config(&self) -> BenchConfig {
        BenchConfig::default()
            .with_database_name(self.database_name.clone())
            .with_table_name(self.table_name.clone())
            .with_seed(self.seed)
            .with_ready_polling(self.ready_attempts, self.ready_interval)
            .with_startup_grace(self.startup_grace)
            .with_max_rows(self.max_rows)
            .with_chunk_size(self.chunk_size)
    }
}
