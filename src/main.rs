//! Command-line interface for component-bench
//!
//! # Usage Examples
//!
//! ```bash
//! # Benchmark PostgreSQL, report to stdout
//! component-bench --test-case postgres.yaml
//!
//! # Smaller sweep, report to a file, verbose logs
//! RUST_LOG=debug component-bench --test-case postgres.yaml \
//!   --max-rows 100000 --output report.json
//! ```
//!
//! ## Test Case Format
//! ```yaml
//! component-type: postgres
//! image: postgres:16
//! port: 5432
//! env-vars:
//!   POSTGRES_USER: postgres
//!   POSTGRES_PASSWORD: postgres
//! ```

use clap::Parser;
use component_bench::{run_bench, BenchOpts};

#[derive(Parser)]
#[command(name = "component-bench")]
#[command(about = "Benchmark a database component with a fixed insert/select workload")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: BenchOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing, defaulting to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run_bench(&cli.opts).await
}
