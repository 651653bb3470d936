//! Runner tests that never reach a database.

use component_bench::run::execute;
use component_bench::{run_bench, BenchOpts};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_test_case(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn opts(test_case: PathBuf) -> BenchOpts {
    BenchOpts {
        test_case,
        output: None,
        host: "localhost".to_string(),
        database_name: "cott_db".to_string(),
        table_name: "test_table".to_string(),
        max_rows: 1000,
        chunk_size: 1000,
        ready_attempts: 1,
        ready_interval: Duration::ZERO,
        connect_timeout: Duration::from_secs(1),
        startup_grace: Duration::ZERO,
        seed: 42,
        dry_run: false,
    }
}

#[tokio::test]
async fn test_missing_password_fails_before_connecting() {
    let file = write_test_case(
        r#"
component-type: postgres
image: postgres:16
port: 5432
env-vars:
  POSTGRES_USER: postgres
"#,
    );

    let error = execute(&opts(file.path().to_path_buf())).await.unwrap_err();
    assert!(format!("{error:#}").contains("no required env var key: POSTGRES_PASSWORD"));
}

#[tokio::test]
async fn test_unknown_component_fails() {
    let file = write_test_case(r#"{"component-type": "kafka", "port": 9092, "env-vars": {}}"#);

    let error = execute(&opts(file.path().to_path_buf())).await.unwrap_err();
    assert!(format!("{error:#}").contains("unknown component for testing: kafka"));
}

#[tokio::test]
async fn test_unreadable_test_case_fails() {
    let error = tokio_test::assert_err!(execute(&opts(PathBuf::from("/nonexistent/case.yaml"))).await);
    assert!(format!("{error:#}").contains("Failed to load test case"));
}

#[tokio::test]
async fn test_invalid_config_fails() {
    let file = write_test_case(
        "component-type: postgres\nport: 5432\nenv-vars:\n  POSTGRES_USER: u\n  POSTGRES_PASSWORD: p\n",
    );
    let mut opts = opts(file.path().to_path_buf());
    opts.chunk_size = 0;

    let error = execute(&opts).await.unwrap_err();
    assert!(format!("{error:#}").contains("chunk size must be at least 1"));
}

#[tokio::test]
async fn test_dry_run_validates_without_report() {
    let file = write_test_case(
        "component-type: postgres\nport: 5432\nenv-vars:\n  POSTGRES_USER: u\n  POSTGRES_PASSWORD: p\n",
    );
    let output_dir = tempfile::tempdir().unwrap();
    let output = output_dir.path().join("report.json");

    let mut opts = opts(file.path().to_path_buf());
    opts.dry_run = true;
    opts.output = Some(output.clone());

    run_bench(&opts).await.unwrap();
    assert!(!output.exists());
}

#[tokio::test]
async fn test_dry_run_still_checks_credentials() {
    let file = write_test_case("component-type: postgres\nport: 5432\n");
    let mut opts = opts(file.path().to_path_buf());
    opts.dry_run = true;

    let error = execute(&opts).await.unwrap_err();
    assert!(format!("{error:#}").contains("no required env var key: POSTGRES_USER"));
}
