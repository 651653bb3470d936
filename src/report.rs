//! JSON report of a benchmark run.

use anyhow::Context;
use bench_core::{TestCase, TestCaseResultsAccumulator};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Env var keys whose values are masked in the report.
const SECRET_KEY_MARKERS: [&str; 3] = ["PASSWORD", "SECRET", "TOKEN"];

/// Outcome of one test case run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Test case with secret env var values masked
    pub test_case: TestCase,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Metrics and errors, in recording order
    #[serde(flatten)]
    pub results: TestCaseResultsAccumulator,
}

impl RunReport {
    pub fn new(
        test_case: &TestCase,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: TestCaseResultsAccumulator,
    ) -> Self {
        Self {
            test_case: mask_secrets(test_case),
            started_at,
            finished_at,
            results,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    /// Write the report to `output`, or to stdout when no path is given.
    pub fn write(&self, output: Option<&Path>) -> anyhow::Result<()> {
        let json = self.to_json()?;
        match output {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write report to {path:?}"))?;
                tracing::info!("Report written to {:?}", path);
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}

fn mask_secrets(test_case: &TestCase) -> TestCase {
    let mut masked = test_case.clone();
    for (key, value) in masked.env_vars.iter_mut() {
        let upper = key.to_ascii_uppercase();
        if SECRET_KEY_MARKERS.iter().any(|marker| upper.contains(marker)) {
            *value = "***".to_string();
        }
    }
    masked
}
