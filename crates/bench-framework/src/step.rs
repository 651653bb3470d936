//! Step timer.
//!
//! Wraps a single backend operation, measures its wall-clock duration and
//! records the outcome in the results accumulator according to a
//! [`StepPolicy`].

use crate::error::{BackendError, StepError};
use bench_core::TestCaseResultsAccumulator;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How a step failure is recorded and propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Record the metric or error; a failure is returned as an error.
    Fatal,
    /// Record the metric or error; a failure is returned as a tolerated outcome.
    LogAndContinue,
    /// Record nothing; a failure is logged at debug level and tolerated.
    BestEffort,
}

impl StepPolicy {
    fn records(self) -> bool {
        !matches!(self, StepPolicy::BestEffort)
    }
}

/// Outcome of a step that did not end the phase.
#[derive(Debug)]
pub enum StepOutcome<T> {
    /// The operation succeeded.
    Completed {
        /// Value returned by the operation
        value: T,
        /// Measured wall-clock duration
        duration: Duration,
    },
    /// The operation failed under a tolerant policy.
    Tolerated(StepError),
}

impl<T> StepOutcome<T> {
    /// Whether the operation succeeded.
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed { .. })
    }

    /// The returned value, if the operation succeeded.
    pub fn value(self) -> Option<T> {
        match self {
            StepOutcome::Completed { value, .. } => Some(value),
            StepOutcome::Tolerated(_) => None,
        }
    }
}

/// Name of the duration metric recorded for a step label.
pub fn metric_name(label: &str) -> String {
    format!("{label}Duration")
}

/// Run `operation` as the step `label`.
///
/// The clock starts right before the operation is first polled. On success
/// `<label>Duration` is recorded in whole microseconds; on failure the
/// message `<label>. <error>` is recorded. [`StepPolicy::BestEffort`] steps
/// record neither.
pub async fn time_step<T, F>(
    results: &mut TestCaseResultsAccumulator,
    label: &str,
    policy: StepPolicy,
    operation: F,
) -> Result<StepOutcome<T>, StepError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    let start = Instant::now();
    let outcome = operation.await;
    let duration = start.elapsed();

    match outcome {
        Ok(value) => {
            debug!(step = label, duration_us = duration.as_micros() as u64, "step finished");
            if policy.records() {
                results.add_duration(metric_name(label), duration);
            }
            Ok(StepOutcome::Completed { value, duration })
        }
        Err(source) => {
            let error = StepError {
                label: label.to_string(),
                source,
            };
            match policy {
                StepPolicy::Fatal => {
                    warn!(error = %error, "error on step execution");
                    results.add_error(error.to_string());
                    Err(error)
                }
                StepPolicy::LogAndContinue => {
                    warn!(error = %error, "error on step execution");
                    results.add_error(error.to_string());
                    Ok(StepOutcome::Tolerated(error))
                }
                StepPolicy::BestEffort => {
                    debug!(error = %error, "ignored error on best-effort step");
                    Ok(StepOutcome::Tolerated(error))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn driver_error() -> BackendError {
        BackendError::Driver {
            backend: "mock",
            message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_records_single_metric() {
        let mut results = TestCaseResultsAccumulator::new();

        let outcome = time_step(&mut results, "createTable", StepPolicy::Fatal, async {
            Ok::<_, BackendError>(5u64)
        })
        .await;

        let outcome = assert_ok!(outcome);
        assert!(outcome.is_completed());
        assert_eq!(outcome.value(), Some(5));
        assert_eq!(results.metric_names(), vec!["createTableDuration"]);
        assert!(results.errors().is_empty());
    }

    #[tokio::test]
    async fn test_fatal_failure_records_single_error() {
        let mut results = TestCaseResultsAccumulator::new();

        let outcome = time_step(&mut results, "dropTable", StepPolicy::Fatal, async {
            Err::<(), _>(driver_error())
        })
        .await;

        let error = assert_err!(outcome);
        assert_eq!(error.label, "dropTable");
        assert!(results.metrics().is_empty());
        assert_eq!(results.errors(), &["dropTable. mock error: boom".to_string()]);
    }

    #[tokio::test]
    async fn test_log_and_continue_records_and_tolerates() {
        let mut results = TestCaseResultsAccumulator::new();

        let outcome = time_step(&mut results, "startUp", StepPolicy::LogAndContinue, async {
            Err::<(), _>(BackendError::ConnectionNotEstablished)
        })
        .await;

        let outcome = assert_ok!(outcome);
        assert!(matches!(outcome, StepOutcome::Tolerated(_)));
        assert!(results.metrics().is_empty());
        assert_eq!(
            results.errors(),
            &["startUp. connection was not established".to_string()]
        );
    }

    #[tokio::test]
    async fn test_best_effort_records_nothing() {
        let mut results = TestCaseResultsAccumulator::new();

        let failed = time_step(&mut results, "dropDatabase", StepPolicy::BestEffort, async {
            Err::<(), _>(driver_error())
        })
        .await;
        let succeeded = time_step(&mut results, "dropDatabase", StepPolicy::BestEffort, async {
            Ok::<_, BackendError>(())
        })
        .await;

        assert!(!assert_ok!(failed).is_completed());
        assert!(assert_ok!(succeeded).is_completed());
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_is_measured_in_micros() {
        let mut results = TestCaseResultsAccumulator::new();

        time_step(&mut results, "openConnection", StepPolicy::Fatal, async {
            tokio::time::sleep(Duration::from_millis(250)).await;
            Ok::<_, BackendError>(())
        })
        .await
        .unwrap();

        let metric = results.metric("openConnectionDuration").unwrap();
        assert!(metric.value >= 250_000.0);
        assert!(metric.value < 260_000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_starts_at_first_poll() {
        let mut results = TestCaseResultsAccumulator::new();
        let operation = async { Ok::<_, BackendError>(()) };

        // Time spent between building the future and running the step is not measured.
        tokio::time::sleep(Duration::from_secs(5)).await;
        time_step(&mut results, "closeConnection", StepPolicy::Fatal, operation)
            .await
            .unwrap();

        assert!(results.metric("closeConnectionDuration").unwrap().value < 1_000_000.0);
    }
}
