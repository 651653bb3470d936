//! Results accumulator for a single test case run.
//!
//! The accumulator is an append-only, ordered sink of unit-tagged metrics
//! and error strings. Formatting and persistence are left to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Magnitude prefix of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPrefix {
    /// No prefix (10^0)
    None,
    /// 10^-9
    Nano,
    /// 10^-6
    Micro,
    /// 10^-3
    Milli,
    /// 10^3
    Kilo,
    /// 10^6
    Mega,
}

/// Base unit of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    /// Seconds
    Second,
    /// Bytes
    Byte,
    /// Dimensionless count
    Count,
}

/// A single named measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric name, e.g. `openConnectionDuration`
    pub name: String,
    /// Unit prefix
    pub prefix: UnitPrefix,
    /// Base unit
    pub unit: UnitOfMeasure,
    /// Measured value
    pub value: f64,
}

/// Ordered collection of metrics and errors for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResultsAccumulator {
    metrics: Vec<Metric>,
    errors: Vec<String>,
}

impl TestCaseResultsAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a metric.
    pub fn add_metric(
        &mut self,
        name: impl Into<String>,
        prefix: UnitPrefix,
        unit: UnitOfMeasure,
        value: f64,
    ) {
        self.metrics.push(Metric {
            name: name.into(),
            prefix,
            unit,
            value,
        });
    }

    /// Append a duration metric, always as whole microseconds.
    pub fn add_duration(&mut self, name: impl Into<String>, duration: Duration) {
        // Sub-microsecond precision is truncated.
        let micros = duration.as_micros() as f64;
        self.add_metric(name, UnitPrefix::Micro, UnitOfMeasure::Second, micros);
    }

    /// Append an error message.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Metrics in insertion order.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Errors in insertion order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Find the first metric with the given name.
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Metric names in insertion order.
    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name.as_str()).collect()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_duration_truncates_to_micros() {
        let mut results = TestCaseResultsAccumulator::new();
        results.add_duration("stepDuration", Duration::from_nanos(2_500_999));

        let metric = results.metric("stepDuration").unwrap();
        assert_eq!(metric.value, 2500.0);
        assert_eq!(metric.prefix, UnitPrefix::Micro);
        assert_eq!(metric.unit, UnitOfMeasure::Second);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut results = TestCaseResultsAccumulator::new();
        assert!(results.is_empty());

        results.add_duration("b", Duration::ZERO);
        results.add_metric("a", UnitPrefix::None, UnitOfMeasure::Count, 3.0);
        results.add_error("first");
        results.add_error("second");

        assert_eq!(results.metric_names(), vec!["b", "a"]);
        assert_eq!(results.errors(), &["first".to_string(), "second".to_string()]);
        assert!(!results.is_empty());
    }

    #[test]
    fn test_serializes_units_lowercase() {
        let mut results = TestCaseResultsAccumulator::new();
        results.add_duration("closeConnectionDuration", Duration::from_micros(12));

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["metrics"][0]["name"], "closeConnectionDuration");
        assert_eq!(json["metrics"][0]["prefix"], "micro");
        assert_eq!(json["metrics"][0]["unit"], "second");
        assert_eq!(json["metrics"][0]["value"], 12.0);
        assert_eq!(json["errors"], serde_json::json!([]));
    }
}
