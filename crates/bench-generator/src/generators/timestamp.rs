//! Timestamp value generators.

use bench_core::GeneratedValue;
use chrono::Utc;

/// Generate the current UTC timestamp.
///
/// This is NOT deterministic - each call returns the current time.
pub fn generate_timestamp_now() -> GeneratedValue {
    GeneratedValue::Timestamp(Utc::now())
}
