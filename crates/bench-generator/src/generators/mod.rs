//! Individual value generators for each value kind.

pub mod numeric;
pub mod timestamp;

use bench_core::{GeneratedValue, ValueKind};
use rand::Rng;

/// Exclusive upper bound of generated integers and boolean draws.
pub const INTEGER_BOUND: i64 = 255;

/// Boolean draws strictly above this threshold are `true`.
pub const BOOLEAN_THRESHOLD: i64 = 128;

/// Generate a value of the given kind.
pub fn generate_value<R: Rng>(kind: ValueKind, rng: &mut R) -> GeneratedValue {
    match kind {
        ValueKind::Integer => numeric::generate_bounded_int(rng, INTEGER_BOUND),
        ValueKind::Boolean => numeric::generate_threshold_bool(rng, INTEGER_BOUND, BOOLEAN_THRESHOLD),
        ValueKind::Timestamp => timestamp::generate_timestamp_now(),
        ValueKind::Float32 => numeric::generate_unit_f32(rng),
        ValueKind::Float64 => numeric::generate_unit_f64(rng),
    }
}
