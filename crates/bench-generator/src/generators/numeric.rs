//! Numeric and boolean value generators.

use bench_core::GeneratedValue;
use rand::Rng;

/// Generate a random integer in `[0, bound)`.
pub fn generate_bounded_int<R: Rng>(rng: &mut R, bound: i64) -> GeneratedValue {
    GeneratedValue::Integer(rng.gen_range(0..bound))
}

/// Generate a boolean by drawing from `[0, bound)` and comparing against `threshold`.
pub fn generate_threshold_bool<R: Rng>(rng: &mut R, bound: i64, threshold: i64) -> GeneratedValue {
    GeneratedValue::Boolean(rng.gen_range(0..bound) > threshold)
}

/// Generate a random 32-bit float in `[0, 1)`.
pub fn generate_unit_f32<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::Float32(rng.gen::<f32>())
}

/// Generate a random 64-bit float in `[0, 1)`.
pub fn generate_unit_f64<R: Rng>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::Float64(rng.gen::<f64>())
}
