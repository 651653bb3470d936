//! Value representations for generated benchmark rows.
//!
//! Values are a closed sum type so that backend adapters can match on them
//! exhaustively per declared column type.

use crate::schema::ValueKind;
use chrono::{DateTime, Utc};

/// A single generated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratedValue {
    /// Integer value
    Integer(i64),

    /// Boolean value
    Boolean(bool),

    /// 32-bit floating point
    Float32(f32),

    /// 64-bit floating point
    Float64(f64),

    /// Date/time with timezone
    Timestamp(DateTime<Utc>),
}

impl GeneratedValue {
    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
            Self::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an f64 (32-bit floats are widened).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(f64::from(*f)),
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a timestamp.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// A generated row: column name to value, in table field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratedRow {
    values: Vec<(&'static str, GeneratedValue)>,
}

impl GeneratedRow {
    /// Create an empty row with room for `capacity` columns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Set a column value, replacing any previous value for that column.
    pub fn insert(&mut self, column: &'static str, value: GeneratedValue) {
        match self.values.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((column, value)),
        }
    }

    /// Get the value of a column.
    pub fn get(&self, column: &str) -> Option<&GeneratedValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Iterate over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &GeneratedValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// Column names present in this row.
    pub fn columns(&self) -> Vec<&'static str> {
        self.values.iter().map(|(name, _)| *name).collect()
    }

    /// Number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
