//! Binding of generated values to PostgreSQL parameters.
//!
//! Values are converted per declared column type, so the same generated
//! integer lands as `INT8`, `INT4`, `INT2` or `NUMERIC` depending on the
//! column it is written to.

use crate::error::PostgresBackendError;
use bench_core::{ColumnType, GeneratedValue};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio_postgres::types::ToSql;

/// A value ready to be bound to a PostgreSQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum PgValue {
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Date(NaiveDate),
}

/// Convert a generated value for a column of the given type.
pub fn to_pg_value(
    column: &str,
    column_type: ColumnType,
    value: &GeneratedValue,
) -> Result<PgValue, PostgresBackendError> {
    let mismatch = || PostgresBackendError::Conversion {
        column: column.to_string(),
        message: format!("cannot bind {:?} to {:?}", value.kind(), column_type),
    };
    let out_of_range = |v: i64| PostgresBackendError::Conversion {
        column: column.to_string(),
        message: format!("{v} out of range for {column_type:?}"),
    };

    match (column_type, value) {
        (ColumnType::BigInt | ColumnType::BigSerial, GeneratedValue::Integer(v)) => {
            Ok(PgValue::Int64(*v))
        }
        (ColumnType::Integer | ColumnType::Serial, GeneratedValue::Integer(v)) => i32::try_from(*v)
            .map(PgValue::Int32)
            .map_err(|_| out_of_range(*v)),
        (ColumnType::SmallInt | ColumnType::SmallSerial, GeneratedValue::Integer(v)) => {
            i16::try_from(*v)
                .map(PgValue::Int16)
                .map_err(|_| out_of_range(*v))
        }
        (ColumnType::Numeric, GeneratedValue::Integer(v)) => Ok(PgValue::Decimal(Decimal::from(*v))),
        (ColumnType::Boolean, GeneratedValue::Boolean(b)) => Ok(PgValue::Bool(*b)),
        (ColumnType::Date, GeneratedValue::Timestamp(ts)) => Ok(PgValue::Date(ts.date_naive())),
        (ColumnType::Float, GeneratedValue::Float32(f)) => Ok(PgValue::Float64(f64::from(*f))),
        (ColumnType::Float, GeneratedValue::Float64(f)) => Ok(PgValue::Float64(*f)),
        (ColumnType::Real, GeneratedValue::Float32(f)) => Ok(PgValue::Float32(*f)),
        (ColumnType::Real, GeneratedValue::Float64(f)) => Ok(PgValue::Float32(*f as f32)),
        _ => Err(mismatch()),
    }
}

/// Convert a PgValue to a boxed ToSql trait object.
pub fn pg_value_to_boxed(value: PgValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        PgValue::Bool(b) => Box::new(b),
        PgValue::Int16(i) => Box::new(i),
        PgValue::Int32(i) => Box::new(i),
        PgValue::Int64(i) => Box::new(i),
        PgValue::Float32(f) => Box::new(f),
        PgValue::Float64(f) => Box::new(f),
        PgValue::Decimal(d) => Box::new(d),
        PgValue::Date(d) => Box::new(d),
    }
}
