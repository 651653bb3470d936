//! Fixed benchmark table schema.
//!
//! Every backend is exercised against the same table: an identity column
//! `id` followed by eleven data columns `f1`..`f11`, one for each of the
//! common relational column types. Each data column also records which kind
//! of value the generator produces for it, so backend adapters can bind
//! values per declared column type.

/// Default name of the benchmark table.
pub const DEFAULT_TABLE_NAME: &str = "test_table";

/// Predicate used by the range read, referencing ten of the eleven data columns.
pub const SELECT_CONDITIONS: &str =
    "f1>1 AND f2>1 AND f3 AND F5>0.5 AND f6>0.5 AND f7>1 AND f8>1 AND f9>1 AND f10>1 AND f11>1";

/// Relational column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 64-bit auto-incrementing integer
    BigSerial,
    /// 64-bit integer
    BigInt,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Double precision float
    Float,
    /// Single precision float
    Real,
    /// 32-bit integer
    Integer,
    /// Arbitrary precision numeric
    Numeric,
    /// 16-bit integer
    SmallInt,
    /// 16-bit auto-incrementing integer
    SmallSerial,
    /// 32-bit auto-incrementing integer
    Serial,
}

/// Kind of value the generator produces for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Integer in `[0, 255)`
    Integer,
    /// Boolean derived from a `[0, 255)` draw
    Boolean,
    /// Timestamp taken at generation time
    Timestamp,
    /// 32-bit float in `[0, 1)`
    Float32,
    /// 64-bit float in `[0, 1)`
    Float64,
}

/// Column definition without a generator (used for the identity column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: &'static str,
    /// Column type
    pub column_type: ColumnType,
}

/// Data column definition: a column plus the kind of value generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Column name
    pub name: &'static str,
    /// Column type
    pub column_type: ColumnType,
    /// Generated value kind
    pub value_kind: ValueKind,
}

impl FieldDefinition {
    const fn new(name: &'static str, column_type: ColumnType, value_kind: ValueKind) -> Self {
        Self {
            name,
            column_type,
            value_kind,
        }
    }
}

const BENCHMARK_FIELDS: [FieldDefinition; 11] = [
    FieldDefinition::new("f1", ColumnType::BigInt, ValueKind::Integer),
    FieldDefinition::new("f2", ColumnType::BigSerial, ValueKind::Integer),
    FieldDefinition::new("f3", ColumnType::Boolean, ValueKind::Boolean),
    FieldDefinition::new("f4", ColumnType::Date, ValueKind::Timestamp),
    FieldDefinition::new("f5", ColumnType::Float, ValueKind::Float32),
    FieldDefinition::new("f6", ColumnType::Real, ValueKind::Float64),
    FieldDefinition::new("f7", ColumnType::Integer, ValueKind::Integer),
    FieldDefinition::new("f8", ColumnType::Numeric, ValueKind::Integer),
    FieldDefinition::new("f9", ColumnType::SmallInt, ValueKind::Integer),
    FieldDefinition::new("f10", ColumnType::SmallSerial, ValueKind::Integer),
    FieldDefinition::new("f11", ColumnType::Serial, ValueKind::Integer),
];

/// Table definition: identity column plus data columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    /// Table name
    pub name: String,
    /// Identity (primary key) column, assigned by the backend
    pub id: ColumnDefinition,
    /// Data columns, in insert order
    pub fields: Vec<FieldDefinition>,
}

impl TableDefinition {
    /// Create the fixed benchmark table under the given name.
    pub fn benchmark(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: ColumnDefinition {
                name: "id",
                column_type: ColumnType::BigSerial,
            },
            fields: BENCHMARK_FIELDS.to_vec(),
        }
    }

    /// Get a data column by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the data column names in insert order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

impl Default for TableDefinition {
    fn default() -> Self {
        Self::benchmark(DEFAULT_TABLE_NAME)
    }
}
