//! SQL statement builders.

use bench_core::{ColumnType, TableDefinition};

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// PostgreSQL type name for a column type.
pub fn column_type_sql(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::BigSerial => "BIGSERIAL",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Date => "DATE",
        ColumnType::Float => "FLOAT",
        ColumnType::Real => "REAL",
        ColumnType::Integer => "INTEGER",
        ColumnType::Numeric => "NUMERIC",
        ColumnType::SmallInt => "SMALLINT",
        ColumnType::SmallSerial => "SMALLSERIAL",
        ColumnType::Serial => "SERIAL",
    }
}

pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {}", quote_ident(name))
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {}", quote_ident(name))
}

/// `CREATE TABLE` with the identity column as primary key followed by every data column.
pub fn create_table(table: &TableDefinition) -> String {
    let mut columns = vec![format!(
        "{} {} PRIMARY KEY",
        quote_ident(table.id.name),
        column_type_sql(table.id.column_type)
    )];
    columns.extend(
        table
            .fields
            .iter()
            .map(|f| format!("{} {}", quote_ident(f.name), column_type_sql(f.column_type))),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(&table.name),
        columns.join(", ")
    )
}

pub fn truncate_table(name: &str) -> String {
    format!("TRUNCATE TABLE {}", quote_ident(name))
}

pub fn drop_table(name: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(name))
}

/// Bind parameters PostgreSQL accepts in one statement.
pub const MAX_BIND_PARAMETERS: usize = 65535;

/// Rows of `table` that fit in one multi-row `INSERT`.
pub fn max_rows_per_insert(table: &TableDefinition) -> usize {
    MAX_BIND_PARAMETERS / table.fields.len().max(1)
}

/// Multi-row `INSERT` over the data columns with `$n` placeholders.
pub fn insert(table: &TableDefinition, row_count: usize) -> String {
    let col_count = table.fields.len();
    let mut placeholders: Vec<String> = Vec::with_capacity(row_count);
    let mut param_idx = 1;

    for _ in 0..row_count {
        let row_placeholders: Vec<String> = (0..col_count)
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_ident(&table.name),
        table
            .fields
            .iter()
            .map(|f| quote_ident(f.name))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

pub fn select_by_id(table: &str) -> String {
    format!("SELECT * FROM {} WHERE \"id\" = $1", quote_ident(table))
}

/// The predicate is inserted verbatim.
pub fn select_by_conditions(table: &str, conditions: &str) -> String {
    format!("SELECT * FROM {} WHERE {}", quote_ident(table), conditions)
}
