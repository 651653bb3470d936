//! Row generator for the benchmark table.

use crate::generators::generate_value;
use bench_core::{GeneratedRow, TableDefinition};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Data generator that produces rows for a [`TableDefinition`].
///
/// The identity column is never generated; it is left to the backend.
pub struct TableDataGenerator {
    /// Table whose data columns are generated
    table: TableDefinition,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Number of rows generated so far
    generated: u64,
}

impl TableDataGenerator {
    /// Create a new generator for the given table and seed.
    pub fn new(table: TableDefinition, seed: u64) -> Self {
        Self {
            table,
            rng: StdRng::seed_from_u64(seed),
            generated: 0,
        }
    }

    /// Generate the next row.
    pub fn next_row(&mut self) -> GeneratedRow {
        let mut row = GeneratedRow::with_capacity(self.table.fields.len());
        for field in &self.table.fields {
            row.insert(field.name, generate_value(field.value_kind, &mut self.rng));
        }
        self.generated += 1;
        row
    }

    /// Generate exactly `count` rows.
    pub fn generate(&mut self, count: usize) -> Vec<GeneratedRow> {
        self.rows(count).collect()
    }

    /// Lazily generate `count` rows.
    pub fn rows(&mut self, count: usize) -> GeneratedRowIterator<'_> {
        GeneratedRowIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Total number of rows generated by this generator.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Get a reference to the table definition.
    pub fn table(&self) -> &TableDefinition {
        &self.table
    }
}

/// Iterator that lazily generates rows.
pub struct GeneratedRowIterator<'a> {
    generator: &'a mut TableDataGenerator,
    remaining: usize,
}

impl Iterator for GeneratedRowIterator<'_> {
    type Item = GeneratedRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_row())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for GeneratedRowIterator<'_> {}
