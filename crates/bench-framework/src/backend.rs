//! Backend capability interface and registry.
//!
//! A backend adapter implements [`DatabaseBackend`] for one kind of
//! database, and a [`BackendFactory`] that builds it from a [`TestCase`].
//! Factories are registered in a [`BackendRegistry`] keyed by
//! [`ComponentType`], so new backends plug in without touching the
//! orchestrator.

use crate::error::{BackendError, BenchError};
use async_trait::async_trait;
use bench_core::{ComponentType, GeneratedRow, TableDefinition, TestCase};
use std::collections::HashMap;
use tracing::{debug, error};

/// Lifecycle and data operations a backend under test must provide.
#[async_trait]
pub trait DatabaseBackend: Send {
    /// Short backend name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Prepare the connection. Backends may defer the network handshake to `ping`.
    async fn open(&mut self) -> Result<(), BackendError>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check that the backend answers.
    async fn ping(&mut self) -> Result<(), BackendError>;

    /// Drop a database.
    async fn drop_database(&mut self, name: &str) -> Result<(), BackendError>;

    /// Create a database.
    async fn create_database(&mut self, name: &str) -> Result<(), BackendError>;

    /// Switch to a database. An empty name returns to the default database.
    async fn switch_database(&mut self, name: &str) -> Result<(), BackendError>;

    /// Create a table with the identity column and all data columns.
    async fn create_table(&mut self, table: &TableDefinition) -> Result<(), BackendError>;

    /// Delete all rows of a table.
    async fn truncate_table(&mut self, name: &str) -> Result<(), BackendError>;

    /// Drop a table.
    async fn drop_table(&mut self, name: &str) -> Result<(), BackendError>;

    /// Largest number of rows a single `insert` call may carry for `table`.
    /// `None` means unlimited.
    fn max_batch_rows(&self, _table: &TableDefinition) -> Option<u64> {
        None
    }

    /// Insert rows into the table's data columns. Returns the number of rows written.
    async fn insert(
        &mut self,
        table: &TableDefinition,
        rows: &[GeneratedRow],
    ) -> Result<u64, BackendError>;

    /// Read rows by identity value. Returns the number of rows fetched.
    async fn select_by_id(&mut self, table: &str, id: i64) -> Result<u64, BackendError>;

    /// Read rows matching a backend-native predicate. Returns the number of rows fetched.
    async fn select_by_conditions(
        &mut self,
        table: &str,
        conditions: &str,
    ) -> Result<u64, BackendError>;
}

/// Builds a backend for a test case.
///
/// Implementations validate the test case (e.g. required credentials)
/// without performing any I/O.
pub trait BackendFactory: Send + Sync {
    /// Component type this factory handles.
    fn component_type(&self) -> ComponentType;

    /// Build a backend for the test case.
    fn create(&self, test_case: &TestCase) -> Result<Box<dyn DatabaseBackend>, BenchError>;
}

/// Registry of backend factories keyed by component type.
#[derive(Default)]
pub struct BackendRegistry {
    factories: HashMap<ComponentType, Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any factory for the same component type.
    pub fn register<F: BackendFactory + 'static>(&mut self, factory: F) {
        let component_type = factory.component_type();
        debug!("Registering backend factory for '{}'", component_type);
        self.factories.insert(component_type, Box::new(factory));
    }

    /// Register a factory (builder style).
    pub fn with_factory<F: BackendFactory + 'static>(mut self, factory: F) -> Self {
        self.register(factory);
        self
    }

    /// Whether a factory is registered for the component type.
    pub fn supports(&self, component_type: &ComponentType) -> bool {
        self.factories.contains_key(component_type)
    }

    /// Build the backend for a test case.
    pub fn create(&self, test_case: &TestCase) -> Result<Box<dyn DatabaseBackend>, BenchError> {
        match self.factories.get(&test_case.component_type) {
            Some(factory) => factory.create(test_case),
            None => {
                error!(
                    component = %test_case.component_type,
                    "unknown component for testing"
                );
                Err(BenchError::UnknownComponent(
                    test_case.component_type.clone(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockBackendFactory};

    #[test]
    fn test_unregistered_component_is_unknown() {
        let registry = BackendRegistry::new();
        let test_case = TestCase::new("redis", 6379);

        let result = registry.create(&test_case);
        assert!(matches!(
            result,
            Err(BenchError::UnknownComponent(ComponentType::Other(ref name))) if name == "redis"
        ));
    }

    #[test]
    fn test_registered_component_builds_backend() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let registry = BackendRegistry::new()
            .with_factory(MockBackendFactory::new(ComponentType::Postgres, handle.clone()));

        assert!(registry.supports(&ComponentType::Postgres));
        assert!(!registry.supports(&ComponentType::Kafka));

        let created = registry.create(&TestCase::new("postgres", 5432)).unwrap();
        assert_eq!(created.name(), "mock");
        assert_eq!(handle.created(), 1);
        assert!(handle.calls().is_empty());
    }

    #[test]
    fn test_kafka_without_factory_is_unknown() {
        let registry = BackendRegistry::new().with_factory(MockBackendFactory::new(
            ComponentType::Postgres,
            MockBackend::new().handle(),
        ));

        let result = registry.create(&TestCase::new("kafka", 9092));
        assert!(matches!(
            result,
            Err(BenchError::UnknownComponent(ComponentType::Kafka))
        ));
    }
}
