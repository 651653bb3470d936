//! Recording backend for tests.
//!
//! [`MockBackend`] records every call into a shared [`MockHandle`] and can be
//! told to fail specific operations, so the sweep and the orchestrator can be
//! exercised without a database.

use crate::backend::{BackendFactory, DatabaseBackend};
use crate::error::{BackendError, BenchError};
use async_trait::async_trait;
use bench_core::{ComponentType, GeneratedRow, TableDefinition, TestCase};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::error;

/// Backend operation kinds, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Open,
    Close,
    Ping,
    DropDatabase,
    CreateDatabase,
    SwitchDatabase,
    CreateTable,
    TruncateTable,
    DropTable,
    Insert,
    SelectById,
    SelectByConditions,
}

/// A recorded backend call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Open,
    Close,
    Ping,
    DropDatabase(String),
    CreateDatabase(String),
    SwitchDatabase(String),
    CreateTable(String),
    TruncateTable(String),
    DropTable(String),
    Insert { table: String, rows: usize },
    SelectById { table: String, id: i64 },
    SelectByConditions { table: String, conditions: String },
}

impl MockCall {
    /// Operation kind of this call.
    pub fn operation(&self) -> MockOperation {
        match self {
            MockCall::Open => MockOperation::Open,
            MockCall::Close => MockOperation::Close,
            MockCall::Ping => MockOperation::Ping,
            MockCall::DropDatabase(_) => MockOperation::DropDatabase,
            MockCall::CreateDatabase(_) => MockOperation::CreateDatabase,
            MockCall::SwitchDatabase(_) => MockOperation::SwitchDatabase,
            MockCall::CreateTable(_) => MockOperation::CreateTable,
            MockCall::TruncateTable(_) => MockOperation::TruncateTable,
            MockCall::DropTable(_) => MockOperation::DropTable,
            MockCall::Insert { .. } => MockOperation::Insert,
            MockCall::SelectById { .. } => MockOperation::SelectById,
            MockCall::SelectByConditions { .. } => MockOperation::SelectByConditions,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Always,
    /// Fail only the n-th call (1-based).
    Nth(usize),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<MockCall>,
    counts: HashMap<MockOperation, usize>,
    failures: HashMap<MockOperation, Failure>,
    failing_pings: usize,
    hanging_pings: bool,
    max_batch_rows: Option<u64>,
    created: usize,
}

/// Shared view of a mock backend's recorded calls and failure plan.
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every call of `operation` fail.
    pub fn fail_always(&self, operation: MockOperation) {
        self.lock().failures.insert(operation, Failure::Always);
    }

    /// Make only the `n`-th call (1-based) of `operation` fail.
    pub fn fail_nth(&self, operation: MockOperation, n: usize) {
        self.lock().failures.insert(operation, Failure::Nth(n));
    }

    /// Make the next `count` pings fail.
    pub fn fail_pings(&self, count: usize) {
        self.lock().failing_pings = count;
    }

    /// Make every ping hang forever.
    pub fn hang_pings(&self) {
        self.lock().hanging_pings = true;
    }

    /// Limit the rows of a single insert; larger inserts fail.
    pub fn set_max_batch_rows(&self, rows: u64) {
        self.lock().max_batch_rows = Some(rows);
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of calls of `operation`.
    pub fn count(&self, operation: MockOperation) -> usize {
        self.lock().counts.get(&operation).copied().unwrap_or(0)
    }

    /// Row counts of all insert calls in order.
    pub fn inserted_batches(&self) -> Vec<usize> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Insert { rows, .. } => Some(*rows),
                _ => None,
            })
            .collect()
    }

    /// Number of backends built by a [`MockBackendFactory`] using this handle.
    pub fn created(&self) -> usize {
        self.lock().created
    }

    fn record(&self, call: MockCall) -> Result<(), BackendError> {
        let mut state = self.lock();
        let operation = call.operation();
        let count = {
            let count = state.counts.entry(operation).or_insert(0);
            *count += 1;
            *count
        };
        state.calls.push(call);

        let failed = match state.failures.get(&operation) {
            Some(Failure::Always) => true,
            Some(Failure::Nth(n)) => *n == count,
            None => false,
        };
        let ping_failed = operation == MockOperation::Ping && state.failing_pings > 0;
        if ping_failed {
            state.failing_pings -= 1;
        }

        if failed || ping_failed {
            return Err(BackendError::Driver {
                backend: "mock",
                message: format!("injected {operation:?} failure"),
            });
        }
        Ok(())
    }
}

/// Backend that records calls instead of talking to a database.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    handle: MockHandle,
}

impl MockBackend {
    /// Create a mock backend with a fresh handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock backend recording into an existing handle.
    pub fn with_handle(handle: MockHandle) -> Self {
        Self { handle }
    }

    /// Handle to inspect calls and inject failures.
    pub fn handle(&self) -> MockHandle {
        self.handle.clone()
    }
}

#[async_trait]
impl DatabaseBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn open(&mut self) -> Result<(), BackendError> {
        self.handle.record(MockCall::Open)
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.handle.record(MockCall::Close)
    }

    async fn ping(&mut self) -> Result<(), BackendError> {
        self.handle.record(MockCall::Ping)?;
        let hanging = self.handle.lock().hanging_pings;
        if hanging {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn drop_database(&mut self, name: &str) -> Result<(), BackendError> {
        self.handle.record(MockCall::DropDatabase(name.to_string()))
    }

    async fn create_database(&mut self, name: &str) -> Result<(), BackendError> {
        self.handle.record(MockCall::CreateDatabase(name.to_string()))
    }

    async fn switch_database(&mut self, name: &str) -> Result<(), BackendError> {
        self.handle.record(MockCall::SwitchDatabase(name.to_string()))
    }

    async fn create_table(&mut self, table: &TableDefinition) -> Result<(), BackendError> {
        self.handle.record(MockCall::CreateTable(table.name.clone()))
    }

    async fn truncate_table(&mut self, name: &str) -> Result<(), BackendError> {
        self.handle.record(MockCall::TruncateTable(name.to_string()))
    }

    async fn drop_table(&mut self, name: &str) -> Result<(), BackendError> {
        self.handle.record(MockCall::DropTable(name.to_string()))
    }

    fn max_batch_rows(&self, _table: &TableDefinition) -> Option<u64> {
        self.handle.lock().max_batch_rows
    }

    async fn insert(
        &mut self,
        table: &TableDefinition,
        rows: &[GeneratedRow],
    ) -> Result<u64, BackendError> {
        self.handle.record(MockCall::Insert {
            table: table.name.clone(),
            rows: rows.len(),
        })?;
        let limit = self.handle.lock().max_batch_rows;
        if let Some(max) = limit.filter(|max| rows.len() as u64 > *max) {
            return Err(BackendError::Driver {
                backend: "mock",
                message: format!("{} rows exceed the batch limit of {max}", rows.len()),
            });
        }
        Ok(rows.len() as u64)
    }

    async fn select_by_id(&mut self, table: &str, id: i64) -> Result<u64, BackendError> {
        self.handle.record(MockCall::SelectById {
            table: table.to_string(),
            id,
        })?;
        Ok(1)
    }

    async fn select_by_conditions(
        &mut self,
        table: &str,
        conditions: &str,
    ) -> Result<u64, BackendError> {
        self.handle.record(MockCall::SelectByConditions {
            table: table.to_string(),
            conditions: conditions.to_string(),
        })?;
        Ok(0)
    }
}

/// Factory building [`MockBackend`]s that share one handle.
#[derive(Debug, Clone)]
pub struct MockBackendFactory {
    component_type: ComponentType,
    handle: MockHandle,
    required_env_vars: Vec<String>,
}

impl MockBackendFactory {
    pub fn new(component_type: ComponentType, handle: MockHandle) -> Self {
        Self {
            component_type,
            handle,
            required_env_vars: Vec::new(),
        }
    }

    /// Require these env vars in the test case, like a real backend's credentials.
    pub fn requiring<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_env_vars = keys.into_iter().map(Into::into).collect();
        self
    }
}

impl BackendFactory for MockBackendFactory {
    fn component_type(&self) -> ComponentType {
        self.component_type.clone()
    }

    fn create(&self, test_case: &TestCase) -> Result<Box<dyn DatabaseBackend>, BenchError> {
        for key in &self.required_env_vars {
            if test_case.env_var(key).is_none() {
                error!("no required env var key: {}", key);
                return Err(BenchError::MissingEnvVar(key.clone()));
            }
        }

        self.handle.lock().created += 1;
        Ok(Box::new(MockBackend::with_handle(self.handle.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();

        backend.open().await.unwrap();
        backend.create_database("cott_db").await.unwrap();
        backend.close().await.unwrap();

        assert_eq!(
            handle.calls(),
            vec![
                MockCall::Open,
                MockCall::CreateDatabase("cott_db".to_string()),
                MockCall::Close,
            ]
        );
        assert_eq!(handle.count(MockOperation::Open), 1);
        assert_eq!(handle.count(MockOperation::Ping), 0);
    }

    #[tokio::test]
    async fn test_fail_nth_only_fails_that_call() {
        let mut backend = MockBackend::new();
        let handle = backend.handle();
        handle.fail_nth(MockOperation::TruncateTable, 2);

        assert!(backend.truncate_table("t").await.is_ok());
        assert!(backend.truncate_table("t").await.is_err());
        assert!(backend.truncate_table("t").await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_pings_then_recover() {
        let mut backend = MockBackend::new();
        backend.handle().fail_pings(2);

        assert!(backend.ping().await.is_err());
        assert!(backend.ping().await.is_err());
        assert!(backend.ping().await.is_ok());
    }

    #[test]
    fn test_factory_requires_env_vars() {
        let handle = MockHandle::default();
        let factory = MockBackendFactory::new(ComponentType::Postgres, handle.clone())
            .requiring(["POSTGRES_USER"]);

        let missing = factory.create(&TestCase::new("postgres", 5432));
        assert!(matches!(missing, Err(BenchError::MissingEnvVar(ref key)) if key == "POSTGRES_USER"));
        assert_eq!(handle.created(), 0);

        let present = factory.create(
            &TestCase::new("postgres", 5432).with_env_var("POSTGRES_USER", "bench"),
        );
        assert!(present.is_ok());
        assert_eq!(handle.created(), 1);
    }
}
