//! Backend factory for PostgreSQL test cases.

use crate::backend::PostgresBackend;
use crate::config::{PostgresConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST};
use bench_core::{ComponentType, TestCase};
use bench_framework::{BackendFactory, BenchError, DatabaseBackend};
use std::time::Duration;
use tracing::error;

/// Env var holding the PostgreSQL user.
pub const POSTGRES_USER: &str = "POSTGRES_USER";

/// Env var holding the PostgreSQL password.
pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";

/// Builds [`PostgresBackend`]s from test cases.
///
/// Credentials come from the test case's `env-vars`, the port from the test
/// case itself and the host from the factory.
#[derive(Debug, Clone)]
pub struct PostgresBackendFactory {
    host: String,
    connect_timeout: Duration,
}

impl Default for PostgresBackendFactory {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl PostgresBackendFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Timeout of a single connection attempt.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connection settings for a test case.
    pub fn config_for(&self, test_case: &TestCase) -> Result<PostgresConfig, BenchError> {
        let user = required_env_var(test_case, POSTGRES_USER)?;
        let password = required_env_var(test_case, POSTGRES_PASSWORD)?;

        Ok(PostgresConfig::new(self.host.clone(), test_case.port, user, password)
            .with_connect_timeout(self.connect_timeout))
    }
}

fn required_env_var<'a>(test_case: &'a TestCase, key: &str) -> Result<&'a str, BenchError> {
    test_case.env_var(key).ok_or_else(|| {
        error!("no required env var key: {}", key);
        BenchError::MissingEnvVar(key.to_string())
    })
}

impl BackendFactory for PostgresBackendFactory {
    fn component_type(&self) -> ComponentType {
        ComponentType::Postgres
    }

    fn create(&self, test_case: &TestCase) -> Result<Box<dyn DatabaseBackend>, BenchError> {
        let config = self.config_for(test_case)?;
        Ok(Box::new(PostgresBackend::new(config)))
    }
}
