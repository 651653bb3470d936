//! PostgreSQL implementation of the benchmark backend.

use crate::config::{mask_connection_password, PostgresConfig};
use crate::error::PostgresBackendError;
use crate::sql;
use crate::value::{pg_value_to_boxed, to_pg_value};
use async_trait::async_trait;
use bench_core::{GeneratedRow, TableDefinition};
use bench_framework::{BackendError, DatabaseBackend};
use futures::TryStreamExt;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};

/// PostgreSQL backend.
///
/// `open` only records that the backend may connect; the connection itself
/// is established by the first operation (usually `ping`), so a server that
/// is still starting does not fail the run before the readiness wait.
pub struct PostgresBackend {
    config: PostgresConfig,
    client: Option<Client>,
    /// Database the next connection targets; empty selects the default database.
    database: String,
    opened: bool,
}

impl PostgresBackend {
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            client: None,
            database: String::new(),
            opened: false,
        }
    }

    /// Database currently selected (empty for the default database).
    pub fn database(&self) -> &str {
        &self.database
    }

    async fn connect(&self) -> Result<Client, PostgresBackendError> {
        debug!(
            "Connecting to {}",
            mask_connection_password(&self.config.connection_url(&self.database))
        );
        let (client, connection) = self.config.pg_config(&self.database).connect(NoTls).await?;

        // Spawn the connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(client)
    }

    /// Connected client, connecting on first use or after the connection was lost.
    async fn client(&mut self) -> Result<&Client, PostgresBackendError> {
        if !self.opened {
            return Err(PostgresBackendError::NotConnected);
        }
        let stale = self.client.as_ref().map_or(true, Client::is_closed);
        if stale {
            let client = self.connect().await?;
            self.client = Some(client);
        }
        self.client.as_ref().ok_or(PostgresBackendError::NotConnected)
    }

    async fn execute(&mut self, statement: &str) -> Result<(), PostgresBackendError> {
        debug!("Executing: {}", statement);
        self.client().await?.batch_execute(statement).await?;
        Ok(())
    }

    /// Run a query and count the returned rows without buffering them.
    async fn count_rows(
        &mut self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, PostgresBackendError> {
        let client = self.client().await?;
        let stream = client.query_raw(query, slice_iter(params)).await?;
        let count = stream
            .try_fold(0u64, |count, _row| async move { Ok(count + 1) })
            .await?;
        Ok(count)
    }

    async fn insert_rows(
        &mut self,
        table: &TableDefinition,
        rows: &[GeneratedRow],
    ) -> Result<u64, PostgresBackendError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let statement = sql::insert(table, rows.len());

        let mut params: Vec<Box<dyn ToSql + Sync + Send>> =
            Vec::with_capacity(rows.len() * table.fields.len());
        for row in rows {
            for field in &table.fields {
                let value = row.get(field.name).ok_or_else(|| PostgresBackendError::Conversion {
                    column: field.name.to_string(),
                    message: "value missing from generated row".to_string(),
                })?;
                params.push(pg_value_to_boxed(to_pg_value(
                    field.name,
                    field.column_type,
                    value,
                )?));
            }
        }

        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let inserted = self.client().await?.execute(&statement, &param_refs).await?;
        debug!("Inserted {} rows into '{}'", inserted, table.name);
        Ok(inserted)
    }
}

fn slice_iter<'a>(
    s: &'a [&'a (dyn ToSql + Sync)],
) -> impl ExactSizeIterator<Item = &'a dyn ToSql> + 'a {
    s.iter().map(|s| *s as _)
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    async fn open(&mut self) -> Result<(), BackendError> {
        info!("Opening PostgreSQL connection to {}", self.config);
        self.opened = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if !self.opened {
            return Err(BackendError::NotConnected);
        }
        // Dropping the client ends the spawned connection task.
        self.client = None;
        self.opened = false;
        info!("Closed PostgreSQL connection");
        Ok(())
    }

    async fn ping(&mut self) -> Result<(), BackendError> {
        let client = self.client().await?;
        if let Err(e) = client.simple_query("SELECT 1").await {
            // Force a reconnect on the next attempt.
            self.client = None;
            return Err(PostgresBackendError::from(e).into());
        }
        Ok(())
    }

    async fn drop_database(&mut self, name: &str) -> Result<(), BackendError> {
        Ok(self.execute(&sql::drop_database(name)).await?)
    }

    async fn create_database(&mut self, name: &str) -> Result<(), BackendError> {
        Ok(self.execute(&sql::create_database(name)).await?)
    }

    async fn switch_database(&mut self, name: &str) -> Result<(), BackendError> {
        if !self.opened {
            return Err(BackendError::NotConnected);
        }

        let previous = std::mem::replace(&mut self.database, name.to_string());
        let client = self.connect().await.map_err(|e| {
            self.database = previous;
            BackendError::from(e)
        })?;
        // Replacing the client closes the connection to the previous database.
        self.client = Some(client);
        info!(
            "Switched to database '{}'",
            if name.is_empty() {
                self.config.default_database.as_str()
            } else {
                name
            }
        );
        Ok(())
    }

    async fn create_table(&mut self, table: &TableDefinition) -> Result<(), BackendError> {
        Ok(self.execute(&sql::create_table(table)).await?)
    }

    async fn truncate_table(&mut self, name: &str) -> Result<(), BackendError> {
        Ok(self.execute(&sql::truncate_table(name)).await?)
    }

    async fn drop_table(&mut self, name: &str) -> Result<(), BackendError> {
        Ok(self.execute(&sql::drop_table(name)).await?)
    }

    fn max_batch_rows(&self, table: &TableDefinition) -> Option<u64> {
        Some(sql::max_rows_per_insert(table) as u64)
    }

    async fn insert(
        &mut self,
        table: &TableDefinition,
        rows: &[GeneratedRow],
    ) -> Result<u64, BackendError> {
        Ok(self.insert_rows(table, rows).await?)
    }

    async fn select_by_id(&mut self, table: &str, id: i64) -> Result<u64, BackendError> {
        Ok(self.count_rows(&sql::select_by_id(table), &[&id]).await?)
    }

    async fn select_by_conditions(
        &mut self,
        table: &str,
        conditions: &str,
    ) -> Result<u64, BackendError> {
        Ok(self
            .count_rows(&sql::select_by_conditions(table, conditions), &[])
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> PostgresBackend {
        PostgresBackend::new(PostgresConfig::new("localhost", 5432, "bench", "secret"))
    }

    #[tokio::test]
    async fn test_operations_before_open_are_rejected() {
        let mut backend = backend();

        assert!(matches!(backend.ping().await, Err(BackendError::NotConnected)));
        assert!(matches!(
            backend.create_database("cott_db").await,
            Err(BackendError::NotConnected)
        ));
        assert!(matches!(backend.close().await, Err(BackendError::NotConnected)));
    }

    #[tokio::test]
    async fn test_open_does_not_connect() {
        let mut backend = backend();

        backend.open().await.unwrap();
        assert!(backend.client.is_none());
        assert_eq!(backend.database(), "");

        backend.close().await.unwrap();
        assert!(!backend.opened);
    }

    #[test]
    fn test_max_batch_rows_follows_bind_limit() {
        let table = TableDefinition::default();

        assert_eq!(backend().max_batch_rows(&table), Some(5957));
    }

    #[tokio::test]
    async fn test_insert_empty_batch_is_noop() {
        let mut backend = backend();
        backend.open().await.unwrap();

        let inserted = backend
            .insert(&TableDefinition::default(), &[])
            .await
            .unwrap();
        assert_eq!(inserted, 0);
        assert!(backend.client.is_none());
    }
}
