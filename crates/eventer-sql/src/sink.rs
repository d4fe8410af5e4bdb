//! The SQL sink (C7): binds a table schema once, then upserts every event
//! against it. This is where the spec's hard type-inference and converter
//! logic lives; see [`schema`] and [`converter`].

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex as AsyncMutex;

use eventer_core::{Event, Sink, SinkError};

use crate::catalog::fetch_columns;
use crate::errors::SqlSinkError;
use crate::schema::{reconcile, SchemaBinding};

pub struct SqlSink {
    id: String,
    table: String,
    pool: PgPool,
    /// Bound exactly once, under this lock, on the first `Init` call; every
    /// later `Init` observes `Some` and is a no-op.
    binding: AsyncMutex<Option<Arc<SchemaBinding>>>,
}

impl SqlSink {
    pub fn new(id: impl Into<String>, table: impl Into<String>, pool: PgPool) -> Self {
        SqlSink {
            id: id.into(),
            table: table.into(),
            pool,
            binding: AsyncMutex::new(None),
        }
    }

}

#[async_trait]
impl Sink for SqlSink {
    async fn init(&self, event: &Event) -> Result<(), SinkError> {
        let mut guard = self.binding.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        if !event.is_valid() {
            return Err(Box::new(SqlSinkError::NotAnObject));
        }

        let catalog_columns = fetch_columns(&self.pool, &self.table)
            .await
            .map_err(SqlSinkError::Database)?;
        let binding = reconcile(&self.table, &catalog_columns, &event.object)?;

        for statement in &binding.ddl {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(SqlSinkError::Database)?;
        }

        *guard = Some(Arc::new(binding));
        Ok(())
    }

    async fn send(&self, event: &Event) -> Result<(), SinkError> {
        let binding = self
            .binding
            .lock()
            .await
            .clone()
            .ok_or(SqlSinkError::NotBound)?;

        let sql = binding.render_upsert(&event.object)?;
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(SqlSinkError::Database)?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        // The connection is externally pooled; there is no client-side
        // buffer to drain beyond what `execute` already awaited.
        Ok(())
    }

    async fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }

    fn id(&self) -> &str {
        &self.id
    }
}
