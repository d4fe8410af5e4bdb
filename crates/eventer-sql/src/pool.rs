//! Memoizes [`SqlSink`]s by the fingerprint of their effective connection
//! config, mirroring the Kafka sink pool. Per-destination configs with blank
//! fields inherit host/port/user/password/db/table from the process
//! default.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;

use eventer_core::PostgresConfig;

use crate::errors::SqlSinkError;
use crate::sink::SqlSink;

pub struct SqlSinkPool {
    default_config: PostgresConfig,
    sinks: Mutex<HashMap<u64, Arc<SqlSink>>>,
}

impl SqlSinkPool {
    pub fn new(default_config: PostgresConfig) -> Self {
        SqlSinkPool {
            default_config,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_create(
        &self,
        destination_id: &str,
        config: &PostgresConfig,
    ) -> Result<Arc<SqlSink>, SqlSinkError> {
        let effective = self.resolve(config);
        let key = eventer_core::fingerprint_object(&effective)
            .expect("PostgresConfig always serializes to JSON");

        {
            let sinks = self.sinks.lock().await;
            if let Some(sink) = sinks.get(&key) {
                return Ok(Arc::clone(sink));
            }
        }

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&connection_string(&effective))
            .await
            .map_err(SqlSinkError::Database)?;

        let sink = Arc::new(SqlSink::new(
            destination_id.to_string(),
            effective.table.clone(),
            pool,
        ));

        let mut sinks = self.sinks.lock().await;
        Ok(Arc::clone(sinks.entry(key).or_insert(sink)))
    }

    fn resolve(&self, config: &PostgresConfig) -> PostgresConfig {
        let d = &self.default_config;
        PostgresConfig {
            host: non_empty_or(&config.host, &d.host),
            port: if config.port == 0 { d.port } else { config.port },
            user: non_empty_or(&config.user, &d.user),
            password: non_empty_or(&config.password, &d.password),
            db: non_empty_or(&config.db, &d.db),
            table: non_empty_or(&config.table, &d.table),
            ssl: config.ssl || d.ssl,
        }
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn connection_string(config: &PostgresConfig) -> String {
    let sslmode = if config.ssl { "require" } else { "disable" };
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        config.user, config.password, config.host, config.port, config.db, sslmode
    )
}
