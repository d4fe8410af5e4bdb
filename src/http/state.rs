use std::sync::Arc;

use eventer_generator::GeneratorRegistry;
use eventer_kafka::KafkaSinkPool;
use eventer_sql::SqlSinkPool;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GeneratorRegistry>,
    pub kafka_pool: Arc<KafkaSinkPool>,
    pub sql_pool: Arc<SqlSinkPool>,
}
