//! Memoizes [`KafkaSink`]s by the fingerprint of their effective connection
//! config, so destinations that resolve to the same `(bootstrap, topic)`
//! pair share one producer. Per-destination configs with blank fields
//! inherit from the process-default Kafka config.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use eventer_core::KafkaConfig;

use crate::errors::KafkaSinkError;
use crate::sink::KafkaSink;

pub struct KafkaSinkPool {
    default_config: KafkaConfig,
    sinks: Mutex<HashMap<u64, Arc<KafkaSink>>>,
}

impl KafkaSinkPool {
    pub fn new(default_config: KafkaConfig) -> Self {
        KafkaSinkPool {
            default_config,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Merges `config` over the process default (blank fields inherit), then
    /// returns the memoized sink for the resulting effective config, building
    /// one if this is the first time it's been seen.
    pub fn get_or_create(
        &self,
        destination_id: &str,
        config: &KafkaConfig,
    ) -> Result<Arc<KafkaSink>, KafkaSinkError> {
        let effective = self.resolve(config);
        let key = eventer_core::fingerprint_object(&effective)
            .expect("KafkaConfig always serializes to JSON");

        if let Some(sink) = self.sinks.lock().unwrap().get(&key) {
            return Ok(Arc::clone(sink));
        }

        let sink = Arc::new(KafkaSink::new(destination_id.to_string(), &effective)?);
        self.sinks.lock().unwrap().insert(key, Arc::clone(&sink));
        Ok(sink)
    }

    fn resolve(&self, config: &KafkaConfig) -> KafkaConfig {
        KafkaConfig {
            bootstrap_servers: non_empty_or(&config.bootstrap_servers, &self.default_config.bootstrap_servers),
            topic: non_empty_or(&config.topic, &self.default_config.topic),
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
