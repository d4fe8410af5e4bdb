//! eventer-kafka: the Kafka-like sink (C6). Binds a topic, publishes keyed
//! messages, and memoizes producers per distinct effective config.

mod errors;
mod pool;
mod sink;

pub use errors::KafkaSinkError;
pub use pool::KafkaSinkPool;
pub use sink::KafkaSink;
