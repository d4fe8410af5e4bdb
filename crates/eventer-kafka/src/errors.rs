//! Kafka sink errors (C6). Construction failures (bad bootstrap list, topic
//! create failure other than "already exists") are fatal to `Init`; `Send`
//! failures are reported back to the generator, which logs and continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KafkaSinkError {
    #[error("failed to build Kafka producer: {0}")]
    ClientConfig(#[from] rdkafka::error::KafkaError),

    #[error("failed to create topic {topic:?}: {source}")]
    TopicCreate {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    #[error("enqueueing message failed: {0}")]
    Enqueue(String),

    #[error("flush timed out or failed: {0}")]
    Flush(#[source] rdkafka::error::KafkaError),
}
