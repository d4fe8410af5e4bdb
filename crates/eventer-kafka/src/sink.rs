//! The Kafka-like sink (C6): binds a topic, publishes keyed messages, and
//! flushes on a bounded wait. Delivery reports are drained on a background
//! task so `send` never blocks the generator's tick loop on broker I/O.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord};
use rdkafka::types::RDKafkaErrorCode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use eventer_core::{Event, KafkaConfig, Sink, SinkError};

use crate::errors::KafkaSinkError;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

pub struct KafkaSink {
    id: String,
    topic: String,
    producer: FutureProducer,
    admin: AdminClient<DefaultClientContext>,
    reports: mpsc::UnboundedSender<DeliveryFuture>,
    reporter_cancel: CancellationToken,
}

impl KafkaSink {
    /// Builds a producer and an admin client against `config.bootstrap_servers`,
    /// and spawns the delivery-report listener. Does not touch the network
    /// until `init`/`send` are called.
    pub fn new(id: impl Into<String>, config: &KafkaConfig) -> Result<Self, KafkaSinkError> {
        let mut client_config = ClientConfig::new();
        client_config.set("bootstrap.servers", &config.bootstrap_servers);

        let producer: FutureProducer = client_config.create()?;
        let admin: AdminClient<DefaultClientContext> = client_config.create()?;

        let (tx, mut rx) = mpsc::unbounded_channel::<DeliveryFuture>();
        let reporter_cancel = CancellationToken::new();
        let cancel = reporter_cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    next = rx.recv() => {
                        match next {
                            None => break,
                            Some(delivery) => match delivery.await {
                                Ok(Ok((partition, offset))) => {
                                    tracing::debug!(partition, offset, "kafka delivery acked");
                                }
                                Ok(Err((err, _msg))) => {
                                    tracing::warn!(error = %err, "kafka delivery failed");
                                }
                                Err(_cancelled) => {
                                    tracing::warn!("kafka delivery future cancelled");
                                }
                            },
                        }
                    }
                }
            }
        });

        Ok(KafkaSink {
            id: id.into(),
            topic: config.topic.clone(),
            producer,
            admin,
            reports: tx,
            reporter_cancel,
        })
    }
}

#[async_trait]
impl Sink for KafkaSink {
    async fn init(&self, _event: &Event) -> Result<(), SinkError> {
        let topic = NewTopic::new(&self.topic, 1, TopicReplication::Fixed(1));
        let result = self
            .admin
            .create_topics([&topic], &AdminOptions::new())
            .await
            .map_err(KafkaSinkError::ClientConfig)?;

        for outcome in result {
            if let Err((topic, err_code)) = outcome {
                if err_code != RDKafkaErrorCode::TopicAlreadyExists {
                    return Err(Box::new(KafkaSinkError::TopicCreate {
                        topic,
                        source: KafkaError::AdminOp(err_code),
                    }));
                }
            }
        }
        Ok(())
    }

    async fn send(&self, event: &Event) -> Result<(), SinkError> {
        let record = FutureRecord::to(&self.topic)
            .key(event.key.as_bytes())
            .payload(&event.json);

        match self.producer.send_result(record) {
            Ok(delivery) => {
                let _ = self.reports.send(delivery);
                Ok(())
            }
            Err((err, _record)) => Err(Box::new(KafkaSinkError::Enqueue(err.to_string()))),
        }
    }

    async fn flush(&self) -> Result<(), SinkError> {
        self.producer
            .flush(FLUSH_TIMEOUT)
            .map_err(|e| Box::new(KafkaSinkError::Flush(e)) as SinkError)
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.reporter_cancel.cancel();
        self.flush().await
    }

    fn id(&self) -> &str {
        &self.id
    }
}
