//! The destination contract (C6/C7 conform to this). Defined here, rather
//! than in the generator crate, so the Kafka and SQL sink crates can depend
//! on `eventer-core` alone without creating a cycle through the generator.

use async_trait::async_trait;

use crate::event::Event;

/// Sinks report errors as an opaque boxed error: the generator only ever
/// logs them (transient, per-event) or surfaces them to `Register`'s caller
/// (fatal, at `Init`) — it never matches on a sink-specific variant.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[async_trait]
pub trait Sink: Send + Sync {
    /// Called exactly once, synchronously, with the first primed event.
    /// Binds the sink to its destination (creates a topic, infers/creates a
    /// table). A failure here is fatal to `Register`.
    async fn init(&self, event: &Event) -> Result<(), SinkError>;

    /// Delivers one event. Errors are logged by the caller and never
    /// terminate the generator.
    async fn send(&self, event: &Event) -> Result<(), SinkError>;

    /// Drains any pending delivery with a bounded wait. Called on every
    /// "no event this tick" and once more during teardown.
    async fn flush(&self) -> Result<(), SinkError>;

    /// Releases any held resources. Called once, after the final flush.
    async fn close(&self) -> Result<(), SinkError>;

    fn id(&self) -> &str;
}
