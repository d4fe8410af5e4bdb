//! eventer-core: neutral types and the content-hash fingerprinting used to
//! give generators a stable, restart-idempotent identity.

pub mod errors;
pub mod event;
pub mod fingerprint;
pub mod sink;

pub use errors::CoreError;
pub use event::{
    key_from_object, DestinationDesc, DestinationKind, Event, EventDesc, EventKey, EventObject,
    GeneratorDesc, KafkaConfig, PostgresConfig, ScheduleDesc,
};
pub use fingerprint::{fingerprint, fingerprint_object, fingerprint_with_order};
pub use sink::{Sink, SinkError};
