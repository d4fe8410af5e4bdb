//! Generator-construction errors (C4). These are always fatal to a single
//! `Register` call: the caller gets an error and no partial state is left
//! in the registry.

use thiserror::Error;

use eventer_composer::ComposerError;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to build composer: {0}")]
    Composer(#[from] ComposerError),

    #[error("invalid interval {0:?}: {1}")]
    BadInterval(String, String),

    #[error("interval {0:?} is below the 1ms minimum")]
    IntervalTooSmall(String),

    #[error("sink init failed: {0}")]
    SinkInit(#[source] eventer_core::SinkError),
}
