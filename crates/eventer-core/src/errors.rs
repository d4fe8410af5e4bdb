//! Shared error primitives re-used across the composer, generator and sink crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("generator with id {0} not found")]
    NotFound(u64),
    #[error("{0}")]
    Internal(String),
}
