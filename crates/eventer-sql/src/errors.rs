//! SQL sink errors (C7). Schema binding failures at `Init` are fatal to
//! `Register`; converter and `Send` failures abort the current `Send` but
//! leave the sink and its binding intact.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlSinkError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("priming event did not evaluate to a JSON object")]
    NotAnObject,

    #[error("column {column:?} ({category}) cannot hold a {value_kind} value")]
    Unconvertible {
        column: String,
        category: &'static str,
        value_kind: &'static str,
    },

    #[error("column {0:?}: value does not look like a valid {1}")]
    BadLiteral(String, &'static str),

    #[error("send attempted before schema was bound")]
    NotBound,
}
