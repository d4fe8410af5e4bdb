//! eventer-sql: the adaptive SQL sink (C7). Infers a table schema from an
//! event's JSON shape on first use, or binds to an existing table and
//! builds per-column converters from the catalog; thereafter upserts.

mod catalog;
mod converter;
mod errors;
mod pool;
mod schema;
mod sink;
mod types;

pub use catalog::CatalogColumn;
pub use converter::to_sql_string;
pub use errors::SqlSinkError;
pub use pool::SqlSinkPool;
pub use schema::SchemaBinding;
pub use sink::SqlSink;
