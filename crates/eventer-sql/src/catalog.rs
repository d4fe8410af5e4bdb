//! Catalog introspection: asks Postgres what columns already exist on the
//! target table. An empty result means the table doesn't exist yet and
//! `Init` should `CREATE TABLE`; any row present means `Init` should
//! reconcile against what's already there and `ALTER TABLE` as needed.

use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Deserialize)]
pub struct CatalogColumn {
    pub column_name: String,
    pub data_type: String,
    pub udt_name: String,
    pub is_nullable: String,
}

impl CatalogColumn {
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("YES")
    }
}

/// Queries `information_schema.columns` for every column of `table_name`,
/// bound as a parameter (never interpolated into the query text).
pub async fn fetch_columns(
    pool: &PgPool,
    table_name: &str,
) -> Result<Vec<CatalogColumn>, sqlx::Error> {
    sqlx::query_as::<_, CatalogColumn>(
        "SELECT column_name, data_type, udt_name, is_nullable \
         FROM information_schema.columns WHERE table_name = $1",
    )
    .bind(table_name)
    .fetch_all(pool)
    .await
}
