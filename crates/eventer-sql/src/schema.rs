//! Schema reconciliation and the frozen schema binding (§4.7 steps 1-5).
//!
//! Built once per sink lifetime from the catalog's existing columns plus
//! whatever new fields the priming event introduces. After `Init` the
//! binding is read without locking — only the handful of DDL statements
//! produced here ever touch the table's shape again (additive `ALTER TABLE`
//! only; see the SQL sink's Non-goals).

use eventer_core::EventObject;
use serde_json::Value;

use crate::catalog::CatalogColumn;
use crate::converter::{build_converter, Converter};
use crate::errors::SqlSinkError;
use crate::types::{category_for_type_name, category_of_catalog_column, infer_column_type, is_key_column};

pub struct SchemaBinding {
    pub table: String,
    /// Frozen column order: `(name, converter)`, matched-catalog columns
    /// first, then newly inferred ones, in the order they were discovered.
    pub columns: Vec<(String, Converter)>,
    pub key_columns: Vec<String>,
    /// DDL to run before the first `Send` (empty if the schema already
    /// covered every field of the priming event).
    pub ddl: Vec<String>,
}

impl SchemaBinding {
    /// Builds the `INSERT ... ON CONFLICT DO UPDATE` (or plain `INSERT` when
    /// there are no key columns) template for one event, substituting
    /// converted literals directly (no further bind parameters — the sink's
    /// parameter surface is just the table name at catalog-query time).
    pub fn render_upsert(&self, object: &EventObject) -> Result<String, SqlSinkError> {
        let mut col_names = Vec::with_capacity(self.columns.len());
        let mut literals = Vec::with_capacity(self.columns.len());
        for (name, converter) in &self.columns {
            let value = object.get(name).unwrap_or(&Value::Null);
            literals.push(converter(name, value)?);
            col_names.push(name.clone());
        }

        let insert = format!(
            "INSERT INTO {}({}) VALUES({})",
            self.table,
            col_names.join(","),
            literals.join(",")
        );

        if self.key_columns.is_empty() {
            return Ok(insert);
        }

        let assignments: Vec<String> = col_names
            .iter()
            .filter(|c| !self.key_columns.contains(c))
            .map(|c| format!("{c}=EXCLUDED.{c}"))
            .collect();

        if assignments.is_empty() {
            // every column is a key column: nothing to update, fall back to
            // a no-op conflict target so repeated sends don't error.
            return Ok(format!(
                "{insert} ON CONFLICT({}) DO NOTHING",
                self.key_columns.join(",")
            ));
        }

        Ok(format!(
            "{insert} ON CONFLICT({}) DO UPDATE SET {}",
            self.key_columns.join(","),
            assignments.join(",")
        ))
    }
}

/// Reconciles `catalog_columns` against `primed` and produces the frozen
/// binding plus whatever DDL needs to run before the first `Send`.
pub fn reconcile(
    table: &str,
    catalog_columns: &[CatalogColumn],
    primed: &EventObject,
) -> Result<SchemaBinding, SqlSinkError> {
    let mut columns: Vec<(String, Converter)> = Vec::new();
    let mut key_columns: Vec<String> = Vec::new();
    let mut new_defs: Vec<(String, &'static str, bool)> = Vec::new(); // (name, type, is_key)
    let mut matched_any = false;

    for cat_col in catalog_columns {
        if let Some(value) = primed.get(&cat_col.column_name) {
            matched_any = true;
            let category = category_of_catalog_column(&cat_col.data_type, &cat_col.udt_name);
            if is_key_column(&cat_col.column_name, value) {
                key_columns.push(cat_col.column_name.clone());
            }
            columns.push((
                cat_col.column_name.clone(),
                build_converter(category, cat_col.nullable()),
            ));
        }
    }

    for (name, value) in primed.iter() {
        if catalog_columns.iter().any(|c| &c.column_name == name) {
            continue;
        }
        let sql_type = infer_column_type(name, value);
        let key = is_key_column(name, value);
        if key {
            key_columns.push(name.clone());
        }
        new_defs.push((name.clone(), sql_type, key));
        let category = category_for_type_name(sql_type);
        columns.push((name.clone(), build_converter(category, !key)));
    }

    key_columns.sort();

    let ddl = if !matched_any {
        vec![build_create_table(table, &new_defs)]
    } else {
        build_alter_statements(table, &new_defs)
    };

    Ok(SchemaBinding {
        table: table.to_string(),
        columns,
        key_columns,
        ddl,
    })
}

fn column_def(name: &str, sql_type: &str, is_key: bool) -> String {
    if is_key {
        format!("{name} {sql_type}")
    } else {
        format!("{name} {sql_type} NULL")
    }
}

fn build_create_table(table: &str, defs: &[(String, &'static str, bool)]) -> String {
    let mut parts: Vec<String> = defs
        .iter()
        .map(|(name, ty, key)| column_def(name, ty, *key))
        .collect();

    let mut keys: Vec<&str> = defs
        .iter()
        .filter(|(_, _, key)| *key)
        .map(|(name, _, _)| name.as_str())
        .collect();
    keys.sort();

    if !keys.is_empty() {
        parts.push(format!(
            "CONSTRAINT pk_{table} PRIMARY KEY ({})",
            keys.join(",")
        ));
    }

    format!("CREATE TABLE IF NOT EXISTS {table} ({})", parts.join(","))
}

fn build_alter_statements(table: &str, defs: &[(String, &'static str, bool)]) -> Vec<String> {
    defs.iter()
        .map(|(name, ty, key)| format!("ALTER TABLE {table} ADD COLUMN {}", column_def(name, ty, *key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> EventObject {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn create_table_for_an_empty_catalog() {
        let primed = obj(json!({"id": 1, "name": "a", "ts_time": "2024-01-01 00:00:00"}));
        let binding = reconcile("T", &[], &primed).unwrap();
        assert_eq!(binding.ddl.len(), 1);
        assert!(binding.ddl[0].starts_with("CREATE TABLE IF NOT EXISTS T ("));
        assert!(binding.ddl[0].contains("CONSTRAINT pk_T PRIMARY KEY (id)"));
        assert_eq!(binding.key_columns, vec!["id".to_string()]);
    }

    #[test]
    fn alter_table_adds_one_statement_per_new_column() {
        let catalog = vec![
            CatalogColumn {
                column_name: "id".into(),
                data_type: "integer".into(),
                udt_name: "int4".into(),
                is_nullable: "NO".into(),
            },
            CatalogColumn {
                column_name: "name".into(),
                data_type: "text".into(),
                udt_name: "text".into(),
                is_nullable: "YES".into(),
            },
        ];
        let primed = obj(json!({"id": 1, "name": "a", "age": 7}));
        let binding = reconcile("T", &catalog, &primed).unwrap();
        assert_eq!(binding.ddl, vec!["ALTER TABLE T ADD COLUMN age integer NULL".to_string()]);
    }

    #[test]
    fn upsert_has_no_on_conflict_without_key_columns() {
        let primed = obj(json!({"value": "a"}));
        let binding = reconcile("T", &[], &primed).unwrap();
        let sql = binding.render_upsert(&primed).unwrap();
        assert!(!sql.contains("ON CONFLICT"));
    }

    #[test]
    fn upsert_sets_only_non_key_columns() {
        let primed = obj(json!({"id": 1, "value": "a"}));
        let binding = reconcile("T", &[], &primed).unwrap();
        let sql = binding.render_upsert(&primed).unwrap();
        assert!(sql.contains("ON CONFLICT(id) DO UPDATE SET value=EXCLUDED.value"));
        assert!(!sql.contains("id=EXCLUDED.id"));
    }
}
