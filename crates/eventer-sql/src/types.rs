//! SQL type categories: the axis the converter dispatch matrix (§4.7.1) and
//! the column-type inference rules (§4.7.2) both switch on.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCategory {
    Integer,
    Boolean,
    Text,
    Json,
    Timestamp,
    ArrayStringLike,
    ArrayOther,
}

impl ColumnCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnCategory::Integer => "integer",
            ColumnCategory::Boolean => "boolean",
            ColumnCategory::Text => "text",
            ColumnCategory::Json => "json",
            ColumnCategory::Timestamp => "timestamp",
            ColumnCategory::ArrayStringLike => "text[]",
            ColumnCategory::ArrayOther => "array",
        }
    }
}

/// Classifies an existing catalog column by its `(data_type, udt_name)` pair.
pub fn category_of_catalog_column(data_type: &str, udt_name: &str) -> ColumnCategory {
    if data_type.eq_ignore_ascii_case("ARRAY") {
        return if udt_name == "_text" || udt_name == "_varchar" || udt_name == "_bpchar" {
            ColumnCategory::ArrayStringLike
        } else {
            ColumnCategory::ArrayOther
        };
    }
    category_for_type_name(data_type)
}

/// Classifies one of our own inferred type names (§4.7.2's `text`,
/// `integer`, `jsonb`, `text[]`, `integer[]`, ...) the same way a catalog
/// column of that type would be classified.
pub fn category_for_type_name(ty: &str) -> ColumnCategory {
    let lower = ty.to_ascii_lowercase();
    if let Some(_elem) = lower.strip_suffix("[]") {
        return if lower == "text[]" || lower == "varchar[]" {
            ColumnCategory::ArrayStringLike
        } else {
            ColumnCategory::ArrayOther
        };
    }
    match lower.as_str() {
        "integer" | "bigint" | "smallint" | "numeric" | "decimal" | "real"
        | "double precision" => ColumnCategory::Integer,
        "boolean" => ColumnCategory::Boolean,
        "json" | "jsonb" => ColumnCategory::Json,
        "timestamp" | "timestamp without time zone" | "timestamp with time zone" | "date" => {
            ColumnCategory::Timestamp
        }
        _ => ColumnCategory::Text,
    }
}

/// The SQL type name emitted in `CREATE TABLE`/`ALTER TABLE` for an inferred
/// (not-yet-cataloged) column, following §4.7.2.
pub fn infer_column_type(name: &str, value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "jsonb",
        Value::String(_) => {
            let lower = name.to_ascii_lowercase();
            if lower.starts_with("time") || lower.ends_with("time") {
                "timestamp"
            } else {
                "text"
            }
        }
        Value::Number(n) => {
            let lower = name.to_ascii_lowercase();
            if lower.ends_with("id") || n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "decimal"
            }
        }
        Value::Null => "text",
        Value::Array(items) => {
            if items.iter().any(|v| v.is_array()) {
                "text[]"
            } else {
                match items.first() {
                    Some(Value::Object(_)) => "jsonb[]",
                    Some(Value::Number(n)) if n.is_i64() || n.is_u64() => "integer[]",
                    Some(Value::Number(_)) => "decimal[]",
                    Some(Value::Bool(_)) => "boolean[]",
                    _ => "text[]",
                }
            }
        }
        Value::Bool(_) => "text",
    }
}

/// A column is a primary-key column iff its name ends with `id` and its
/// priming value is non-null.
pub fn is_key_column(name: &str, value: &Value) -> bool {
    name.to_ascii_lowercase().ends_with("id") && !value.is_null()
}
