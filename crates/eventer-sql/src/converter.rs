//! Per-column value-to-SQL-literal converters (§4.7.1). A converter is built
//! once, at `Init`, from a column's category and nullability, and reused for
//! every subsequent `Send`.

use serde_json::Value;

use crate::errors::SqlSinkError;
use crate::types::ColumnCategory;

pub type Converter = Box<dyn Fn(&str, &Value) -> Result<String, SqlSinkError> + Send + Sync>;

/// Wraps `s` in single quotes, doubling any embedded single quote —
/// the spec's `toSqlString`.
pub fn to_sql_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn fmt_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.to_string()
    }
}

fn fmt_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

fn unconvertible(column: &str, category: ColumnCategory, v: &Value) -> SqlSinkError {
    SqlSinkError::Unconvertible {
        column: column.to_string(),
        category: category.label(),
        value_kind: value_kind(v),
    }
}

/// Builds the converter for one column given its catalog/inferred category
/// and whether the column is nullable.
pub fn build_converter(category: ColumnCategory, nullable: bool) -> Converter {
    match category {
        ColumnCategory::Integer => Box::new(move |col, v| match v {
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(|_| s.clone())
                .map_err(|_| SqlSinkError::BadLiteral(col.to_string(), "integer")),
            Value::Number(n) => Ok(fmt_number(n)),
            Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            Value::Null => Ok(if nullable { "NULL".to_string() } else { "0".to_string() }),
            other => Err(unconvertible(col, category, other)),
        }),
        ColumnCategory::Boolean => Box::new(move |col, v| match v {
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" | "yes" => Ok("'t'".to_string()),
                "false" | "f" | "0" | "no" => Ok("'f'".to_string()),
                _ => Err(SqlSinkError::BadLiteral(col.to_string(), "boolean")),
            },
            Value::Number(n) => Ok(if n.as_f64().unwrap_or(0.0) != 0.0 { "'t'" } else { "'f'" }.to_string()),
            Value::Bool(b) => Ok(if *b { "'t'" } else { "'f'" }.to_string()),
            Value::Null => Ok(if nullable { "NULL".to_string() } else { "'f'".to_string() }),
            other => Err(unconvertible(col, category, other)),
        }),
        ColumnCategory::Text => Box::new(move |_col, v| match v {
            Value::String(s) => Ok(to_sql_string(s)),
            Value::Number(n) => Ok(to_sql_string(&fmt_number(n))),
            Value::Bool(b) => Ok(to_sql_string(fmt_bool(*b))),
            Value::Null => Ok(if nullable {
                "NULL".to_string()
            } else {
                to_sql_string("")
            }),
            Value::Object(_) | Value::Array(_) => Ok(to_sql_string(&v.to_string())),
        }),
        ColumnCategory::Json => Box::new(move |_col, v| match v {
            Value::String(s) => Ok(to_sql_string(s)),
            Value::Number(n) => Ok(to_sql_string(&fmt_number(n))),
            Value::Bool(b) => Ok(to_sql_string(fmt_bool(*b))),
            Value::Null => Ok(if nullable {
                "NULL".to_string()
            } else {
                to_sql_string("{}")
            }),
            Value::Object(_) | Value::Array(_) => Ok(to_sql_string(&v.to_string())),
        }),
        ColumnCategory::Timestamp => Box::new(move |col, v| match v {
            Value::String(s) => Ok(to_sql_string(s)),
            Value::Number(n) => {
                let secs = n.as_f64().unwrap_or(0.0).floor() as i64;
                Ok(format!("to_timestamp({secs})"))
            }
            Value::Null => Ok(if nullable {
                "NULL".to_string()
            } else {
                "to_timestamp(0)".to_string()
            }),
            other => Err(unconvertible(col, category, other)),
        }),
        ColumnCategory::ArrayStringLike => Box::new(move |_col, v| match v {
            Value::String(s) => Ok(format!("'{{{s}}}'")),
            Value::Number(n) => Ok(format!("'{{{}}}'", fmt_number(n))),
            Value::Bool(b) => Ok(format!("'{{{}}}'", fmt_bool(*b))),
            Value::Null => Ok(if nullable {
                "NULL".to_string()
            } else {
                "'{}'".to_string()
            }),
            Value::Object(o) => Ok(format!("'{{{}}}'", Value::Object(o.clone()))),
            Value::Array(items) => {
                let quoted: Vec<String> = items
                    .iter()
                    .map(|item| format!("\"{}\"", render_array_element(item)))
                    .collect();
                Ok(format!("'{{{}}}'", quoted.join(",")))
            }
        }),
        ColumnCategory::ArrayOther => Box::new(move |_col, v| match v {
            Value::String(s) => Ok(format!("{{{s}}}")),
            Value::Number(n) => Ok(format!("{{{}}}", fmt_number(n))),
            Value::Bool(b) => Ok(format!("{{{}}}", fmt_bool(*b))),
            Value::Null => Ok(if nullable {
                "NULL".to_string()
            } else {
                "{}".to_string()
            }),
            Value::Object(o) => Ok(format!("{{{}}}", Value::Object(o.clone()))),
            Value::Array(items) => Ok(format!("ARRAY{}", Value::Array(items.clone()))),
        }),
    }
}

fn render_array_element(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => fmt_number(n),
        Value::Bool(b) => fmt_bool(*b).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_sql_string_escapes_single_quotes() {
        assert_eq!(to_sql_string("O'Neil"), "'O''Neil'");
    }

    #[test]
    fn integer_converter_formats_numbers() {
        let conv = build_converter(ColumnCategory::Integer, true);
        assert_eq!(conv("n", &Value::from(7)).unwrap(), "7");
        assert_eq!(conv("n", &Value::Null).unwrap(), "NULL");
    }

    #[test]
    fn integer_converter_rejects_map() {
        let conv = build_converter(ColumnCategory::Integer, true);
        assert!(conv("n", &serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn non_nullable_integer_null_becomes_zero() {
        let conv = build_converter(ColumnCategory::Integer, false);
        assert_eq!(conv("n", &Value::Null).unwrap(), "0");
    }

    #[test]
    fn text_converter_quotes_and_escapes() {
        let conv = build_converter(ColumnCategory::Text, true);
        assert_eq!(conv("s", &Value::String("O'Neil".into())).unwrap(), "'O''Neil'");
    }

    #[test]
    fn timestamp_converter_wraps_epoch_seconds() {
        let conv = build_converter(ColumnCategory::Timestamp, true);
        assert_eq!(conv("t", &Value::from(1704067200.0)).unwrap(), "to_timestamp(1704067200)");
    }
}
