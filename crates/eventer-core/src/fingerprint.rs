//! Canonical 64-bit content hash over a JSON-shaped value.
//!
//! Objects are hashed with sorted keys; arrays are hashed order-insensitively
//! by default (each element first digested in isolation, the digests sorted,
//! then the elements re-hashed into the outer digest in that order) unless
//! `keep_order` is requested. Scalars hash their default text rendering, so
//! `1` and `1.0` fingerprint identically.

use serde_json::{Number, Value};
use xxhash_rust::xxh64::Xxh64;

const SEED: u64 = 0;

/// Fingerprints a `serde_json::Value`, ignoring array element order.
pub fn fingerprint(value: &Value) -> u64 {
    fingerprint_with_order(value, false)
}

/// Fingerprints a `serde_json::Value`, preserving array element order when
/// `keep_order` is true.
pub fn fingerprint_with_order(value: &Value, keep_order: bool) -> u64 {
    let mut digest = Xxh64::new(SEED);
    write_value(value, &mut digest, keep_order);
    digest.digest()
}

/// Fingerprints anything serializable by round-tripping it through
/// `serde_json::Value`, mirroring the original's `ObjectToJsonId`.
pub fn fingerprint_object<T: serde::Serialize>(value: &T) -> serde_json::Result<u64> {
    let v = serde_json::to_value(value)?;
    Ok(fingerprint(&v))
}

fn write_value(value: &Value, digest: &mut Xxh64, keep_order: bool) {
    match value {
        Value::Null => {
            digest.update(b"null");
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for k in keys {
                digest.update(k.as_bytes());
                write_value(&map[k], digest, keep_order);
            }
        }
        Value::Array(items) => write_array(items, digest, keep_order),
        Value::String(s) => digest.update(s.as_bytes()),
        Value::Number(n) => digest.update(render_number(n).as_bytes()),
        Value::Bool(b) => digest.update(render_bool(*b).as_bytes()),
    }
}

fn write_array(items: &[Value], digest: &mut Xxh64, keep_order: bool) {
    if items.is_empty() {
        digest.update(b"[]");
        return;
    }
    if items.len() == 1 {
        write_value(&items[0], digest, keep_order);
        return;
    }
    if keep_order {
        for item in items {
            write_value(item, digest, keep_order);
        }
        return;
    }
    let mut ranked: Vec<(u64, usize)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut scratch = Xxh64::new(SEED);
            write_value(item, &mut scratch, keep_order);
            (scratch.digest(), i)
        })
        .collect();
    ranked.sort_by_key(|(id, _)| *id);
    for (_, idx) in ranked {
        write_value(&items[idx], digest, keep_order);
    }
}

/// Mirrors Go's `fmt.Sprint` rendering of a `float64`/`int64`: integral
/// values render without a fractional part, so `1` and `1.0` coincide.
fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    if let Some(f) = n.as_f64() {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e18 {
            return format!("{}", f as i64);
        }
        return format!("{}", f);
    }
    n.to_string()
}

fn render_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_key_order_does_not_matter() {
        let a = json!({"name": "A", "age": 1});
        let b = json!({"age": 1, "name": "A"});
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn integer_and_float_spelling_coincide() {
        let a = json!({"count": 1});
        let b = json!({"count": 1.0});
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn array_order_is_ignored_by_default() {
        let a = json!([1, 2, 3]);
        let b = json!([3, 1, 2]);
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn array_order_can_be_preserved() {
        let a = json!([1, 2, 3]);
        let b = json!([3, 1, 2]);
        assert_ne!(
            fingerprint_with_order(&a, true),
            fingerprint_with_order(&b, true)
        );
    }

    #[test]
    fn empty_array_has_a_stable_digest() {
        let empty: Value = json!([]);
        assert_eq!(fingerprint(&empty), fingerprint(&json!([])));
    }

    #[test]
    fn distinct_documents_hash_differently() {
        let a = json!({"id": 1});
        let b = json!({"id": 2});
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }
}
