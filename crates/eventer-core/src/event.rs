//! Event and descriptor types shared by the composer, generator, registry and sinks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type EventObject = serde_json::Map<String, Value>;

/// Key derived from an event object's `id` field: string verbatim, numeric
/// or other scalar as decimal text, empty when `id` is missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventKey(pub Vec<u8>);

impl EventKey {
    pub fn empty() -> Self {
        EventKey(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// One produced document: raw JSON bytes, the parsed object, its derived
/// key, and a flag signalling the composer has failed permanently.
#[derive(Debug, Clone)]
pub struct Event {
    pub key: EventKey,
    pub json: Vec<u8>,
    pub object: EventObject,
    pub is_stop: bool,
}

impl Event {
    pub fn stop() -> Self {
        Event {
            key: EventKey::empty(),
            json: Vec::new(),
            object: EventObject::new(),
            is_stop: true,
        }
    }

    /// Sentinel written into the single-slot store once its one event has
    /// been consumed; distinct from [`Event::stop`] so a reader can tell "no
    /// event produced this tick" apart from "the composer has failed".
    pub fn no_event() -> Self {
        Event {
            key: EventKey::empty(),
            json: Vec::new(),
            object: EventObject::new(),
            is_stop: false,
        }
    }

    /// Mirrors the original's `IsValid`: an event carries no data until it
    /// has been populated with non-empty JSON.
    pub fn is_valid(&self) -> bool {
        !self.is_stop && !self.json.is_empty()
    }

    pub fn as_json_str(&self) -> String {
        String::from_utf8_lossy(&self.json).into_owned()
    }
}

/// Derives an [`EventKey`] from an event object's `id` field.
pub fn key_from_object(object: &EventObject) -> EventKey {
    match object.get("id") {
        None | Some(Value::Null) => EventKey::empty(),
        Some(Value::String(s)) => EventKey(s.clone().into_bytes()),
        Some(other) => EventKey(render_scalar(other).into_bytes()),
    }
}

fn render_scalar(v: &Value) -> String {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 {
                    format!("{}", f as i64)
                } else {
                    format!("{}", f)
                }
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A user-supplied schema plus its scheduling attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDesc {
    pub id: String,
    #[serde(default)]
    pub dataset: String,
    pub schema: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_interval() -> String {
    "1s".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Kafka,
    Postgres,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KafkaConfig {
    #[serde(default)]
    pub bootstrap_servers: String,
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostgresConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub db: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub ssl: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationDesc {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DestinationKind,
    #[serde(default)]
    pub kafka: Option<KafkaConfig>,
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDesc {
    pub destination_id: String,
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorDesc {
    pub events: Vec<EventDesc>,
    pub destinations: Vec<DestinationDesc>,
    pub schedules: Vec<ScheduleDesc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_from_string_id_is_verbatim() {
        let obj = json!({"id": "abc"}).as_object().unwrap().clone();
        assert_eq!(key_from_object(&obj).as_bytes(), b"abc");
    }

    #[test]
    fn key_from_numeric_id_is_decimal_text() {
        let obj = json!({"id": 42}).as_object().unwrap().clone();
        assert_eq!(key_from_object(&obj).as_bytes(), b"42");
    }

    #[test]
    fn key_from_missing_id_is_empty() {
        let obj = json!({"v": 1}).as_object().unwrap().clone();
        assert_eq!(key_from_object(&obj).as_bytes(), b"");
    }
}
