//! The event composer (C2): a bound template plus a small library of
//! stochastic built-ins, evaluated once per `new_event()` call into a JSON
//! document.
//!
//! A composer is neither thread-safe nor re-entrant from the caller's point
//! of view — callers (the event producer, C3) must serialize access — but
//! internally its shared state lives behind a `Mutex` so the built-in
//! closures handed to `minijinja` satisfy its `Send + Sync` function bound.

use std::sync::{Arc, Mutex};

use minijinja::value::Value as JValue;
use minijinja::{Environment, Error as MjError, ErrorKind as MjErrorKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use eventer_core::EventObject;

use crate::duration::parse_duration_secs;
use crate::errors::ComposerError;
use crate::rand_data::rand_data;
use crate::user_agent::rand_user_agent;

struct ComposerState {
    dataset: String,
    instance_id: String,
    rng: StdRng,
}

pub struct Composer {
    name: String,
    schema: String,
    env: Environment<'static>,
    state: Arc<Mutex<ComposerState>>,
}

impl Composer {
    /// Builds a composer from `(dataset, instance_id, name, schema)`, compiling
    /// the schema once up front so a malformed template surfaces at
    /// construction time rather than on the first tick.
    pub fn new(
        dataset: impl Into<String>,
        instance_id: impl Into<String>,
        name: impl Into<String>,
        schema: impl Into<String>,
    ) -> Result<Self, ComposerError> {
        let state = Arc::new(Mutex::new(ComposerState {
            dataset: dataset.into(),
            instance_id: instance_id.into(),
            rng: StdRng::from_entropy(),
        }));
        let mut env = Environment::new();
        register_builtins(&mut env, Arc::clone(&state));

        let schema = schema.into();
        env.compile_expression(&schema)
            .map_err(|e: MjError| ComposerError::Template(e.to_string()))?;

        Ok(Composer {
            name: name.into(),
            schema,
            env,
            state,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the schema once, returning the rendered JSON bytes and the
    /// parsed object form used for key derivation and sink converters.
    pub fn new_event(&self) -> Result<(Vec<u8>, EventObject), ComposerError> {
        let expr = self
            .env
            .compile_expression(&self.schema)
            .map_err(ComposerError::from)?;
        let rendered = expr.eval(minijinja::context! {}).map_err(ComposerError::from)?;
        let value: Value = serde_json::to_value(rendered)?;
        let object = match value {
            Value::Object(map) => map,
            _ => return Err(ComposerError::NotAnObject),
        };
        let bytes = serde_json::to_vec(&object)?;
        Ok((bytes, object))
    }
}

fn register_builtins(env: &mut Environment<'static>, state: Arc<Mutex<ComposerState>>) {
    {
        let state = Arc::clone(&state);
        env.add_function("get_dataset", move |default: String| -> String {
            let st = state.lock().unwrap();
            if st.dataset.is_empty() {
                default
            } else {
                st.dataset.clone()
            }
        });
    }
    {
        let state = Arc::clone(&state);
        env.add_function("get_instance_id", move |default: String| -> String {
            let st = state.lock().unwrap();
            if st.instance_id.is_empty() {
                default
            } else {
                st.instance_id.clone()
            }
        });
    }
    {
        let state = Arc::clone(&state);
        env.add_function("get_one_of", move |csv: String| -> Result<String, MjError> {
            let options: Vec<String> = csv.split(',').map(|s| s.trim().to_string()).collect();
            if options.is_empty() || options.iter().all(|s| s.is_empty()) {
                return Err(MjError::new(
                    MjErrorKind::InvalidOperation,
                    "get_one_of requires at least one non-empty option",
                ));
            }
            let mut st = state.lock().unwrap();
            let idx = st.rng.gen_range(0..options.len());
            Ok(options[idx].clone())
        });
    }
    {
        let state = Arc::clone(&state);
        env.add_function(
            "get_timestamp",
            move |from: String, to: String, step: String| -> Result<f64, MjError> {
                get_timestamp(&state, &from, &to, &step).map_err(to_mj_error)
            },
        );
    }
    {
        let state = Arc::clone(&state);
        env.add_function("get_integer", move |min: f64, max: f64| -> i64 {
            if min >= max {
                return min as i64;
            }
            let mut st = state.lock().unwrap();
            st.rng.gen_range((min as i64)..(max as i64))
        });
    }
    {
        let state = Arc::clone(&state);
        env.add_function("get_number", move |min: f64, max: f64| -> f64 {
            if min == max {
                return min;
            }
            // Legacy behavior, intentionally not uniform on [min, max) — see
            // the composer's design notes. `(min + max) * U[0,1)`.
            let mut st = state.lock().unwrap();
            let u: f64 = st.rng.gen_range(0.0..1.0);
            (min + max) * u
        });
    }
    {
        let state = Arc::clone(&state);
        env.add_function("get_rand_data", move || -> JValue {
            let mut st = state.lock().unwrap();
            let v = rand_data(&mut st.rng);
            JValue::from_serializable(&v)
        });
    }
    {
        let state = Arc::clone(&state);
        env.add_function("get_rand_user_agent", move || -> String {
            let mut st = state.lock().unwrap();
            rand_user_agent(&mut st.rng)
        });
    }
}

fn to_mj_error(e: ComposerError) -> MjError {
    MjError::new(MjErrorKind::InvalidOperation, e.to_string())
}

fn get_timestamp(
    state: &Arc<Mutex<ComposerState>>,
    from: &str,
    to: &str,
    step: &str,
) -> Result<f64, ComposerError> {
    use chrono::NaiveDate;

    let from_date = NaiveDate::parse_from_str(from, "%Y-%m-%d")
        .map_err(|e| ComposerError::BadDuration(format!("bad `from` date {from:?}: {e}")))?;
    let to_date = NaiveDate::parse_from_str(to, "%Y-%m-%d")
        .map_err(|e| ComposerError::BadDuration(format!("bad `to` date {to:?}: {e}")))?;

    let from_epoch = from_date
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp() as f64;
    let to_end_epoch = (to_date + chrono::Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp() as f64;

    let window = to_end_epoch - from_epoch;
    let mut step_secs = parse_duration_secs(step)?;
    if step_secs <= 0.0 {
        return Err(ComposerError::BadDuration(format!(
            "non-positive step duration {step:?}"
        )));
    }
    if step_secs > window {
        step_secs = window;
    }

    let max_k = ((window - f64::EPSILON) / step_secs).floor().max(0.0) as i64;
    let mut st = state.lock().unwrap();
    let k = if max_k > 0 {
        st.rng.gen_range(0..=max_k)
    } else {
        0
    };
    Ok(from_epoch + (k as f64) * step_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_a_simple_object_schema() {
        let c = Composer::new("ds", "inst", "n", r#"{"id": 1, "v": 2}"#).unwrap();
        let (bytes, obj) = c.new_event().unwrap();
        assert_eq!(obj["id"], Value::from(1));
        assert!(String::from_utf8(bytes).unwrap().contains("\"v\":2"));
    }

    #[test]
    fn get_dataset_prefers_constructor_value() {
        let c = Composer::new("mydataset", "", "n", r#"{"ds": get_dataset("fallback")}"#).unwrap();
        let (_, obj) = c.new_event().unwrap();
        assert_eq!(obj["ds"], Value::from("mydataset"));
    }

    #[test]
    fn get_dataset_falls_back_when_empty() {
        let c = Composer::new("", "", "n", r#"{"ds": get_dataset("fallback")}"#).unwrap();
        let (_, obj) = c.new_event().unwrap();
        assert_eq!(obj["ds"], Value::from("fallback"));
    }

    #[test]
    fn get_one_of_picks_from_csv() {
        let c = Composer::new("", "", "n", r#"{"v": get_one_of("a, b, c")}"#).unwrap();
        for _ in 0..20 {
            let (_, obj) = c.new_event().unwrap();
            let v = obj["v"].as_str().unwrap();
            assert!(["a", "b", "c"].contains(&v));
        }
    }

    #[test]
    fn get_integer_is_half_open() {
        let c = Composer::new("", "", "n", r#"{"v": get_integer(5, 6)}"#).unwrap();
        let (_, obj) = c.new_event().unwrap();
        assert_eq!(obj["v"], Value::from(5));
    }

    #[test]
    fn get_integer_equal_bounds_returns_min() {
        let c = Composer::new("", "", "n", r#"{"v": get_integer(5, 5)}"#).unwrap();
        let (_, obj) = c.new_event().unwrap();
        assert_eq!(obj["v"], Value::from(5));
    }

    #[test]
    fn get_timestamp_same_day_stays_within_window() {
        let c = Composer::new(
            "",
            "",
            "n",
            r#"{"ts": get_timestamp("2024-01-01", "2024-01-01", "1h")}"#,
        )
        .unwrap();
        for _ in 0..50 {
            let (_, obj) = c.new_event().unwrap();
            let ts = obj["ts"].as_f64().unwrap();
            assert!(ts >= 1_704_067_200.0 && ts < 1_704_153_600.0, "ts={ts}");
        }
    }

    #[test]
    fn malformed_schema_fails_at_construction() {
        let res = Composer::new("", "", "n", "{this is not valid");
        assert!(res.is_err());
    }

    #[test]
    fn non_object_schema_fails_new_event() {
        let c = Composer::new("", "", "n", "42").unwrap();
        assert!(c.new_event().is_err());
    }

    #[test]
    fn rand_data_and_user_agent_are_callable() {
        let c = Composer::new(
            "",
            "",
            "n",
            r#"{"d": get_rand_data(), "ua": get_rand_user_agent()}"#,
        )
        .unwrap();
        let (_, obj) = c.new_event().unwrap();
        assert!(obj["d"].is_object());
        assert!(obj["ua"].as_str().unwrap().starts_with("Mozilla"));
    }
}
