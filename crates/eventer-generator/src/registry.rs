//! The generator registry (C5): maps a content fingerprint to a live
//! generator. `register` is idempotent — two calls with structurally equal
//! descriptors return the same generator without starting a second worker.

use std::collections::HashMap;
use std::sync::Arc;

use eventer_core::{fingerprint_object, CoreError, EventDesc, Sink};

use crate::errors::GeneratorError;
use crate::generator::Generator;

pub struct GeneratorRegistry {
    instance_id: String,
    inner: std::sync::Mutex<HashMap<u64, Arc<Generator>>>,
}

impl GeneratorRegistry {
    pub fn new(instance_id: impl Into<String>) -> Self {
        GeneratorRegistry {
            instance_id: instance_id.into(),
            inner: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Computes `fingerprint(event_desc) ⊕ fingerprint(destination_id)` as
    /// the generator id, ignoring array order in both fingerprints.
    pub fn generator_id(event_desc: &EventDesc, destination_id: &str) -> u64 {
        let event_fp =
            fingerprint_object(event_desc).expect("EventDesc always serializes to JSON");
        let dest_fp = eventer_core::fingerprint(&serde_json::Value::String(
            destination_id.to_string(),
        ));
        event_fp ^ dest_fp
    }

    /// Registers a generator for `(event_desc, destination_id)`, building a
    /// fresh one unless a live entry with the same id already exists.
    pub async fn register(
        &self,
        event_desc: EventDesc,
        destination_id: &str,
        sink: Arc<dyn Sink>,
    ) -> Result<Arc<Generator>, GeneratorError> {
        let generator_id = Self::generator_id(&event_desc, destination_id);

        if let Some(existing) = self.lookup_live(generator_id) {
            return Ok(existing);
        }

        let generator = Arc::new(
            Generator::start(&self.instance_id, generator_id, event_desc, sink).await?,
        );

        let mut guard = self.inner.lock().unwrap();
        // Re-check under the lock: another caller may have won the race
        // between our `lookup_live` probe and the (slow) `Generator::start`.
        if let Some(existing) = guard.get(&generator_id) {
            if !existing.is_stopped() {
                let winner = Arc::clone(existing);
                drop(guard);
                generator.stop().await;
                return Ok(winner);
            }
        }
        guard.insert(generator_id, Arc::clone(&generator));
        Ok(generator)
    }

    pub async fn unregister(&self, generator_id: u64) -> Result<(), CoreError> {
        let removed = self.inner.lock().unwrap().remove(&generator_id);
        match removed {
            Some(generator) => {
                generator.stop().await;
                Ok(())
            }
            None => Err(CoreError::NotFound(generator_id)),
        }
    }

    /// Simple lookup (§4.4): returns the entry regardless of whether it has
    /// since stopped, so `/generator/status` can still report a terminated
    /// generator's final `count`/`active` state instead of 404ing on it.
    pub fn get(&self, generator_id: u64) -> Option<Arc<Generator>> {
        self.inner.lock().unwrap().get(&generator_id).cloned()
    }

    /// Idempotency probe for `register` (§4.4 step 3): only a *live* entry
    /// short-circuits registration; a stopped one is replaced by a fresh
    /// generator instead of being handed back.
    fn lookup_live(&self, generator_id: u64) -> Option<Arc<Generator>> {
        let guard = self.inner.lock().unwrap();
        guard
            .get(&generator_id)
            .filter(|g| !g.is_stopped())
            .cloned()
    }
}

/// Status snapshot returned by the HTTP facade.
pub struct GeneratorStatus {
    pub id: u64,
    pub remaining_count: i64,
    pub active: bool,
}

impl From<&Generator> for GeneratorStatus {
    fn from(g: &Generator) -> Self {
        GeneratorStatus {
            id: g.id(),
            remaining_count: g.remaining_count(),
            active: g.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use eventer_core::{Event, SinkError};

    use crate::generator::TERMINATED;

    struct NoopSink;

    #[async_trait]
    impl Sink for NoopSink {
        async fn init(&self, _event: &Event) -> Result<(), SinkError> {
            Ok(())
        }
        async fn send(&self, _event: &Event) -> Result<(), SinkError> {
            Ok(())
        }
        async fn flush(&self) -> Result<(), SinkError> {
            Ok(())
        }
        async fn close(&self) -> Result<(), SinkError> {
            Ok(())
        }
        fn id(&self) -> &str {
            "noop"
        }
    }

    fn desc(id: &str) -> EventDesc {
        EventDesc {
            id: id.to_string(),
            dataset: "ds".to_string(),
            schema: r#"{"id": 1}"#.to_string(),
            count: 1,
            interval: "10ms".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn register_is_idempotent() {
        let registry = GeneratorRegistry::new("inst");
        let g1 = registry
            .register(desc("e"), "d", Arc::new(NoopSink))
            .await
            .unwrap();
        let g2 = registry
            .register(desc("e"), "d", Arc::new(NoopSink))
            .await
            .unwrap();
        assert_eq!(g1.id(), g2.id());
        assert!(Arc::ptr_eq(&g1, &g2));
    }

    #[tokio::test(start_paused = true)]
    async fn unregister_removes_and_stops() {
        let registry = GeneratorRegistry::new("inst");
        let g = registry
            .register(desc("e"), "d", Arc::new(NoopSink))
            .await
            .unwrap();
        let id = g.id();
        registry.unregister(id).await.unwrap();
        assert!(registry.get(id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn unregister_unknown_id_fails() {
        let registry = GeneratorRegistry::new("inst");
        assert!(registry.unregister(12345).await.is_err());
    }

    #[tokio::test]
    async fn self_terminated_generator_is_still_visible_via_get() {
        let registry = GeneratorRegistry::new("inst");
        let g = registry
            .register(desc("e"), "d", Arc::new(NoopSink))
            .await
            .unwrap();
        let id = g.id();

        // count=1 on a 10ms interval: let the tick loop exhaust on its own,
        // with nobody ever calling `unregister`/`stop`.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(g.is_stopped());

        let status = GeneratorStatus::from(
            &*registry
                .get(id)
                .expect("get() must still return a self-terminated generator, not filter it out"),
        );
        assert_eq!(status.remaining_count, TERMINATED);
        assert!(!status.active);
    }

    #[tokio::test]
    async fn stop_does_not_hang_after_self_termination() {
        let registry = GeneratorRegistry::new("inst");
        let g = registry
            .register(desc("e"), "d", Arc::new(NoopSink))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(g.is_stopped());

        tokio::time::timeout(Duration::from_secs(1), g.stop())
            .await
            .expect("stop() must not hang once the generator has already self-terminated");
    }
}
