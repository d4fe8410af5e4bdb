//! The generator (C4): lifecycle management around one event producer and
//! one sink. Owns count/infinite accounting, the tick loop, and cancellation.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use eventer_composer::Composer;
use eventer_core::{EventDesc, Sink};

use crate::errors::GeneratorError;
use crate::producer::EventProducer;

/// `remaining_count` value once a generator has fully torn down. Distinct
/// from any live countdown value, all of which are `>= -1`.
pub const TERMINATED: i64 = -2;
/// Sentinel meaning "run forever", stored in `remaining_count` while a
/// generator is live and `infinite` is set.
const INFINITE: i64 = -1;

pub struct Generator {
    id: u64,
    remaining: Arc<AtomicI64>,
    cancel: CancellationToken,
    /// The tick loop's handle doubles as the stopped-latch: awaiting it
    /// blocks until teardown has completed regardless of whether the loop
    /// already exited on its own (finite count exhaustion) before `stop()`
    /// was ever called — unlike a `Notify`, a `JoinHandle` that has already
    /// finished still resolves immediately on `.await` instead of hanging.
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Generator {
    /// Builds a composer, starts its producer, synchronously primes the
    /// sink via `Init`, then spawns the tick loop. Returns an error — and
    /// tears down anything already started — if any of those steps fail.
    pub async fn start(
        instance_id: &str,
        generator_id: u64,
        event_desc: EventDesc,
        sink: Arc<dyn Sink>,
    ) -> Result<Self, GeneratorError> {
        let composer = Composer::new(
            event_desc.dataset.clone(),
            instance_id.to_string(),
            event_desc.id.clone(),
            event_desc.schema.clone(),
        )?;

        let interval = parse_interval(&event_desc.interval)?;

        let (remaining_start, infinite) = normalize_count(event_desc.count);

        let cancel = CancellationToken::new();
        let producer = EventProducer::spawn(composer, interval, cancel.child_token());

        let primed = producer.latest(true);
        if let Err(err) = sink.init(&primed).await {
            producer.shutdown().await;
            return Err(GeneratorError::SinkInit(err));
        }

        let remaining = Arc::new(AtomicI64::new(if infinite {
            INFINITE
        } else {
            remaining_start
        }));

        let task = spawn_tick_loop(
            producer,
            sink,
            Arc::clone(&remaining),
            infinite,
            interval,
            cancel.clone(),
        );

        Ok(Generator {
            id: generator_id,
            remaining,
            cancel,
            task: std::sync::Mutex::new(Some(task)),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn remaining_count(&self) -> i64 {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.remaining_count() <= TERMINATED
    }

    pub fn is_active(&self) -> bool {
        !self.is_stopped()
    }

    /// Cancels the tick loop and blocks until teardown (sink flush, count
    /// set to terminated) has completed. Safe to call after the generator
    /// has already self-terminated (finite count exhaustion): the task
    /// handle resolves immediately in that case instead of waiting for a
    /// signal that already fired with nobody listening.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let task = self.task.lock().unwrap().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

fn spawn_tick_loop(
    producer: EventProducer,
    sink: Arc<dyn Sink>,
    remaining: Arc<AtomicI64>,
    infinite: bool,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        while next(&remaining, infinite) {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let evt = producer.latest(false);
                    if evt.is_stop {
                        break;
                    }
                    if !evt.is_valid() {
                        if let Err(err) = sink.flush().await {
                            tracing::warn!(error = %err, "sink flush failed");
                        }
                        continue;
                    }
                    if let Err(err) = sink.send(&evt).await {
                        tracing::warn!(error = %err, "sink send failed, continuing");
                    }
                }
            }
        }

        producer.shutdown().await;
        if let Err(err) = sink.flush().await {
            tracing::warn!(error = %err, "final sink flush failed");
        }
        remaining.store(TERMINATED, Ordering::SeqCst);
    })
}

/// Atomic count accounting: `< -1` means already terminated; infinite
/// generators always continue; finite generators decrement and continue
/// while the post-decrement value is `>= 0`.
fn next(remaining: &AtomicI64, infinite: bool) -> bool {
    let current = remaining.load(Ordering::SeqCst);
    if current < INFINITE {
        return false;
    }
    if infinite {
        return true;
    }
    let after = remaining.fetch_sub(1, Ordering::SeqCst) - 1;
    after >= 0
}

/// Clamps `count < -1` up to `-1`, and reports whether the generator should
/// run forever (`count <= 0`, including the clamp target).
fn normalize_count(count: i64) -> (i64, bool) {
    let clamped = if count < INFINITE { INFINITE } else { count };
    (clamped, clamped <= 0)
}

fn parse_interval(raw: &str) -> Result<Duration, GeneratorError> {
    let raw_trim = raw.trim();
    let split_at = raw_trim
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .ok_or_else(|| {
            GeneratorError::BadInterval(raw.to_string(), "missing unit suffix".to_string())
        })?;
    let (number, unit) = raw_trim.split_at(split_at);
    let qty: f64 = number
        .parse()
        .map_err(|_| GeneratorError::BadInterval(raw.to_string(), "bad numeric part".to_string()))?;
    let millis = match unit {
        "ms" => qty,
        "s" => qty * 1_000.0,
        "m" => qty * 60_000.0,
        "h" => qty * 3_600_000.0,
        other => {
            return Err(GeneratorError::BadInterval(
                raw.to_string(),
                format!("unknown unit {other:?}"),
            ))
        }
    };
    if millis < 1.0 {
        return Err(GeneratorError::IntervalTooSmall(raw.to_string()));
    }
    Ok(Duration::from_millis(millis as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_negative_counts_below_minus_one_to_infinite() {
        let (remaining, infinite) = normalize_count(-5);
        assert_eq!(remaining, -1);
        assert!(infinite);
    }

    #[test]
    fn zero_count_is_infinite() {
        let (_, infinite) = normalize_count(0);
        assert!(infinite);
    }

    #[test]
    fn positive_count_is_finite() {
        let (remaining, infinite) = normalize_count(3);
        assert_eq!(remaining, 3);
        assert!(!infinite);
    }

    #[test]
    fn next_gives_exactly_count_successes() {
        let remaining = AtomicI64::new(3);
        let mut successes = 0;
        while next(&remaining, false) {
            successes += 1;
        }
        assert_eq!(successes, 3);
    }

    #[test]
    fn next_is_false_once_terminated() {
        let remaining = AtomicI64::new(TERMINATED);
        assert!(!next(&remaining, false));
        assert!(!next(&remaining, true));
    }

    #[test]
    fn parse_interval_rejects_sub_millisecond() {
        assert!(parse_interval("0ms").is_err());
    }

    #[test]
    fn parse_interval_accepts_milliseconds() {
        assert_eq!(parse_interval("10ms").unwrap(), Duration::from_millis(10));
    }

    #[test]
    fn parse_interval_accepts_seconds() {
        assert_eq!(parse_interval("2s").unwrap(), Duration::from_millis(2000));
    }
}
