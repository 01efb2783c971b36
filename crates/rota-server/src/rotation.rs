//! The periodic rotation driver. Owns no domain rules: it calls the
//! engine's sweep on a fixed cadence and logs what changed.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use rota_engine::AssignmentEngine;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const DEFAULT_INTERVAL_SECS: i64 = 120;
const MIN_INTERVAL_SECS: i64 = 5;

/// How often the sweep runs. Kept as a raw signed value so misconfiguration
/// (zero, negative) can be normalized instead of rejected at parse time.
#[derive(Clone, Debug)]
pub struct RotationConfig {
    pub interval_secs: i64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

impl RotationConfig {
    /// Effective sweep period: unset or non-positive falls back to the
    /// default, anything below the floor is clamped up to it.
    pub fn interval(&self) -> Duration {
        let mut secs = self.interval_secs;
        if secs <= 0 {
            secs = DEFAULT_INTERVAL_SECS;
        }
        if secs < MIN_INTERVAL_SECS {
            secs = MIN_INTERVAL_SECS;
        }
        Duration::from_secs(secs as u64)
    }
}

/// Spawn the rotation worker. The first tick fires immediately, so waiting
/// tasks are picked up at startup rather than after a full interval. Ticks
/// are strictly sequential; a sweep that runs long delays the next tick
/// instead of overlapping it.
pub fn start_rotation_task(
    engine: Arc<AssignmentEngine>,
    config: RotationConfig,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let period = config.interval();
    tokio::spawn(async move {
        tracing::info!(interval_secs = period.as_secs(), "Rotation worker started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Rotation worker stopped");
                    return;
                }
                _ = ticker.tick() => sweep(&engine),
            }
        }
    })
}

/// One sweep. A panicking sweep must not kill the timer loop, so unwinds
/// are caught and logged; the next scheduled tick still fires.
fn sweep(engine: &AssignmentEngine) {
    match std::panic::catch_unwind(AssertUnwindSafe(|| engine.rotate())) {
        Ok(events) => {
            for event in &events {
                match &event.to {
                    Some(to) => tracing::info!(
                        task_id = %event.task_id,
                        from = event.from.as_ref().map(|id| id.as_str()),
                        to = %to,
                        "Task reassigned"
                    ),
                    None => tracing::info!(
                        task_id = %event.task_id,
                        from = event.from.as_ref().map(|id| id.as_str()),
                        "Task released"
                    ),
                }
            }
            if !events.is_empty() {
                tracing::debug!(changes = events.len(), "Rotation sweep finished");
            }
        }
        Err(_) => {
            tracing::error!("Rotation sweep panicked; continuing on next tick");
        }
    }
}
